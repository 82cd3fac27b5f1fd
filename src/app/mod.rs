//! 应用层：路由、共享状态与各业务模块

pub mod category;
pub mod product;

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::Config;
use crate::core::error::CatalogError;
use crate::core::middleware::request_logging_middleware;
use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::infrastructure::file_storage::{FileStorage, LocalFileStorage};
use crate::infrastructure::memory_store::MemoryCatalogStore;
use category::service::CategoryService;
use product::service::ProductService;

#[derive(Clone)]
pub struct AppState {
    pub category_service: CategoryService,
    pub product_service: ProductService,
}

impl AppState {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
        files: Arc<dyn FileStorage>,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            category_service: CategoryService::new(categories.clone(), products.clone()),
            product_service: ProductService::new(products, categories, files, image_dir),
        }
    }

    /// 内存存储 + 本地图片目录
    pub fn in_memory(image_dir: impl Into<PathBuf>) -> Self {
        let store = Arc::new(MemoryCatalogStore::new());
        Self::new(
            store.clone(),
            store,
            Arc::new(LocalFileStorage),
            image_dir,
        )
    }
}

// 健康检查
async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, CatalogError> {
    state.category_service.ping().await?;

    Ok(Json(serde_json::json!({
        "status": "healthy",
        "storage": "connected",
        "timestamp": chrono::Utc::now()
    })))
}

// 创建路由
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        // 分类
        .route(
            "/api/public/categories",
            get(category::handler::list_categories).post(category::handler::create_category),
        )
        .route(
            "/api/public/categories/:category_id",
            put(category::handler::update_category),
        )
        .route(
            "/api/admin/categories/:category_id",
            delete(category::handler::delete_category),
        )
        // 商品
        .route(
            "/api/admin/categories/:category_id/product",
            post(product::handler::add_product),
        )
        .route(
            "/api/public/products",
            get(product::handler::list_all_products),
        )
        .route(
            "/api/public/categories/:category_id/products",
            get(product::handler::list_products_by_category),
        )
        .route(
            "/api/public/products/keyword/:keyword",
            get(product::handler::search_products_by_keyword),
        )
        .route(
            "/api/admin/products/:product_id",
            put(product::handler::update_product).delete(product::handler::delete_product),
        )
        .route(
            "/api/product/:product_id/image",
            put(product::handler::update_product_image),
        )
}

/// 完整应用：路由 + 中间件 + 状态
pub fn build_app(state: AppState, config: &Config) -> Router {
    create_routes()
        .layer(DefaultBodyLimit::max(config.storage.max_upload_bytes))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.http.timeout_seconds,
        )))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
