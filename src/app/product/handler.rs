//! 商品处理器

use axum::{
    extract::{
        multipart::{Multipart, MultipartRejection},
        State,
    },
    http::StatusCode,
    response::Json,
};

use super::model::{ProductDto, ProductRequest};
use crate::app::AppState;
use crate::core::error::CatalogError;
use crate::core::extract::{AppJson, AppPath};
use crate::core::response::ListResponse;

/// 上传表单中的图片字段名
const IMAGE_FIELD: &str = "image";

pub async fn add_product(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i64>,
    AppJson(payload): AppJson<ProductRequest>,
) -> Result<(StatusCode, Json<ProductDto>), CatalogError> {
    let product = state
        .product_service
        .add_product(category_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_all_products(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<ProductDto>>, CatalogError> {
    let products = state.product_service.list_all_products().await?;
    Ok(Json(products))
}

pub async fn list_products_by_category(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i64>,
) -> Result<Json<ListResponse<ProductDto>>, CatalogError> {
    let products = state
        .product_service
        .list_products_by_category(category_id)
        .await?;
    Ok(Json(products))
}

/// 同步搜索结果用 200 返回
pub async fn search_products_by_keyword(
    State(state): State<AppState>,
    AppPath(keyword): AppPath<String>,
) -> Result<Json<ListResponse<ProductDto>>, CatalogError> {
    let products = state
        .product_service
        .search_products_by_keyword(&keyword)
        .await?;
    Ok(Json(products))
}

pub async fn update_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i64>,
    AppJson(payload): AppJson<ProductRequest>,
) -> Result<Json<ProductDto>, CatalogError> {
    let product = state
        .product_service
        .update_product(product_id, payload)
        .await?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i64>,
) -> Result<Json<ProductDto>, CatalogError> {
    let product = state.product_service.delete_product(product_id).await?;
    Ok(Json(product))
}

pub async fn update_product_image(
    State(state): State<AppState>,
    AppPath(product_id): AppPath<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProductDto>, CatalogError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart.next_field().await? {
        let is_image = field
            .name()
            .is_some_and(|name| name.eq_ignore_ascii_case(IMAGE_FIELD));
        if !is_image {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;
        let product = state
            .product_service
            .update_product_image(product_id, file_name.as_deref(), &bytes)
            .await?;
        return Ok(Json(product));
    }

    Err(CatalogError::Validation(format!(
        "Multipart field '{}' is required",
        IMAGE_FIELD
    )))
}
