//! 分类处理器

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};

use super::model::{CategoryDto, CategoryRequest};
use crate::app::AppState;
use crate::core::error::CatalogError;
use crate::core::extract::{AppJson, AppPath};
use crate::core::response::ListResponse;

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<CategoryDto>>, CatalogError> {
    let categories = state.category_service.list_categories().await?;
    Ok(Json(categories))
}

pub async fn create_category(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryDto>), CatalogError> {
    let category = state.category_service.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i64>,
    AppJson(payload): AppJson<CategoryRequest>,
) -> Result<Json<CategoryDto>, CatalogError> {
    let category = state
        .category_service
        .update_category(category_id, payload)
        .await?;
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    AppPath(category_id): AppPath<i64>,
) -> Result<Json<CategoryDto>, CatalogError> {
    let category = state.category_service.delete_category(category_id).await?;
    Ok(Json(category))
}
