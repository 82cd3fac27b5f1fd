//! 请求提取器：解析失败统一转成 CatalogError

use axum::extract::{FromRequest, FromRequestParts};

use crate::core::error::CatalogError;

/// JSON 请求体
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(CatalogError))]
pub struct AppJson<T>(pub T);

/// 路径参数
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(CatalogError))]
pub struct AppPath<T>(pub T);
