//! 核心错误处理模块

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// 名称冲突（分类名全局唯一，商品名在分类内唯一）
    #[error("{0}")]
    Conflict(String),

    #[error("{resource} not found with {field}: {value}")]
    NotFound {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    /// 请求体超过配置的上限
    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("storage failure: {0}")]
    Storage(String),

    #[error("image upload failed: {0}")]
    Upload(#[from] std::io::Error),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

impl CatalogError {
    pub fn not_found(resource: &'static str, field: &'static str, value: impl ToString) -> Self {
        CatalogError::NotFound {
            resource,
            field,
            value: value.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            CatalogError::Storage(_) | CatalogError::Upload(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// 错误响应结构
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_code, user_message) = match &self {
            CatalogError::Conflict(msg) => ("CONFLICT", msg.clone()),
            CatalogError::NotFound { .. } => ("NOT_FOUND", self.to_string()),
            CatalogError::Validation(msg) => ("BAD_REQUEST", msg.clone()),
            CatalogError::PayloadTooLarge(msg) => ("PAYLOAD_TOO_LARGE", msg.clone()),
            CatalogError::Storage(_) => {
                error!("Storage error: {}", self);
                ("INTERNAL_SERVER_ERROR", "Database error".to_string())
            }
            CatalogError::Upload(_) => {
                error!("Upload error: {}", self);
                ("UPLOAD_FAILED", "Image could not be stored".to_string())
            }
        };

        let error_response = ErrorResponse {
            error: error_code.to_string(),
            message: user_message,
            code: status.as_u16(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, axum::Json(error_response)).into_response()
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            // 存储层约束是唯一性和外键的最终保障
            if db_err.is_unique_violation() {
                return CatalogError::Conflict(format!(
                    "duplicate value violates {}",
                    db_err.constraint().unwrap_or("a unique constraint")
                ));
            }
            if db_err.is_foreign_key_violation() {
                return CatalogError::Conflict(format!(
                    "operation violates {}",
                    db_err.constraint().unwrap_or("a foreign key constraint")
                ));
            }
            if db_err.is_check_violation() {
                return CatalogError::Validation(db_err.message().to_string());
            }
        }
        CatalogError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CatalogError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field))
                })
            })
            .collect();
        messages.sort();

        CatalogError::Validation(messages.join(", "))
    }
}

/// 提取器失败：超限保留 413，其余一律按请求错误处理
fn rejected(status: StatusCode, body_text: String) -> CatalogError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        CatalogError::PayloadTooLarge(body_text)
    } else {
        CatalogError::Validation(body_text)
    }
}

impl From<MultipartError> for CatalogError {
    fn from(err: MultipartError) -> Self {
        rejected(err.status(), err.body_text())
    }
}

impl From<MultipartRejection> for CatalogError {
    fn from(rejection: MultipartRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<JsonRejection> for CatalogError {
    fn from(rejection: JsonRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for CatalogError {
    fn from(rejection: PathRejection) -> Self {
        rejected(rejection.status(), rejection.body_text())
    }
}
