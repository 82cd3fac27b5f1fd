//! 分类请求与响应结构

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::model::Category;

/// 创建/更新分类请求，客户端提供的标识会被忽略
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRequest {
    #[validate(length(min = 5, message = "Category name must contain at least 5 characters"))]
    pub category_name: String,
}

impl CategoryRequest {
    pub fn new(category_name: impl Into<String>) -> Self {
        Self {
            category_name: category_name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub category_id: i64,
    pub category_name: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            category_id: category.category_id,
            category_name: category.category_name,
        }
    }
}
