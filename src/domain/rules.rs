//! 目录一致性规则
//!
//! 名称唯一性校验、特价计算以及变更前的存在性检查。

use tracing::warn;

use super::model::{Category, Product};
use super::repository::{CategoryRepository, ProductRepository};
use crate::core::error::{CatalogError, CatalogResult};

/// 特价 = 原价 - 折扣百分比 × 原价
///
/// 不做截断：折扣超过 100 会得到负数，折扣范围由请求校验负责。
pub fn compute_special_price(price: f64, discount_percent: f64) -> f64 {
    price - (discount_percent / 100.0) * price
}

/// 去除首尾空白，空白名称视为校验失败
pub fn normalize_name(value: &str, field: &str) -> CatalogResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{} must not be blank", field)));
    }
    Ok(trimmed.to_string())
}

/// 分类名全局唯一；`current` 为正在更新的分类，自身不算冲突
pub async fn ensure_category_name_available(
    categories: &dyn CategoryRepository,
    category_name: &str,
    current: Option<i64>,
) -> CatalogResult<()> {
    match categories.find_by_name(category_name).await? {
        Some(existing) if Some(existing.category_id) != current => {
            warn!(category_name, "category name already taken");
            Err(CatalogError::Conflict(format!(
                "Category already exists with name {}",
                category_name
            )))
        }
        _ => Ok(()),
    }
}

/// 商品名在所属分类内唯一
pub async fn ensure_product_name_available(
    products: &dyn ProductRepository,
    category_id: i64,
    product_name: &str,
    current: Option<i64>,
) -> CatalogResult<()> {
    match products
        .find_by_category_and_name(category_id, product_name)
        .await?
    {
        Some(existing) if Some(existing.product_id) != current => {
            warn!(category_id, product_name, "product name already taken in category");
            Err(CatalogError::Conflict(format!(
                "Product already exists with name {} in category {}",
                product_name, category_id
            )))
        }
        _ => Ok(()),
    }
}

pub async fn require_category(
    categories: &dyn CategoryRepository,
    category_id: i64,
) -> CatalogResult<Category> {
    categories
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Category", "categoryId", category_id))
}

pub async fn require_product(
    products: &dyn ProductRepository,
    product_id: i64,
) -> CatalogResult<Product> {
    products
        .find_by_id(product_id)
        .await?
        .ok_or_else(|| CatalogError::not_found("Product", "productId", product_id))
}
