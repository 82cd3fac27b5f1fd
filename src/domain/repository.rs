//! 持久化网关
//!
//! 分类和商品的存储抽象。PostgreSQL 与内存两种实现都必须把唯一性和外键
//! 约束当作最终保障：冲突时返回 `CatalogError::Conflict`，而不是依赖
//! 业务层的预先检查。

use async_trait::async_trait;

use super::model::{Category, NewCategory, NewProduct, Product};
use crate::core::error::CatalogResult;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, category_id: i64) -> CatalogResult<Option<Category>>;

    /// 按名称精确查找
    async fn find_by_name(&self, category_name: &str) -> CatalogResult<Option<Category>>;

    /// 按标识升序返回全部分类
    async fn find_all(&self) -> CatalogResult<Vec<Category>>;

    async fn insert(&self, category: NewCategory) -> CatalogResult<Category>;

    async fn update(&self, category: &Category) -> CatalogResult<Category>;

    /// 仍有商品引用该分类时返回 `Conflict`；返回值表示是否删除了记录
    async fn delete_by_id(&self, category_id: i64) -> CatalogResult<bool>;

    /// 存储连通性检查
    async fn ping(&self) -> CatalogResult<()> {
        Ok(())
    }
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, product_id: i64) -> CatalogResult<Option<Product>>;

    /// 按标识升序返回全部商品
    async fn find_all(&self) -> CatalogResult<Vec<Product>>;

    /// 分类下的商品，按价格升序
    async fn find_by_category_order_by_price_asc(
        &self,
        category_id: i64,
    ) -> CatalogResult<Vec<Product>>;

    async fn find_by_category_and_name(
        &self,
        category_id: i64,
        product_name: &str,
    ) -> CatalogResult<Option<Product>>;

    /// 商品名包含关键字（不区分大小写）
    async fn find_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> CatalogResult<Vec<Product>>;

    async fn count_by_category(&self, category_id: i64) -> CatalogResult<i64>;

    async fn insert(&self, product: NewProduct) -> CatalogResult<Product>;

    async fn update(&self, product: &Product) -> CatalogResult<Product>;

    async fn delete_by_id(&self, product_id: i64) -> CatalogResult<bool>;
}
