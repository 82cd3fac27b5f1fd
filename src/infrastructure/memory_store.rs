//! 内存存储
//!
//! 单个读写锁保护两张表，检查与写入在同一把锁内完成；标识由原子计数器生成。
//! 约束语义与 PostgreSQL 表结构保持一致。

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::error::{CatalogError, CatalogResult};
use crate::domain::model::{Category, NewCategory, NewProduct, Product};
use crate::domain::repository::{CategoryRepository, ProductRepository};

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
}

impl Tables {
    fn category_name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.category_name == name && Some(c.category_id) != except)
    }

    fn product_name_taken(&self, category_id: i64, name: &str, except: Option<i64>) -> bool {
        self.products.values().any(|p| {
            p.category_id == category_id && p.product_name == name && Some(p.product_id) != except
        })
    }
}

/// 进程内目录存储，克隆后共享同一份数据
#[derive(Clone, Default)]
pub struct MemoryCatalogStore {
    tables: Arc<RwLock<Tables>>,
    category_seq: Arc<AtomicI64>,
    product_seq: Arc<AtomicI64>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn unique_violation(constraint: &str) -> CatalogError {
    CatalogError::Conflict(format!("duplicate value violates {}", constraint))
}

#[async_trait]
impl CategoryRepository for MemoryCatalogStore {
    async fn find_by_id(&self, category_id: i64) -> CatalogResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&category_id).cloned())
    }

    async fn find_by_name(&self, category_name: &str) -> CatalogResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|c| c.category_name == category_name)
            .cloned())
    }

    async fn find_all(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn insert(&self, category: NewCategory) -> CatalogResult<Category> {
        let mut tables = self.tables.write().await;
        if tables.category_name_taken(&category.category_name, None) {
            return Err(unique_violation("categories_category_name_key"));
        }
        let category_id = self.category_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = Category {
            category_id,
            category_name: category.category_name,
        };
        tables.categories.insert(category_id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, category: &Category) -> CatalogResult<Category> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.category_id) {
            return Err(CatalogError::not_found(
                "Category",
                "categoryId",
                category.category_id,
            ));
        }
        if tables.category_name_taken(&category.category_name, Some(category.category_id)) {
            return Err(unique_violation("categories_category_name_key"));
        }
        tables
            .categories
            .insert(category.category_id, category.clone());
        Ok(category.clone())
    }

    async fn delete_by_id(&self, category_id: i64) -> CatalogResult<bool> {
        let mut tables = self.tables.write().await;
        if tables
            .products
            .values()
            .any(|p| p.category_id == category_id)
        {
            return Err(CatalogError::Conflict(
                "operation violates products_category_id_fkey".to_string(),
            ));
        }
        Ok(tables.categories.remove(&category_id).is_some())
    }
}

#[async_trait]
impl ProductRepository for MemoryCatalogStore {
    async fn find_by_id(&self, product_id: i64) -> CatalogResult<Option<Product>> {
        Ok(self.tables.read().await.products.get(&product_id).cloned())
    }

    async fn find_all(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn find_by_category_order_by_price_asc(
        &self,
        category_id: i64,
    ) -> CatalogResult<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .cloned()
            .collect();
        products.sort_by(|a, b| {
            a.price
                .total_cmp(&b.price)
                .then(a.product_id.cmp(&b.product_id))
        });
        Ok(products)
    }

    async fn find_by_category_and_name(
        &self,
        category_id: i64,
        product_name: &str,
    ) -> CatalogResult<Option<Product>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .find(|p| p.category_id == category_id && p.product_name == product_name)
            .cloned())
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> CatalogResult<Vec<Product>> {
        let needle = keyword.to_lowercase();
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .filter(|p| p.product_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn count_by_category(&self, category_id: i64) -> CatalogResult<i64> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .filter(|p| p.category_id == category_id)
            .count() as i64)
    }

    async fn insert(&self, product: NewProduct) -> CatalogResult<Product> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&product.category_id) {
            return Err(CatalogError::Conflict(
                "operation violates products_category_id_fkey".to_string(),
            ));
        }
        if tables.product_name_taken(product.category_id, &product.product_name, None) {
            return Err(unique_violation("products_category_name_key"));
        }
        let product_id = self.product_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let saved = product.with_id(product_id);
        tables.products.insert(product_id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, product: &Product) -> CatalogResult<Product> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&product.product_id) {
            return Err(CatalogError::not_found(
                "Product",
                "productId",
                product.product_id,
            ));
        }
        if !tables.categories.contains_key(&product.category_id) {
            return Err(CatalogError::Conflict(
                "operation violates products_category_id_fkey".to_string(),
            ));
        }
        if tables.product_name_taken(
            product.category_id,
            &product.product_name,
            Some(product.product_id),
        ) {
            return Err(unique_violation("products_category_name_key"));
        }
        tables.products.insert(product.product_id, product.clone());
        Ok(product.clone())
    }

    async fn delete_by_id(&self, product_id: i64) -> CatalogResult<bool> {
        Ok(self
            .tables
            .write()
            .await
            .products
            .remove(&product_id)
            .is_some())
    }
}
