//! PostgreSQL 存储实现

use async_trait::async_trait;
use sqlx::postgres::PgPool;

use crate::core::error::{CatalogError, CatalogResult};
use crate::domain::model::{Category, NewCategory, NewProduct, Product};
use crate::domain::repository::{CategoryRepository, ProductRepository};

const PRODUCT_COLUMNS: &str = "product_id, product_name, description, quantity, price, discount, special_price, image, category_id";

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    category_id: i64,
    category_name: String,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            category_id: row.category_id,
            category_name: row.category_name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    product_id: i64,
    product_name: String,
    description: String,
    quantity: i32,
    price: f64,
    discount: f64,
    special_price: f64,
    image: String,
    category_id: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            product_id: row.product_id,
            product_name: row.product_name,
            description: row.description,
            quantity: row.quantity,
            price: row.price,
            discount: row.discount,
            special_price: row.special_price,
            image: row.image,
            category_id: row.category_id,
        }
    }
}

/// ILIKE 模式中转义 `%`、`_` 和 `\`
fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_products(&self, sql: &str) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl CategoryRepository for PgCatalogStore {
    async fn find_by_id(&self, category_id: i64) -> CatalogResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, category_name FROM categories WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Category::from))
    }

    async fn find_by_name(&self, category_name: &str) -> CatalogResult<Option<Category>> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, category_name FROM categories WHERE category_name = $1",
        )
        .bind(category_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Category::from))
    }

    async fn find_all(&self) -> CatalogResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT category_id, category_name FROM categories ORDER BY category_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn insert(&self, category: NewCategory) -> CatalogResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories (category_name) VALUES ($1) RETURNING category_id, category_name",
        )
        .bind(&category.category_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, category: &Category) -> CatalogResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "UPDATE categories SET category_name = $1 WHERE category_id = $2 RETURNING category_id, category_name",
        )
        .bind(&category.category_name)
        .bind(category.category_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Category::from).ok_or_else(|| {
            CatalogError::not_found("Category", "categoryId", category.category_id)
        })
    }

    async fn delete_by_id(&self, category_id: i64) -> CatalogResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE category_id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> CatalogResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PgCatalogStore {
    async fn find_by_id(&self, product_id: i64) -> CatalogResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE product_id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn find_all(&self) -> CatalogResult<Vec<Product>> {
        self.fetch_products(&format!(
            "SELECT {} FROM products ORDER BY product_id",
            PRODUCT_COLUMNS
        ))
        .await
    }

    async fn find_by_category_order_by_price_asc(
        &self,
        category_id: i64,
    ) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE category_id = $1 ORDER BY price ASC, product_id ASC",
            PRODUCT_COLUMNS
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_category_and_name(
        &self,
        category_id: i64,
        product_name: &str,
    ) -> CatalogResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE category_id = $1 AND product_name = $2",
            PRODUCT_COLUMNS
        ))
        .bind(category_id)
        .bind(product_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Product::from))
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        keyword: &str,
    ) -> CatalogResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE product_name ILIKE $1 ORDER BY product_id",
            PRODUCT_COLUMNS
        ))
        .bind(like_pattern(keyword))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count_by_category(&self, category_id: i64) -> CatalogResult<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    async fn insert(&self, product: NewProduct) -> CatalogResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            INSERT INTO products
                (product_name, description, quantity, price, discount, special_price, image, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&product.product_name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price)
        .bind(product.discount)
        .bind(product.special_price)
        .bind(&product.image)
        .bind(product.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn update(&self, product: &Product) -> CatalogResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            UPDATE products
            SET product_name = $1, description = $2, quantity = $3, price = $4,
                discount = $5, special_price = $6, image = $7, category_id = $8
            WHERE product_id = $9
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&product.product_name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price)
        .bind(product.discount)
        .bind(product.special_price)
        .bind(&product.image)
        .bind(product.category_id)
        .bind(product.product_id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Product::from)
            .ok_or_else(|| CatalogError::not_found("Product", "productId", product.product_id))
    }

    async fn delete_by_id(&self, product_id: i64) -> CatalogResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
