//! 数据库基础设施

use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Error,
};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    pub async fn new(config: &DatabaseConfig) -> Result<Self, Error> {
        info!(
            "Connecting to database: {}",
            redact_password(&config.url)
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }

    pub fn get_pool(&self) -> &PgPool {
        &self.pool
    }

    /// 建表（幂等）
    pub async fn create_tables(&self) -> Result<(), Error> {
        info!("Creating catalog tables...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                category_id BIGSERIAL PRIMARY KEY,
                category_name VARCHAR(255) NOT NULL,
                CONSTRAINT categories_category_name_key UNIQUE (category_name)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                product_id BIGSERIAL PRIMARY KEY,
                product_name VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                quantity INTEGER NOT NULL CHECK (quantity >= 0),
                price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
                discount DOUBLE PRECISION NOT NULL DEFAULT 0,
                special_price DOUBLE PRECISION NOT NULL,
                image VARCHAR(255) NOT NULL DEFAULT 'default',
                category_id BIGINT NOT NULL,
                CONSTRAINT products_category_id_fkey FOREIGN KEY (category_id)
                    REFERENCES categories (category_id) ON DELETE RESTRICT,
                CONSTRAINT products_category_name_key UNIQUE (category_id, product_name)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS products_category_price_idx ON products (category_id, price)",
        )
        .execute(&self.pool)
        .await?;

        info!("Catalog tables ready");
        Ok(())
    }
}

/// 日志中隐藏连接串里的密码
fn redact_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((credentials, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match credentials.split_once(':') {
        Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
        None => url.to_string(),
    }
}
