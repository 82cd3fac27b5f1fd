//! 商品业务服务

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::model::{ProductDto, ProductRequest};
use crate::core::error::{CatalogError, CatalogResult};
use crate::core::response::ListResponse;
use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::domain::rules;
use crate::infrastructure::file_storage::FileStorage;

#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    files: Arc<dyn FileStorage>,
    image_dir: PathBuf,
}

impl ProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        files: Arc<dyn FileStorage>,
        image_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            products,
            categories,
            files,
            image_dir: image_dir.into(),
        }
    }

    pub async fn add_product(
        &self,
        category_id: i64,
        request: ProductRequest,
    ) -> CatalogResult<ProductDto> {
        let category = rules::require_category(&*self.categories, category_id).await?;
        let request = validated(request)?;
        rules::ensure_product_name_available(
            &*self.products,
            category.category_id,
            &request.product_name,
            None,
        )
        .await?;

        let saved = self
            .products
            .insert(request.into_new_product(category.category_id))
            .await?;

        info!(
            product_id = saved.product_id,
            category_id,
            product_name = %saved.product_name,
            special_price = saved.special_price,
            "added product"
        );
        Ok(saved.into())
    }

    pub async fn list_all_products(&self) -> CatalogResult<ListResponse<ProductDto>> {
        let products = self.products.find_all().await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// 按价格升序
    pub async fn list_products_by_category(
        &self,
        category_id: i64,
    ) -> CatalogResult<ListResponse<ProductDto>> {
        let category = rules::require_category(&*self.categories, category_id).await?;
        let products = self
            .products
            .find_by_category_order_by_price_asc(category.category_id)
            .await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// 没有匹配时返回空列表
    pub async fn search_products_by_keyword(
        &self,
        keyword: &str,
    ) -> CatalogResult<ListResponse<ProductDto>> {
        let products = self
            .products
            .find_by_name_containing_ignore_case(keyword)
            .await?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    pub async fn update_product(
        &self,
        product_id: i64,
        request: ProductRequest,
    ) -> CatalogResult<ProductDto> {
        let mut product = rules::require_product(&*self.products, product_id).await?;
        let request = validated(request)?;
        rules::ensure_product_name_available(
            &*self.products,
            product.category_id,
            &request.product_name,
            Some(product.product_id),
        )
        .await?;

        request.apply_to(&mut product);
        let updated = self.products.update(&product).await?;

        info!(product_id, product_name = %updated.product_name, "updated product");
        Ok(updated.into())
    }

    /// 只修改图片引用
    pub async fn update_product_image(
        &self,
        product_id: i64,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> CatalogResult<ProductDto> {
        let mut product = rules::require_product(&*self.products, product_id).await?;
        if bytes.is_empty() {
            return Err(CatalogError::Validation("Image file is empty".to_string()));
        }

        let file_name = self
            .files
            .store(&self.image_dir, original_name, bytes)
            .await?;
        product.image = file_name;

        let updated = match self.products.update(&product).await {
            Ok(updated) => updated,
            Err(err) => {
                // 记录没更新就不留下孤立文件
                if let Err(remove_err) = self.files.remove(&self.image_dir, &product.image).await {
                    warn!(
                        image = %product.image,
                        error = %remove_err,
                        "failed to remove orphaned image"
                    );
                }
                return Err(err);
            }
        };

        info!(product_id, image = %updated.image, "updated product image");
        Ok(updated.into())
    }

    pub async fn delete_product(&self, product_id: i64) -> CatalogResult<ProductDto> {
        let product = rules::require_product(&*self.products, product_id).await?;

        if !self.products.delete_by_id(product_id).await? {
            return Err(CatalogError::not_found("Product", "productId", product_id));
        }

        info!(product_id, "deleted product");
        Ok(product.into())
    }
}

fn validated(mut request: ProductRequest) -> CatalogResult<ProductRequest> {
    request.product_name = rules::normalize_name(&request.product_name, "productName")?;
    request.validate()?;
    Ok(request)
}
