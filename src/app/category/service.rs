//! 分类业务服务

use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use super::model::{CategoryDto, CategoryRequest};
use crate::core::error::{CatalogError, CatalogResult};
use crate::core::response::ListResponse;
use crate::domain::model::{Category, NewCategory};
use crate::domain::repository::{CategoryRepository, ProductRepository};
use crate::domain::rules;

#[derive(Clone)]
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
    products: Arc<dyn ProductRepository>,
}

impl CategoryService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            categories,
            products,
        }
    }

    /// 空目录返回空列表
    pub async fn list_categories(&self) -> CatalogResult<ListResponse<CategoryDto>> {
        let categories = self.categories.find_all().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    pub async fn create_category(&self, request: CategoryRequest) -> CatalogResult<CategoryDto> {
        let category_name = validated_name(request)?;
        rules::ensure_category_name_available(&*self.categories, &category_name, None).await?;

        let saved = self
            .categories
            .insert(NewCategory { category_name })
            .await?;

        info!(
            category_id = saved.category_id,
            category_name = %saved.category_name,
            "created category"
        );
        Ok(saved.into())
    }

    /// 整体替换名称，标识保持不变
    pub async fn update_category(
        &self,
        category_id: i64,
        request: CategoryRequest,
    ) -> CatalogResult<CategoryDto> {
        let existing = rules::require_category(&*self.categories, category_id).await?;
        let category_name = validated_name(request)?;
        rules::ensure_category_name_available(
            &*self.categories,
            &category_name,
            Some(existing.category_id),
        )
        .await?;

        let updated = self
            .categories
            .update(&Category {
                category_id: existing.category_id,
                category_name,
            })
            .await?;

        info!(
            category_id,
            category_name = %updated.category_name,
            "updated category"
        );
        Ok(updated.into())
    }

    /// 分类下仍有商品时拒绝删除
    pub async fn delete_category(&self, category_id: i64) -> CatalogResult<CategoryDto> {
        let existing = rules::require_category(&*self.categories, category_id).await?;

        let product_count = self.products.count_by_category(category_id).await?;
        if product_count > 0 {
            warn!(category_id, product_count, "refusing to delete non-empty category");
            return Err(CatalogError::Conflict(format!(
                "Category {} still has {} product(s)",
                existing.category_name, product_count
            )));
        }

        if !self.categories.delete_by_id(category_id).await? {
            return Err(CatalogError::not_found("Category", "categoryId", category_id));
        }

        info!(category_id, "deleted category");
        Ok(existing.into())
    }

    pub async fn ping(&self) -> CatalogResult<()> {
        self.categories.ping().await
    }
}

fn validated_name(mut request: CategoryRequest) -> CatalogResult<String> {
    request.category_name = rules::normalize_name(&request.category_name, "categoryName")?;
    request.validate()?;
    Ok(request.category_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{NewProduct, DEFAULT_IMAGE};
    use crate::infrastructure::memory_store::MemoryCatalogStore;

    fn service() -> (CategoryService, MemoryCatalogStore) {
        let store = MemoryCatalogStore::new();
        let service = CategoryService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (service, store)
    }

    #[tokio::test]
    async fn test_create_category_returns_generated_id() {
        let (service, _) = service();
        let created = service
            .create_category(CategoryRequest::new("Electronics"))
            .await
            .unwrap();
        assert_eq!(created.category_id, 1);
        assert_eq!(created.category_name, "Electronics");
    }

    #[tokio::test]
    async fn test_duplicate_category_conflicts() {
        let (service, _) = service();
        service
            .create_category(CategoryRequest::new("Electronics"))
            .await
            .unwrap();
        let err = service
            .create_category(CategoryRequest::new("Electronics"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
        assert_eq!(service.list_categories().await.unwrap().content.len(), 1);
    }

    #[tokio::test]
    async fn test_short_or_blank_names_rejected() {
        let (service, _) = service();
        for name in ["Toy", "       ", "  ab  "] {
            let err = service
                .create_category(CategoryRequest::new(name))
                .await
                .unwrap_err();
            assert!(matches!(err, CatalogError::Validation(_)), "{:?}", name);
        }
    }

    #[tokio::test]
    async fn test_update_missing_category_not_found() {
        let (service, _) = service();
        let err = service
            .update_category(99999, CategoryRequest::new("Xylophones"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_preserves_id() {
        let (service, _) = service();
        let created = service
            .create_category(CategoryRequest::new("Gardening"))
            .await
            .unwrap();
        let updated = service
            .update_category(created.category_id, CategoryRequest::new("Garden Tools"))
            .await
            .unwrap();
        assert_eq!(updated.category_id, created.category_id);
        assert_eq!(updated.category_name, "Garden Tools");

        // 改成自身名称不算冲突
        service
            .update_category(created.category_id, CategoryRequest::new("Garden Tools"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_to_taken_name_conflicts() {
        let (service, _) = service();
        service
            .create_category(CategoryRequest::new("Kitchen"))
            .await
            .unwrap();
        let other = service
            .create_category(CategoryRequest::new("Bathroom"))
            .await
            .unwrap();
        let err = service
            .update_category(other.category_id, CategoryRequest::new("Kitchen"))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_category_policy() {
        let (service, store) = service();
        let created = service
            .create_category(CategoryRequest::new("Outdoor"))
            .await
            .unwrap();
        let product = ProductRepository::insert(
            &store,
            NewProduct {
                product_name: "Tent".to_string(),
                description: String::new(),
                quantity: 1,
                price: 100.0,
                discount: 0.0,
                special_price: 100.0,
                image: DEFAULT_IMAGE.to_string(),
                category_id: created.category_id,
            },
        )
        .await
        .unwrap();

        let err = service
            .delete_category(created.category_id)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));

        ProductRepository::delete_by_id(&store, product.product_id)
            .await
            .unwrap();
        let deleted = service.delete_category(created.category_id).await.unwrap();
        assert_eq!(deleted, created);
        assert!(service.list_categories().await.unwrap().content.is_empty());

        assert!(matches!(
            service.delete_category(created.category_id).await,
            Err(CatalogError::NotFound { .. })
        ));
    }
}
