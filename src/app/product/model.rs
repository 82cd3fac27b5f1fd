//! 商品请求与响应结构
//!
//! 请求结构不包含特价字段，特价总是由原价和折扣计算得出。

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::model::{NewProduct, Product, DEFAULT_IMAGE};
use crate::domain::rules::compute_special_price;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[validate(length(min = 3, message = "Product name must contain at least 3 characters"))]
    pub product_name: String,

    #[serde(default)]
    pub description: String,

    #[validate(range(min = 0, message = "Quantity must not be negative"))]
    pub quantity: i32,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "Discount must be between 0 and 100"))]
    pub discount: f64,
}

impl ProductRequest {
    /// 新商品：默认图片，挂到指定分类，计算特价
    pub fn into_new_product(self, category_id: i64) -> NewProduct {
        NewProduct {
            special_price: compute_special_price(self.price, self.discount),
            product_name: self.product_name,
            description: self.description,
            quantity: self.quantity,
            price: self.price,
            discount: self.discount,
            image: DEFAULT_IMAGE.to_string(),
            category_id,
        }
    }

    /// 覆盖可编辑字段；标识、图片和所属分类保持不变
    pub fn apply_to(self, product: &mut Product) {
        product.special_price = compute_special_price(self.price, self.discount);
        product.product_name = self.product_name;
        product.description = self.description;
        product.quantity = self.quantity;
        product.price = self.price;
        product.discount = self.discount;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: i64,
    pub product_name: String,
    pub image: String,
    pub description: String,
    pub quantity: i32,
    pub price: f64,
    pub discount: f64,
    pub special_price: f64,
    pub category_id: i64,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.product_id,
            product_name: product.product_name,
            image: product.image,
            description: product.description,
            quantity: product.quantity,
            price: product.price,
            discount: product.discount,
            special_price: product.special_price,
            category_id: product.category_id,
        }
    }
}
