//! 领域实体

/// 新商品的默认图片引用
pub const DEFAULT_IMAGE: &str = "default";

/// 商品分类
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

/// 尚未持久化的分类，标识由存储层生成
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub category_name: String,
}

/// 商品，必须隶属于一个分类
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub description: String,
    pub quantity: i32,
    pub price: f64,
    pub discount: f64,
    pub special_price: f64,
    pub image: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub product_name: String,
    pub description: String,
    pub quantity: i32,
    pub price: f64,
    pub discount: f64,
    pub special_price: f64,
    pub image: String,
    pub category_id: i64,
}

impl NewProduct {
    /// 以给定标识生成已持久化的商品
    pub fn with_id(self, product_id: i64) -> Product {
        Product {
            product_id,
            product_name: self.product_name,
            description: self.description,
            quantity: self.quantity,
            price: self.price,
            discount: self.discount,
            special_price: self.special_price,
            image: self.image,
            category_id: self.category_id,
        }
    }
}
