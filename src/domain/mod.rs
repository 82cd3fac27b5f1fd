//! 领域层：实体、持久化网关与目录规则

pub mod model;
pub mod repository;
pub mod rules;

pub use model::{Category, NewCategory, NewProduct, Product, DEFAULT_IMAGE};
pub use repository::{CategoryRepository, ProductRepository};
