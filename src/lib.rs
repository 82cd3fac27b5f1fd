//! # 电商商品目录服务
//!
//! 分类与商品的 REST 后端：
//! - `domain`：实体、持久化网关 trait、目录一致性规则
//! - `app`：业务服务、HTTP 处理器与路由
//! - `infrastructure`：PostgreSQL / 内存存储、图片存储、日志
//! - `core`：统一错误、响应结构、中间件

pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;

pub use crate::app::{build_app, AppState};
pub use crate::core::error::{CatalogError, CatalogResult};
