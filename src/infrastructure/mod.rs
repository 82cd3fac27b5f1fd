//! 基础设施层：存储实现、文件存储、日志

#[cfg(feature = "database")]
pub mod database;
pub mod file_storage;
pub mod logger;
pub mod memory_store;
#[cfg(feature = "database")]
pub mod postgres_store;
