//! 核心层：错误处理、请求提取、响应结构、中间件

pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
