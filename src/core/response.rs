//! 核心响应处理模块

use serde::{Deserialize, Serialize};

/// 列表响应结构，序列化为 `{"content": [...]}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub content: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(content: Vec<T>) -> Self {
        Self { content }
    }
}

impl<T> FromIterator<T> for ListResponse<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
