//! 核心响应处理模块

use serde::{Deserialize, Serialize};

/// 创建成功后返回的结构，只包含生成的 id
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CreatedResponse {
    pub id: i64,
}
