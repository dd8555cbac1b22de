//! 产品数据模型

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 产品记录，与 `product` 表一一对应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    #[serde(rename = "productid")]
    #[sqlx(rename = "productid")]
    pub id: i64,
    #[serde(rename = "productname")]
    #[sqlx(rename = "productname")]
    pub name: String,
    #[serde(rename = "productbrand")]
    #[sqlx(rename = "productbrand")]
    pub brand: String,
    pub price: f64,
}

/// 创建产品请求（id 由数据库生成）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(rename = "productname")]
    pub name: String,
    #[serde(rename = "productbrand")]
    pub brand: String,
    pub price: f64,
}

impl NewProduct {
    /// 绑定生成的 id，得到完整记录
    pub fn with_id(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            brand: self.brand,
            price: self.price,
        }
    }
}
