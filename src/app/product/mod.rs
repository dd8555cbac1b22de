//! 产品模块：模型、存储、处理器

pub mod handler;
pub mod model;
pub mod store;
