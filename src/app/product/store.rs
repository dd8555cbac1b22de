//! 产品存储层
//!
//! `ProductStore` 抽象了对 `product` 表的三种操作，`MySqlProductStore`
//! 是基于 sqlx 连接池的实现。所有语句都使用参数绑定，每次调用都有独立的超时。

use async_trait::async_trait;
use sqlx::MySqlPool;
use std::future::Future;
use std::time::Duration;

use super::model::{NewProduct, Product};

const SELECT_ALL: &str = "SELECT productid, productname, productbrand, price FROM product";
const SELECT_BY_ID: &str =
    "SELECT productid, productname, productbrand, price FROM product WHERE productid = ?";
const INSERT: &str = "INSERT INTO product (productname, productbrand, price) VALUES (?, ?, ?)";

/// 存储层错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("query timed out after {0:?}")]
    Timeout(Duration),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// 产品存储抽象
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 获取全部产品，不保证顺序
    async fn list_all(&self) -> Result<Vec<Product>, StoreError>;

    /// 按 id 获取产品，不存在时返回 `None`
    async fn get_by_id(&self, id: i64) -> Result<Option<Product>, StoreError>;

    /// 插入产品并返回生成的 id
    async fn insert(&self, product: &NewProduct) -> Result<i64, StoreError>;
}

/// 为单条语句加上超时限制
///
/// future 超时被丢弃时，其持有的连接会随之归还连接池。
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(StoreError::Database),
        Err(_) => Err(StoreError::Timeout(limit)),
    }
}

/// 基于 MySQL 连接池的产品存储
#[derive(Clone)]
pub struct MySqlProductStore {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlProductStore {
    pub fn new(pool: MySqlPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }
}

#[async_trait]
impl ProductStore for MySqlProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Product>(SELECT_ALL).fetch_all(&self.pool),
        )
        .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        with_timeout(
            self.query_timeout,
            sqlx::query_as::<_, Product>(SELECT_BY_ID)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    async fn insert(&self, product: &NewProduct) -> Result<i64, StoreError> {
        let result = with_timeout(
            self.query_timeout,
            sqlx::query(INSERT)
                .bind(&product.name)
                .bind(&product.brand)
                .bind(product.price)
                .execute(&self.pool),
        )
        .await?;

        i64::try_from(result.last_insert_id()).map_err(|e| {
            StoreError::Database(sqlx::Error::Decode(Box::new(e)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_with_timeout_expires() {
        let pending = std::future::pending::<Result<(), sqlx::Error>>();
        let err = with_timeout(Duration::from_secs(3), pending)
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Timeout(d) if d == Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_with_timeout_passes_through() {
        let ok = with_timeout(Duration::from_secs(1), async { Ok::<_, sqlx::Error>(5) }).await;
        assert_eq!(ok.unwrap(), 5);

        let err = with_timeout(Duration::from_secs(1), async {
            Err::<(), _>(sqlx::Error::RowNotFound)
        })
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Database(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn test_statements_are_parameterized() {
        assert!(SELECT_BY_ID.ends_with("productid = ?"));
        assert_eq!(INSERT.matches('?').count(), 3);
    }
}
