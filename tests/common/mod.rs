//! 测试用的内存产品存储

use async_trait::async_trait;
use axum_test::TestServer;
use product_api::{create_router, AppState, NewProduct, Product, ProductStore, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct MemoryProductStore {
    rows: Mutex<Vec<Product>>,
    unavailable: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl MemoryProductStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 模拟数据库不可用
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 模拟慢查询
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = Some(latency);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let latency = *self.latency.lock().unwrap();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.check_available()?;
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        self.check_available()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: &NewProduct) -> Result<i64, StoreError> {
        self.check_available()?;
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(product.clone().with_id(id));
        Ok(id)
    }
}

pub fn test_server(store: Arc<dyn ProductStore>) -> TestServer {
    test_server_with_timeout(store, Duration::from_secs(30))
}

pub fn test_server_with_timeout(store: Arc<dyn ProductStore>, timeout: Duration) -> TestServer {
    let app = create_router(AppState::new(store), "/api", timeout);
    TestServer::new(app).unwrap()
}
