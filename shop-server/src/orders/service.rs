//! 订单服务
//!
//! 为新订单分配 id 与日期，并通过 [`OrderStore::update`] 追加写入。

use std::sync::Arc;

use chrono::Utc;
use shared::models::{NewOrder, Order};
use shared::util::generate_order_id;

use super::error::StoreResult;
use super::storage::OrderStore;

type IdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct OrderService {
    store: OrderStore,
    next_id: IdGenerator,
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl OrderService {
    pub fn new(store: OrderStore) -> Self {
        Self::with_id_generator(store, generate_order_id)
    }

    /// 使用自定义 id 生成器 (测试 id 冲突)
    pub fn with_id_generator(
        store: OrderStore,
        next_id: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            store,
            next_id: Arc::new(next_id),
        }
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    /// 创建订单
    ///
    /// id 与已有订单冲突时重新生成。存储错误原样返回。
    pub async fn add_order(&self, new_order: NewOrder) -> StoreResult<Order> {
        let next_id = self.next_id.clone();
        let order = self
            .store
            .update(move |orders| {
                let mut id = next_id();
                while orders.iter().any(|o| o.id == id) {
                    tracing::debug!(order_id = %id, "Order id collision, regenerating");
                    id = next_id();
                }
                let order = new_order.into_order(id, Utc::now());
                orders.push(order.clone());
                order
            })
            .await?;

        tracing::info!(
            order_id = %order.id,
            total = order.total,
            items = order.items.len(),
            payment_method = %order.payment_method,
            "Order saved"
        );
        Ok(order)
    }

    pub async fn list_orders(&self) -> StoreResult<Vec<Order>> {
        self.store.read_orders().await
    }

    pub async fn find_order(&self, id: &str) -> StoreResult<Option<Order>> {
        let orders = self.store.read_orders().await?;
        Ok(orders.into_iter().find(|o| o.id == id))
    }
}
