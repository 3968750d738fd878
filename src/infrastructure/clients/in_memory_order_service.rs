use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::context::RequestContext;
use crate::domain::services::{Order, OrderService, ServiceError};

/// In-memory order service. Records every order it was asked to mark as paid
/// and can be switched into failure modes.
#[derive(Default, Clone)]
pub struct InMemoryOrderService {
	orders:         Arc<RwLock<HashMap<String, Order>>>,
	paid_orders:    Arc<RwLock<Vec<String>>>,
	get_calls:      Arc<AtomicUsize>,
	unavailable:    Arc<AtomicBool>,
	fail_mark_paid: Arc<AtomicBool>,
	response_delay: Arc<RwLock<Option<Duration>>>,
}

impl InMemoryOrderService {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn add_order(&self, order_id: &str) {
		self.orders.write().await.insert(order_id.to_string(), Order {
			id:      order_id.to_string(),
			user_id: None,
			status:  "PENDING".to_string(),
		});
	}

	pub async fn paid_orders(&self) -> Vec<String> {
		self.paid_orders.read().await.clone()
	}

	pub fn get_calls(&self) -> usize {
		self.get_calls.load(Ordering::SeqCst)
	}

	pub fn set_unavailable(&self, unavailable: bool) {
		self.unavailable.store(unavailable, Ordering::SeqCst);
	}

	pub fn set_fail_mark_paid(&self, fail: bool) {
		self.fail_mark_paid.store(fail, Ordering::SeqCst);
	}

	/// Makes every call stall, to exercise caller deadlines.
	pub async fn set_response_delay(&self, delay: Option<Duration>) {
		*self.response_delay.write().await = delay;
	}

	async fn stall(&self) {
		let delay = *self.response_delay.read().await;
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}
	}
}

#[async_trait]
impl OrderService for InMemoryOrderService {
	async fn get_order(
		&self,
		_ctx: &RequestContext,
		order_id: &str,
	) -> Result<Option<Order>, ServiceError> {
		self.get_calls.fetch_add(1, Ordering::SeqCst);
		self.stall().await;

		if self.unavailable.load(Ordering::SeqCst) {
			return Err(ServiceError::Unavailable {
				reason: "order service is down".to_string(),
			});
		}

		Ok(self.orders.read().await.get(order_id).cloned())
	}

	async fn mark_order_paid(
		&self,
		_ctx: &RequestContext,
		order_id: &str,
	) -> Result<(), ServiceError> {
		self.stall().await;

		if self.fail_mark_paid.load(Ordering::SeqCst) {
			return Err(ServiceError::UnexpectedStatus { status: 503 });
		}

		let mut orders = self.orders.write().await;
		let order = orders
			.get_mut(order_id)
			.ok_or(ServiceError::UnexpectedStatus { status: 404 })?;
		order.status = "PAID".to_string();
		drop(orders);

		self.paid_orders.write().await.push(order_id.to_string());
		Ok(())
	}
}
