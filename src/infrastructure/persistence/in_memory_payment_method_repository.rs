use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::context::RequestContext;
use crate::domain::payment_method::{
	NewPaymentMethod, PaymentMethod, PaymentMethodFilter,
};
use crate::domain::repository::{PaymentMethodRepository, StoreError};

/// Thread-safe in-memory payment method store, shared by clones.
#[derive(Default, Clone)]
pub struct InMemoryPaymentMethodRepository {
	methods: Arc<RwLock<BTreeMap<i64, PaymentMethod>>>,
	next_id: Arc<AtomicI64>,
}

impl InMemoryPaymentMethodRepository {
	pub fn new() -> Self {
		Self::default()
	}

	/// Lookup that skips the async trait, for stores layered on top of this
	/// one.
	pub async fn get(&self, id: i64) -> Option<PaymentMethod> {
		self.methods.read().await.get(&id).cloned()
	}
}

#[async_trait]
impl PaymentMethodRepository for InMemoryPaymentMethodRepository {
	async fn find_all(
		&self,
		_ctx: &RequestContext,
		filter: &PaymentMethodFilter,
	) -> Result<Vec<PaymentMethod>, StoreError> {
		let methods = self.methods.read().await;
		Ok(methods
			.values()
			.filter(|m| !m.is_deleted() && filter.matches(m))
			.cloned()
			.collect())
	}

	async fn find_by_id(
		&self,
		_ctx: &RequestContext,
		id: i64,
	) -> Result<PaymentMethod, StoreError> {
		self.get(id).await.ok_or(StoreError::NotFound)
	}

	async fn create(
		&self,
		_ctx: &RequestContext,
		method: NewPaymentMethod,
	) -> Result<PaymentMethod, StoreError> {
		let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
		let now = OffsetDateTime::now_utc();
		let method = PaymentMethod {
			id,
			name: method.name,
			bank_code: method.bank_code,
			created_at: now,
			updated_at: now,
			deleted_at: None,
		};

		self.methods.write().await.insert(id, method.clone());
		Ok(method)
	}

	async fn update(
		&self,
		_ctx: &RequestContext,
		method: PaymentMethod,
	) -> Result<(), StoreError> {
		let mut methods = self.methods.write().await;
		match methods.get_mut(&method.id) {
			Some(current) if !current.is_deleted() => {
				*current = method;
				Ok(())
			}
			_ => Err(StoreError::NotFound),
		}
	}

	async fn delete(
		&self,
		_ctx: &RequestContext,
		id: i64,
		deleted_at: OffsetDateTime,
	) -> Result<(), StoreError> {
		let mut methods = self.methods.write().await;
		let method = methods.get_mut(&id).ok_or(StoreError::NotFound)?;
		if method.deleted_at.is_none() {
			method.deleted_at = Some(deleted_at);
		}
		Ok(())
	}
}
