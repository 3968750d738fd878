use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::domain::context::RequestContext;
use crate::domain::payment::{NewPayment, Payment, PaymentFilter, PaymentStatus};
use crate::domain::payment_method::PaymentMethod;
use crate::domain::repository::{PaymentRepository, StoreError};
use crate::infrastructure::persistence::in_memory_payment_method_repository::InMemoryPaymentMethodRepository;

/// Thread-safe in-memory payment store. Payment methods are read from the
/// method store it was built with, mirroring the shared relational schema.
/// Outstanding order notifications are queued by the time they were queued.
///
/// Writes can be made to fail on demand, and every attempted write is
/// counted, so tests can assert on what the workflow touched.
#[derive(Clone)]
pub struct InMemoryPaymentRepository {
	payments:      Arc<RwLock<BTreeMap<i64, Payment>>>,
	notifications: Arc<RwLock<HashMap<i64, OffsetDateTime>>>,
	methods:       InMemoryPaymentMethodRepository,
	next_id:       Arc<AtomicI64>,
	writes:        Arc<AtomicUsize>,
	fail_writes:   Arc<AtomicBool>,
}

impl InMemoryPaymentRepository {
	pub fn new(methods: InMemoryPaymentMethodRepository) -> Self {
		Self {
			payments: Arc::new(RwLock::new(BTreeMap::new())),
			notifications: Arc::new(RwLock::new(HashMap::new())),
			methods,
			next_id: Arc::new(AtomicI64::new(0)),
			writes: Arc::new(AtomicUsize::new(0)),
			fail_writes: Arc::new(AtomicBool::new(false)),
		}
	}

	pub fn set_fail_writes(&self, fail: bool) {
		self.fail_writes.store(fail, Ordering::SeqCst);
	}

	pub fn write_count(&self) -> usize {
		self.writes.load(Ordering::SeqCst)
	}

	pub async fn len(&self) -> usize {
		self.payments.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}

	fn begin_write(&self) -> Result<(), StoreError> {
		self.writes.fetch_add(1, Ordering::SeqCst);
		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(StoreError::backend("write rejected"));
		}
		Ok(())
	}

	// Keeps the notification queue in step with a payment that was just
	// written. Payments already queued keep their place.
	fn sync_notification(
		queue: &mut HashMap<i64, OffsetDateTime>,
		payment: &Payment,
		now: OffsetDateTime,
	) {
		if payment.awaits_order_notification() {
			queue.entry(payment.id).or_insert(now);
		} else {
			queue.remove(&payment.id);
		}
	}
}

impl Default for InMemoryPaymentRepository {
	fn default() -> Self {
		Self::new(InMemoryPaymentMethodRepository::new())
	}
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
	async fn create(
		&self,
		_ctx: &RequestContext,
		payment: NewPayment,
	) -> Result<Payment, StoreError> {
		if payment.payment_method.id == 0 {
			return Err(StoreError::MissingPaymentMethod);
		}
		self.begin_write()?;

		let mut payments = self.payments.write().await;
		if payments.values().any(|p| p.order_id == payment.order_id) {
			return Err(StoreError::DuplicateOrder {
				order_id: payment.order_id,
			});
		}

		let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
		let payment = payment.into_payment(id, OffsetDateTime::now_utc());
		payments.insert(id, payment.clone());
		Self::sync_notification(
			&mut *self.notifications.write().await,
			&payment,
			payment.created_at,
		);
		Ok(payment)
	}

	async fn find_all(
		&self,
		_ctx: &RequestContext,
		filter: &PaymentFilter,
	) -> Result<Vec<Payment>, StoreError> {
		let payments = self.payments.read().await;
		Ok(payments
			.values()
			.filter(|p| filter.matches(p))
			.cloned()
			.collect())
	}

	async fn find_by_id(
		&self,
		_ctx: &RequestContext,
		id: i64,
	) -> Result<Payment, StoreError> {
		let payments = self.payments.read().await;
		payments.get(&id).cloned().ok_or(StoreError::NotFound)
	}

	async fn find_by_order_id(
		&self,
		_ctx: &RequestContext,
		order_id: &str,
	) -> Result<Option<Payment>, StoreError> {
		let payments = self.payments.read().await;
		Ok(payments.values().find(|p| p.order_id == order_id).cloned())
	}

	async fn update_status(
		&self,
		_ctx: &RequestContext,
		order_id: &str,
		status: PaymentStatus,
	) -> Result<(), StoreError> {
		self.begin_write()?;

		let mut payments = self.payments.write().await;
		if let Some(payment) = payments.values_mut().find(|p| p.order_id == order_id)
		{
			payment.status = status;
			Self::sync_notification(
				&mut *self.notifications.write().await,
				payment,
				OffsetDateTime::now_utc(),
			);
		}
		Ok(())
	}

	async fn find_payment_method_by_id(
		&self,
		_ctx: &RequestContext,
		id: i64,
	) -> Result<PaymentMethod, StoreError> {
		self.methods.get(id).await.ok_or(StoreError::NotFound)
	}

	async fn mark_order_notified(
		&self,
		_ctx: &RequestContext,
		payment_id: i64,
		notified_at: OffsetDateTime,
	) -> Result<(), StoreError> {
		self.begin_write()?;

		let mut payments = self.payments.write().await;
		let payment = payments.get_mut(&payment_id).ok_or(StoreError::NotFound)?;
		payment.order_notified_at = Some(notified_at);
		self.notifications.write().await.remove(&payment_id);
		Ok(())
	}

	async fn find_pending_notifications(
		&self,
		_ctx: &RequestContext,
		queued_before: OffsetDateTime,
		limit: usize,
	) -> Result<Vec<Payment>, StoreError> {
		let payments = self.payments.read().await;
		let queue = self.notifications.read().await;

		let mut due: Vec<(OffsetDateTime, i64)> = queue
			.iter()
			.filter(|(_, queued_at)| **queued_at <= queued_before)
			.map(|(id, queued_at)| (*queued_at, *id))
			.collect();
		due.sort_unstable();

		Ok(due
			.into_iter()
			.filter_map(|(_, id)| payments.get(&id))
			.filter(|p| p.awaits_order_notification())
			.take(limit)
			.cloned()
			.collect())
	}

	async fn requeue_notification(
		&self,
		_ctx: &RequestContext,
		payment_id: i64,
		queued_at: OffsetDateTime,
	) -> Result<(), StoreError> {
		self.begin_write()?;

		if let Some(entry) = self.notifications.write().await.get_mut(&payment_id) {
			*entry = queued_at;
		}
		Ok(())
	}
}
