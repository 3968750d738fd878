use std::fmt::Display;

use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use time::OffsetDateTime;

use crate::domain::context::{DeadlineExceeded, RequestContext};
use crate::domain::payment::{NewPayment, Payment, PaymentFilter, PaymentStatus};
use crate::domain::payment_method::{
	NewPaymentMethod, PaymentMethod, PaymentMethodFilter,
};

#[derive(Debug, Display, Error)]
pub enum StoreError {
	#[display("Record not found")]
	NotFound,
	#[display("Payment method ID is required")]
	MissingPaymentMethod,
	#[display("A payment already exists for order {order_id}")]
	DuplicateOrder { order_id: String },
	#[display("Storage backend error: {reason}")]
	Backend { reason: String },
	#[display("Request deadline exceeded")]
	DeadlineExceeded,
}

impl StoreError {
	pub fn backend(err: impl Display) -> Self {
		StoreError::Backend {
			reason: err.to_string(),
		}
	}
}

impl From<DeadlineExceeded> for StoreError {
	fn from(_: DeadlineExceeded) -> Self {
		StoreError::DeadlineExceeded
	}
}

#[async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
	/// Persists a new payment. At most one payment may exist per order id.
	async fn create(
		&self,
		ctx: &RequestContext,
		payment: NewPayment,
	) -> Result<Payment, StoreError>;
	async fn find_all(
		&self,
		ctx: &RequestContext,
		filter: &PaymentFilter,
	) -> Result<Vec<Payment>, StoreError>;
	/// Direct lookup: a missing payment is `StoreError::NotFound`.
	async fn find_by_id(
		&self,
		ctx: &RequestContext,
		id: i64,
	) -> Result<Payment, StoreError>;
	/// Existence probe: a missing payment is `Ok(None)`.
	async fn find_by_order_id(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<Option<Payment>, StoreError>;
	async fn update_status(
		&self,
		ctx: &RequestContext,
		order_id: &str,
		status: PaymentStatus,
	) -> Result<(), StoreError>;
	async fn find_payment_method_by_id(
		&self,
		ctx: &RequestContext,
		id: i64,
	) -> Result<PaymentMethod, StoreError>;
	async fn mark_order_notified(
		&self,
		ctx: &RequestContext,
		payment_id: i64,
		notified_at: OffsetDateTime,
	) -> Result<(), StoreError>;
	/// Successful payments whose order notification is still outstanding and
	/// that were queued at or before `queued_before`, longest waiting first.
	/// A payment is queued when it becomes successful.
	async fn find_pending_notifications(
		&self,
		ctx: &RequestContext,
		queued_before: OffsetDateTime,
		limit: usize,
	) -> Result<Vec<Payment>, StoreError>;
	/// Moves an outstanding notification to the back of the queue. A no-op
	/// once the payment no longer awaits notification.
	async fn requeue_notification(
		&self,
		ctx: &RequestContext,
		payment_id: i64,
		queued_at: OffsetDateTime,
	) -> Result<(), StoreError>;
}

#[async_trait]
pub trait PaymentMethodRepository: Send + Sync + 'static {
	/// Non-deleted methods only.
	async fn find_all(
		&self,
		ctx: &RequestContext,
		filter: &PaymentMethodFilter,
	) -> Result<Vec<PaymentMethod>, StoreError>;
	/// Returns soft-deleted methods too; callers decide what a deleted
	/// method means for them.
	async fn find_by_id(
		&self,
		ctx: &RequestContext,
		id: i64,
	) -> Result<PaymentMethod, StoreError>;
	async fn create(
		&self,
		ctx: &RequestContext,
		method: NewPaymentMethod,
	) -> Result<PaymentMethod, StoreError>;
	async fn update(
		&self,
		ctx: &RequestContext,
		method: PaymentMethod,
	) -> Result<(), StoreError>;
	async fn delete(
		&self,
		ctx: &RequestContext,
		id: i64,
		deleted_at: OffsetDateTime,
	) -> Result<(), StoreError>;
}
