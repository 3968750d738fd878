use async_trait::async_trait;
use log::debug;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};
use time::OffsetDateTime;

use crate::domain::context::RequestContext;
use crate::domain::payment::{NewPayment, Payment, PaymentFilter, PaymentStatus};
use crate::domain::payment_method::PaymentMethod;
use crate::domain::repository::{PaymentRepository, StoreError};
use crate::infrastructure::config::redis::{
	PAYMENT_ID_SEQUENCE_KEY, PAYMENTS_INDEX_KEY, PENDING_NOTIFICATIONS_KEY,
	payment_key, payment_method_key, payment_order_key,
};

/// Payments live as one JSON document per id, indexed by a sorted set of ids
/// and by a one-to-one order id key. Successful payments that still owe the
/// order service a notification are queued in a sorted set scored by the
/// unix millisecond they were queued at.
#[derive(Clone)]
pub struct RedisPaymentRepository {
	client: Client,
}

const MAX_UPDATE_ATTEMPTS: usize = 5;

fn unix_millis(at: OffsetDateTime) -> i64 {
	(at.unix_timestamp_nanos() / 1_000_000) as i64
}

impl RedisPaymentRepository {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
		self.client
			.get_multiplexed_async_connection()
			.await
			.map_err(StoreError::backend)
	}

	// Claims the order id and writes the document in one step, so a rejected
	// duplicate leaves nothing behind.
	fn create_payment_lua() -> Script {
		Script::new(
			r#"
            if redis.call("SETNX", KEYS[2], ARGV[1]) == 0 then
                return 0
            end
            redis.call("SET", KEYS[1], ARGV[2])
            redis.call("ZADD", KEYS[3], ARGV[1], ARGV[1])
            if ARGV[3] == "1" then
                redis.call("ZADD", KEYS[4], ARGV[4], ARGV[1])
            end
            return 1
        "#,
		)
	}

	// Replaces the document only if it still reads exactly as it did when it
	// was loaded, and keeps the notification queue in step with it.
	fn replace_payment_lua() -> Script {
		Script::new(
			r#"
            if redis.call("GET", KEYS[1]) ~= ARGV[1] then
                return 0
            end
            redis.call("SET", KEYS[1], ARGV[2])
            if ARGV[4] == "1" then
                redis.call("ZADD", KEYS[2], "NX", ARGV[5], ARGV[3])
            else
                redis.call("ZREM", KEYS[2], ARGV[3])
            end
            return 1
        "#,
		)
	}

	async fn load(
		con: &mut MultiplexedConnection,
		payment_id: i64,
	) -> Result<Option<Payment>, StoreError> {
		let document: Option<String> = con
			.get(payment_key(payment_id))
			.await
			.map_err(StoreError::backend)?;

		document
			.map(|json| serde_json::from_str(&json).map_err(StoreError::backend))
			.transpose()
	}

	async fn load_many(
		con: &mut MultiplexedConnection,
		payment_ids: &[i64],
	) -> Result<Vec<Payment>, StoreError> {
		if payment_ids.is_empty() {
			return Ok(Vec::new());
		}

		let keys: Vec<String> = payment_ids.iter().map(|id| payment_key(*id)).collect();
		let documents: Vec<Option<String>> =
			con.mget(&keys).await.map_err(StoreError::backend)?;

		documents
			.into_iter()
			.flatten()
			.map(|json| serde_json::from_str(&json).map_err(StoreError::backend))
			.collect()
	}

	/// Applies `change` to the stored payment with compare-and-set, retrying
	/// when another writer got there first. `Ok(None)` when there is no such
	/// payment.
	async fn modify<F>(
		con: &mut MultiplexedConnection,
		payment_id: i64,
		change: F,
	) -> Result<Option<Payment>, StoreError>
	where
		F: Fn(&mut Payment) + Send,
	{
		for _ in 0..MAX_UPDATE_ATTEMPTS {
			let current: Option<String> = con
				.get(payment_key(payment_id))
				.await
				.map_err(StoreError::backend)?;
			let Some(current) = current else {
				return Ok(None);
			};

			let mut payment: Payment =
				serde_json::from_str(&current).map_err(StoreError::backend)?;
			change(&mut payment);
			let document = serde_json::to_string(&payment).map_err(StoreError::backend)?;

			let replaced: i32 = Self::replace_payment_lua()
				.key(payment_key(payment_id))
				.key(PENDING_NOTIFICATIONS_KEY)
				.arg(current)
				.arg(document)
				.arg(payment_id)
				.arg(if payment.awaits_order_notification() { "1" } else { "0" })
				.arg(unix_millis(OffsetDateTime::now_utc()))
				.invoke_async(con)
				.await
				.map_err(StoreError::backend)?;

			if replaced == 1 {
				return Ok(Some(payment));
			}
		}

		Err(StoreError::backend(format!(
			"payment {payment_id} kept changing during update"
		)))
	}
}

#[async_trait]
impl PaymentRepository for RedisPaymentRepository {
	async fn create(
		&self,
		ctx: &RequestContext,
		payment: NewPayment,
	) -> Result<Payment, StoreError> {
		if payment.payment_method.id == 0 {
			return Err(StoreError::MissingPaymentMethod);
		}

		let mut con = self.connection().await?;

		let payment_id: i64 = con
			.incr(PAYMENT_ID_SEQUENCE_KEY, 1)
			.await
			.map_err(StoreError::backend)?;
		let payment = payment.into_payment(payment_id, OffsetDateTime::now_utc());
		let document = serde_json::to_string(&payment).map_err(StoreError::backend)?;

		let created: i32 = Self::create_payment_lua()
			.key(payment_key(payment.id))
			.key(payment_order_key(&payment.order_id))
			.key(PAYMENTS_INDEX_KEY)
			.key(PENDING_NOTIFICATIONS_KEY)
			.arg(payment.id)
			.arg(document)
			.arg(if payment.awaits_order_notification() { "1" } else { "0" })
			.arg(unix_millis(payment.created_at))
			.invoke_async(&mut con)
			.await
			.map_err(StoreError::backend)?;

		if created == 0 {
			return Err(StoreError::DuplicateOrder {
				order_id: payment.order_id,
			});
		}

		debug!("[{ctx}] Stored payment {} for order {}", payment.id, payment.order_id);
		Ok(payment)
	}

	async fn find_all(
		&self,
		_ctx: &RequestContext,
		filter: &PaymentFilter,
	) -> Result<Vec<Payment>, StoreError> {
		let mut con = self.connection().await?;

		let payment_ids: Vec<i64> = match &filter.order_id {
			Some(order_id) => con
				.get::<_, Option<i64>>(payment_order_key(order_id))
				.await
				.map_err(StoreError::backend)?
				.into_iter()
				.collect(),
			None => con
				.zrange(PAYMENTS_INDEX_KEY, 0, -1)
				.await
				.map_err(StoreError::backend)?,
		};

		let payments = Self::load_many(&mut con, &payment_ids).await?;
		Ok(payments.into_iter().filter(|p| filter.matches(p)).collect())
	}

	async fn find_by_id(
		&self,
		_ctx: &RequestContext,
		id: i64,
	) -> Result<Payment, StoreError> {
		let mut con = self.connection().await?;
		Self::load(&mut con, id).await?.ok_or(StoreError::NotFound)
	}

	async fn find_by_order_id(
		&self,
		_ctx: &RequestContext,
		order_id: &str,
	) -> Result<Option<Payment>, StoreError> {
		let mut con = self.connection().await?;

		let payment_id: Option<i64> = con
			.get(payment_order_key(order_id))
			.await
			.map_err(StoreError::backend)?;

		match payment_id {
			Some(id) => Self::load(&mut con, id).await,
			None => Ok(None),
		}
	}

	async fn update_status(
		&self,
		ctx: &RequestContext,
		order_id: &str,
		status: PaymentStatus,
	) -> Result<(), StoreError> {
		let mut con = self.connection().await?;

		let payment_id: Option<i64> = con
			.get(payment_order_key(order_id))
			.await
			.map_err(StoreError::backend)?;

		let updated = match payment_id {
			Some(id) => Self::modify(&mut con, id, |payment| payment.status = status).await?,
			None => None,
		};
		if updated.is_none() {
			debug!("[{ctx}] No payment to update for order {order_id}");
		}
		Ok(())
	}

	async fn find_payment_method_by_id(
		&self,
		_ctx: &RequestContext,
		id: i64,
	) -> Result<PaymentMethod, StoreError> {
		let mut con = self.connection().await?;

		let document: Option<String> = con
			.get(payment_method_key(id))
			.await
			.map_err(StoreError::backend)?;

		match document {
			Some(json) => serde_json::from_str(&json).map_err(StoreError::backend),
			None => Err(StoreError::NotFound),
		}
	}

	async fn mark_order_notified(
		&self,
		_ctx: &RequestContext,
		payment_id: i64,
		notified_at: OffsetDateTime,
	) -> Result<(), StoreError> {
		let mut con = self.connection().await?;

		Self::modify(&mut con, payment_id, |payment| {
			payment.order_notified_at = Some(notified_at)
		})
		.await?
		.map(|_| ())
		.ok_or(StoreError::NotFound)
	}

	async fn find_pending_notifications(
		&self,
		_ctx: &RequestContext,
		queued_before: OffsetDateTime,
		limit: usize,
	) -> Result<Vec<Payment>, StoreError> {
		let mut con = self.connection().await?;

		let payment_ids: Vec<i64> = con
			.zrangebyscore_limit(
				PENDING_NOTIFICATIONS_KEY,
				"-inf",
				unix_millis(queued_before),
				0,
				limit as isize,
			)
			.await
			.map_err(StoreError::backend)?;

		let payments = Self::load_many(&mut con, &payment_ids).await?;
		Ok(payments
			.into_iter()
			.filter(Payment::awaits_order_notification)
			.collect())
	}

	async fn requeue_notification(
		&self,
		ctx: &RequestContext,
		payment_id: i64,
		queued_at: OffsetDateTime,
	) -> Result<(), StoreError> {
		let mut con = self.connection().await?;

		redis::cmd("ZADD")
			.arg(PENDING_NOTIFICATIONS_KEY)
			.arg("XX")
			.arg(unix_millis(queued_at))
			.arg(payment_id)
			.query_async::<()>(&mut con)
			.await
			.map_err(StoreError::backend)?;

		debug!("[{ctx}] Requeued order notification for payment {payment_id}");
		Ok(())
	}
}
