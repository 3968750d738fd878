use async_trait::async_trait;
use log::debug;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use time::OffsetDateTime;

use crate::domain::context::RequestContext;
use crate::domain::payment_method::{
	NewPaymentMethod, PaymentMethod, PaymentMethodFilter,
};
use crate::domain::repository::{PaymentMethodRepository, StoreError};
use crate::infrastructure::config::redis::{
	PAYMENT_METHOD_ID_SEQUENCE_KEY, PAYMENT_METHODS_INDEX_KEY, payment_method_key,
};

#[derive(Clone)]
pub struct RedisPaymentMethodRepository {
	client: Client,
}

impl RedisPaymentMethodRepository {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	async fn connection(&self) -> Result<MultiplexedConnection, StoreError> {
		self.client
			.get_multiplexed_async_connection()
			.await
			.map_err(StoreError::backend)
	}

	async fn load(
		con: &mut MultiplexedConnection,
		method_id: i64,
	) -> Result<PaymentMethod, StoreError> {
		let document: Option<String> = con
			.get(payment_method_key(method_id))
			.await
			.map_err(StoreError::backend)?;

		match document {
			Some(json) => serde_json::from_str(&json).map_err(StoreError::backend),
			None => Err(StoreError::NotFound),
		}
	}

	async fn store(
		con: &mut MultiplexedConnection,
		method: &PaymentMethod,
	) -> Result<(), StoreError> {
		let document = serde_json::to_string(method).map_err(StoreError::backend)?;

		redis::pipe()
			.atomic()
			.set(payment_method_key(method.id), document)
			.ignore()
			.zadd(PAYMENT_METHODS_INDEX_KEY, method.id, method.id)
			.ignore()
			.query_async::<()>(con)
			.await
			.map_err(StoreError::backend)
	}
}

#[async_trait]
impl PaymentMethodRepository for RedisPaymentMethodRepository {
	async fn find_all(
		&self,
		_ctx: &RequestContext,
		filter: &PaymentMethodFilter,
	) -> Result<Vec<PaymentMethod>, StoreError> {
		let mut con = self.connection().await?;

		let method_ids: Vec<i64> = con
			.zrange(PAYMENT_METHODS_INDEX_KEY, 0, -1)
			.await
			.map_err(StoreError::backend)?;
		if method_ids.is_empty() {
			return Ok(Vec::new());
		}

		let keys: Vec<String> =
			method_ids.iter().map(|id| payment_method_key(*id)).collect();
		let documents: Vec<Option<String>> =
			con.mget(&keys).await.map_err(StoreError::backend)?;

		let mut methods = Vec::with_capacity(documents.len());
		for json in documents.into_iter().flatten() {
			let method: PaymentMethod =
				serde_json::from_str(&json).map_err(StoreError::backend)?;
			if !method.is_deleted() && filter.matches(&method) {
				methods.push(method);
			}
		}
		Ok(methods)
	}

	async fn find_by_id(
		&self,
		_ctx: &RequestContext,
		id: i64,
	) -> Result<PaymentMethod, StoreError> {
		let mut con = self.connection().await?;
		Self::load(&mut con, id).await
	}

	async fn create(
		&self,
		ctx: &RequestContext,
		method: NewPaymentMethod,
	) -> Result<PaymentMethod, StoreError> {
		let mut con = self.connection().await?;

		let method_id: i64 = con
			.incr(PAYMENT_METHOD_ID_SEQUENCE_KEY, 1)
			.await
			.map_err(StoreError::backend)?;
		let now = OffsetDateTime::now_utc();
		let method = PaymentMethod {
			id:         method_id,
			name:       method.name,
			bank_code:  method.bank_code,
			created_at: now,
			updated_at: now,
			deleted_at: None,
		};

		Self::store(&mut con, &method).await?;
		debug!("[{ctx}] Stored payment method {}", method.id);
		Ok(method)
	}

	async fn update(
		&self,
		_ctx: &RequestContext,
		method: PaymentMethod,
	) -> Result<(), StoreError> {
		let mut con = self.connection().await?;

		let current = Self::load(&mut con, method.id).await?;
		if current.is_deleted() {
			return Err(StoreError::NotFound);
		}

		Self::store(&mut con, &method).await
	}

	async fn delete(
		&self,
		ctx: &RequestContext,
		id: i64,
		deleted_at: OffsetDateTime,
	) -> Result<(), StoreError> {
		let mut con = self.connection().await?;

		let mut method = Self::load(&mut con, id).await?;
		if method.is_deleted() {
			debug!("[{ctx}] Payment method {id} was already deleted");
			return Ok(());
		}
		method.deleted_at = Some(deleted_at);

		Self::store(&mut con, &method).await
	}
}
