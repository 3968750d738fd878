use async_trait::async_trait;
use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::domain::context::{DeadlineExceeded, RequestContext};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Order {
	pub id:      String,
	#[serde(default)]
	pub user_id: Option<i64>,
	#[serde(default)]
	pub status:  String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct User {
	pub id:   i64,
	#[serde(default)]
	pub name: String,
}

#[derive(Debug, Display, Error)]
pub enum ServiceError {
	#[display("Service unavailable: {reason}")]
	Unavailable { reason: String },
	#[display("Service answered with status {status}")]
	UnexpectedStatus { status: u16 },
	#[display("Service response could not be decoded: {reason}")]
	InvalidResponse { reason: String },
	#[display("Circuit breaker is open")]
	CircuitOpen,
	#[display("Request deadline exceeded")]
	DeadlineExceeded,
}

impl From<DeadlineExceeded> for ServiceError {
	fn from(_: DeadlineExceeded) -> Self {
		ServiceError::DeadlineExceeded
	}
}

/// Order-side capability: existence lookup and the post-payment notification.
#[async_trait]
pub trait OrderService: Send + Sync + 'static {
	async fn get_order(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<Option<Order>, ServiceError>;
	async fn mark_order_paid(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait UserService: Send + Sync + 'static {
	async fn get_user(
		&self,
		ctx: &RequestContext,
		user_id: i64,
	) -> Result<Option<User>, ServiceError>;
}
