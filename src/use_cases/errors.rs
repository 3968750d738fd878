use derive_more::derive::{Display, Error};

use crate::domain::payment::StatusTransitionError;
use crate::domain::repository::StoreError;
use crate::domain::services::ServiceError;

#[derive(Debug, Display, Error)]
pub enum PaymentError {
	#[display("Invalid order {order_id}")]
	InvalidOrder { order_id: String },
	#[display("Invalid user {user_id}")]
	InvalidUser { user_id: i64 },
	#[display("Invalid payment method ID {method_id}")]
	InvalidPaymentMethod { method_id: i64 },
	#[display("Payment method {method_id} not found")]
	PaymentMethodNotFound { method_id: i64 },
	#[display("Payment not found")]
	NotFound,
	#[display("A payment already exists for order {order_id}")]
	DuplicatePayment { order_id: String },
	#[display("{_0}")]
	InvalidTransition(StatusTransitionError),
	#[display("Failed to save payment: {_0}")]
	PersistenceError(StoreError),
	#[display("Failed to mark order {order_id} as paid: {source}")]
	OrderNotificationError {
		order_id: String,
		source:   ServiceError,
	},
}

impl From<StatusTransitionError> for PaymentError {
	fn from(err: StatusTransitionError) -> Self {
		PaymentError::InvalidTransition(err)
	}
}

impl PaymentError {
	/// Lookups share one translation: a missing row is `NotFound`, anything
	/// else is a storage failure.
	pub fn from_lookup(err: StoreError) -> Self {
		match err {
			StoreError::NotFound => PaymentError::NotFound,
			other => PaymentError::PersistenceError(other),
		}
	}
}

#[derive(Debug, Display, Error)]
pub enum PaymentMethodError {
	#[display("Payment method not found")]
	NotFound,
	#[display("Payment method is already deleted")]
	AlreadyDeleted,
	#[display("Invalid payment method: {field} is required")]
	Validation { field: &'static str },
	#[display("Payment method storage failed: {_0}")]
	Persistence(StoreError),
}

impl From<StoreError> for PaymentMethodError {
	fn from(err: StoreError) -> Self {
		match err {
			StoreError::NotFound => PaymentMethodError::NotFound,
			other => PaymentMethodError::Persistence(other),
		}
	}
}
