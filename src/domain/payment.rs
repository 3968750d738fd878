use std::fmt;
use std::str::FromStr;

use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::payment_method::PaymentMethod;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
	Pending,
	Success,
	Failed,
}

#[derive(Debug, Display, Error, Clone, PartialEq)]
#[display("Cannot move payment from {from} to {to}")]
pub struct StatusTransitionError {
	pub from: PaymentStatus,
	pub to:   PaymentStatus,
}

#[derive(Debug, Display, Error, Clone, PartialEq)]
#[display("Unknown payment status '{value}'")]
pub struct UnknownStatusError {
	pub value: String,
}

impl PaymentStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			PaymentStatus::Pending => "pending",
			PaymentStatus::Success => "success",
			PaymentStatus::Failed => "failed",
		}
	}

	/// Lenient mapping used by the create-payment endpoint: anything that is
	/// not `success` or `failed` becomes `pending`.
	pub fn from_request_text(text: &str) -> Self {
		match text {
			"success" => PaymentStatus::Success,
			"failed" => PaymentStatus::Failed,
			_ => PaymentStatus::Pending,
		}
	}

	pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
		*self == next || matches!(self, PaymentStatus::Pending)
	}

	/// Applies a status change. Staying on the same status is accepted as a
	/// no-op; leaving a terminal status is rejected.
	pub fn transition_to(
		self,
		next: PaymentStatus,
	) -> Result<PaymentStatus, StatusTransitionError> {
		if self.can_transition_to(next) {
			Ok(next)
		} else {
			Err(StatusTransitionError {
				from: self,
				to:   next,
			})
		}
	}
}

impl fmt::Display for PaymentStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PaymentStatus {
	type Err = UnknownStatusError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(PaymentStatus::Pending),
			"success" => Ok(PaymentStatus::Success),
			"failed" => Ok(PaymentStatus::Failed),
			other => Err(UnknownStatusError {
				value: other.to_string(),
			}),
		}
	}
}

/// Status enumeration as it travels over the RPC boundary.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatusWire {
	#[serde(alias = "PAYMENT_STATUS_PENDING")]
	Pending,
	#[serde(alias = "PAYMENT_STATUS_SUCCESS")]
	Success,
	#[serde(alias = "PAYMENT_STATUS_FAILED")]
	Failed,
	#[serde(other)]
	Unspecified,
}

impl From<PaymentStatus> for PaymentStatusWire {
	fn from(status: PaymentStatus) -> Self {
		match status {
			PaymentStatus::Pending => PaymentStatusWire::Pending,
			PaymentStatus::Success => PaymentStatusWire::Success,
			PaymentStatus::Failed => PaymentStatusWire::Failed,
		}
	}
}

impl TryFrom<PaymentStatusWire> for PaymentStatus {
	type Error = UnknownStatusError;

	fn try_from(wire: PaymentStatusWire) -> Result<Self, Self::Error> {
		match wire {
			PaymentStatusWire::Pending => Ok(PaymentStatus::Pending),
			PaymentStatusWire::Success => Ok(PaymentStatus::Success),
			PaymentStatusWire::Failed => Ok(PaymentStatus::Failed),
			PaymentStatusWire::Unspecified => Err(UnknownStatusError {
				value: "UNSPECIFIED".to_string(),
			}),
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Payment {
	pub id:                i64,
	pub order_id:          String,
	pub user_id:           i64,
	pub payment_method_id: i64,
	pub payment_method:    PaymentMethod,
	pub status:            PaymentStatus,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub transaction_id:    Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at:        OffsetDateTime,
	#[serde(
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none",
		default
	)]
	pub order_notified_at: Option<OffsetDateTime>,
}

impl Payment {
	/// True for successful payments whose owning order has not yet
	/// acknowledged the "mark order paid" notification.
	pub fn awaits_order_notification(&self) -> bool {
		self.status == PaymentStatus::Success && self.order_notified_at.is_none()
	}
}

/// A payment that has not been persisted yet; the store assigns `id` and
/// `created_at`.
#[derive(Debug, Clone)]
pub struct NewPayment {
	pub order_id:       String,
	pub user_id:        i64,
	pub payment_method: PaymentMethod,
	pub status:         PaymentStatus,
}

impl NewPayment {
	pub fn into_payment(self, id: i64, created_at: OffsetDateTime) -> Payment {
		Payment {
			id,
			order_id: self.order_id,
			user_id: self.user_id,
			payment_method_id: self.payment_method.id,
			payment_method: self.payment_method,
			status: self.status,
			transaction_id: None,
			created_at,
			order_notified_at: None,
		}
	}
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct PaymentFilter {
	pub order_id:          Option<String>,
	pub user_id:           Option<i64>,
	pub payment_method_id: Option<i64>,
	pub status:            Option<PaymentStatus>,
}

impl PaymentFilter {
	pub fn matches(&self, payment: &Payment) -> bool {
		self.order_id
			.as_ref()
			.is_none_or(|order_id| &payment.order_id == order_id) &&
			self.user_id.is_none_or(|user_id| payment.user_id == user_id) &&
			self.payment_method_id
				.is_none_or(|method_id| payment.payment_method_id == method_id) &&
			self.status.is_none_or(|status| payment.status == status)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn new_payment(status: PaymentStatus) -> NewPayment {
		NewPayment {
			order_id: "ORD-1".to_string(),
			user_id: 7,
			payment_method: PaymentMethod {
				id:         4,
				name:       "Bank Transfer".to_string(),
				bank_code:  "BT".to_string(),
				created_at: OffsetDateTime::UNIX_EPOCH,
				updated_at: OffsetDateTime::UNIX_EPOCH,
				deleted_at: None,
			},
			status,
		}
	}

	#[test]
	fn test_pending_can_move_to_any_terminal_status() {
		assert_eq!(
			PaymentStatus::Pending.transition_to(PaymentStatus::Success),
			Ok(PaymentStatus::Success)
		);
		assert_eq!(
			PaymentStatus::Pending.transition_to(PaymentStatus::Failed),
			Ok(PaymentStatus::Failed)
		);
	}

	#[test]
	fn test_terminal_statuses_only_accept_themselves() {
		assert_eq!(
			PaymentStatus::Success.transition_to(PaymentStatus::Success),
			Ok(PaymentStatus::Success)
		);
		assert!(PaymentStatus::Failed.transition_to(PaymentStatus::Success).is_err());
		assert!(PaymentStatus::Success.transition_to(PaymentStatus::Failed).is_err());
		assert!(PaymentStatus::Success.transition_to(PaymentStatus::Pending).is_err());
	}

	#[test]
	fn test_request_text_defaults_to_pending() {
		assert_eq!(
			PaymentStatus::from_request_text("success"),
			PaymentStatus::Success
		);
		assert_eq!(
			PaymentStatus::from_request_text("failed"),
			PaymentStatus::Failed
		);
		assert_eq!(
			PaymentStatus::from_request_text("refunded"),
			PaymentStatus::Pending
		);
		assert_eq!(PaymentStatus::from_request_text(""), PaymentStatus::Pending);
	}

	#[test]
	fn test_wire_mapping_is_bijective() {
		for status in [
			PaymentStatus::Pending,
			PaymentStatus::Success,
			PaymentStatus::Failed,
		] {
			let wire = PaymentStatusWire::from(status);
			assert_eq!(PaymentStatus::try_from(wire), Ok(status));
		}
		assert!(PaymentStatus::try_from(PaymentStatusWire::Unspecified).is_err());
	}

	#[test]
	fn test_wire_names() {
		assert_eq!(
			serde_json::to_string(&PaymentStatusWire::Success).unwrap(),
			"\"SUCCESS\""
		);
		let prefixed: PaymentStatusWire =
			serde_json::from_str("\"PAYMENT_STATUS_FAILED\"").unwrap();
		assert_eq!(prefixed, PaymentStatusWire::Failed);
		let unknown: PaymentStatusWire =
			serde_json::from_str("\"REFUNDED\"").unwrap();
		assert_eq!(unknown, PaymentStatusWire::Unspecified);
		assert_eq!(
			serde_json::to_string(&PaymentStatusWire::Unspecified).unwrap(),
			"\"UNSPECIFIED\""
		);
	}

	#[test]
	fn test_status_parses_strictly() {
		assert_eq!(
			"pending".parse::<PaymentStatus>(),
			Ok(PaymentStatus::Pending)
		);
		assert!("PENDING".parse::<PaymentStatus>().is_err());
	}

	#[test]
	fn test_into_payment_snapshots_method() {
		let payment = new_payment(PaymentStatus::Success)
			.into_payment(12, OffsetDateTime::UNIX_EPOCH);

		assert_eq!(payment.id, 12);
		assert_eq!(payment.payment_method_id, 4);
		assert_eq!(payment.payment_method.bank_code, "BT");
		assert!(payment.transaction_id.is_none());
		assert!(payment.awaits_order_notification());
	}

	#[test]
	fn test_filter_matches() {
		let payment = new_payment(PaymentStatus::Pending)
			.into_payment(1, OffsetDateTime::UNIX_EPOCH);
		let by_user = PaymentFilter {
			user_id: Some(7),
			..Default::default()
		};
		let by_status = PaymentFilter {
			status: Some(PaymentStatus::Success),
			..Default::default()
		};

		assert!(PaymentFilter::default().matches(&payment));
		assert!(by_user.matches(&payment));
		assert!(!by_status.matches(&payment));
	}
}
