use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::payment::{Payment, PaymentFilter, PaymentStatus, PaymentStatusWire};
use crate::domain::payment_method::{PaymentMethod, PaymentMethodFilter};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreatePaymentRequest {
	pub order_id:          String,
	pub user_id:           i64,
	pub payment_method_id: i64,
	#[serde(default)]
	pub payment_status:    String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentMethodResponse {
	pub id:         i64,
	pub name:       String,
	pub bank_code:  String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}

impl From<PaymentMethod> for PaymentMethodResponse {
	fn from(method: PaymentMethod) -> Self {
		Self {
			id:         method.id,
			name:       method.name,
			bank_code:  method.bank_code,
			created_at: method.created_at,
			updated_at: method.updated_at,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentResponse {
	pub id:                i64,
	pub order_id:          String,
	pub user_id:           i64,
	pub payment_method_id: i64,
	pub payment_method:    PaymentMethodResponse,
	pub status:            PaymentStatus,
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub transaction_id:    Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at:        OffsetDateTime,
}

impl From<Payment> for PaymentResponse {
	fn from(payment: Payment) -> Self {
		Self {
			id:                payment.id,
			order_id:          payment.order_id,
			user_id:           payment.user_id,
			payment_method_id: payment.payment_method_id,
			payment_method:    payment.payment_method.into(),
			status:            payment.status,
			transaction_id:    payment.transaction_id,
			created_at:        payment.created_at,
		}
	}
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PaymentsQuery {
	pub order_id:          Option<String>,
	pub user_id:           Option<i64>,
	pub payment_method_id: Option<i64>,
	pub status:            Option<String>,
}

impl PaymentsQuery {
	/// Unlike payment creation, a status filter must name a real status.
	pub fn into_filter(self) -> Result<PaymentFilter, String> {
		let status = self
			.status
			.map(|s| s.parse::<PaymentStatus>())
			.transpose()
			.map_err(|e| e.to_string())?;

		Ok(PaymentFilter {
			order_id: self.order_id,
			user_id: self.user_id,
			payment_method_id: self.payment_method_id,
			status,
		})
	}
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PaymentMethodRequest {
	#[serde(default)]
	pub name:      String,
	#[serde(default)]
	pub bank_code: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PaymentMethodsQuery {
	pub name:      Option<String>,
	pub bank_code: Option<String>,
}

impl From<PaymentMethodsQuery> for PaymentMethodFilter {
	fn from(query: PaymentMethodsQuery) -> Self {
		Self {
			name:      query.name,
			bank_code: query.bank_code,
		}
	}
}

/// Envelope used by the payment-method endpoints.
#[derive(Debug, Deserialize, Serialize)]
pub struct ApiResponse<T> {
	pub status:  u16,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data:    Option<T>,
}

impl<T> ApiResponse<T> {
	pub fn data(status: u16, data: T) -> Self {
		Self {
			status,
			message: None,
			data: Some(data),
		}
	}

	pub fn message(status: u16, message: impl Into<String>) -> Self {
		Self {
			status,
			message: Some(message.into()),
			data: None,
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRpcRequest {
	pub order_id:          String,
	pub user_id:           i64,
	#[serde(default)]
	pub payment_method_id: i64,
	#[serde(default = "unspecified_status")]
	pub status:            PaymentStatusWire,
}

fn unspecified_status() -> PaymentStatusWire {
	PaymentStatusWire::Unspecified
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRpcResponse {
	pub payment_id:        String,
	pub order_id:          String,
	pub user_id:           i64,
	pub payment_method_id: i64,
	pub status:            PaymentStatusWire,
	pub transaction_id:    String,
}

impl From<Payment> for ProcessPaymentRpcResponse {
	fn from(payment: Payment) -> Self {
		Self {
			payment_id:        payment.id.to_string(),
			order_id:          payment.order_id,
			user_id:           payment.user_id,
			payment_method_id: payment.payment_method.id,
			status:            payment.status.into(),
			transaction_id:    payment.transaction_id.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RpcPaymentMethod {
	pub payment_method_id: i64,
	pub name:              String,
	pub bank_code:         String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GetPaymentStatusRpcResponse {
	pub payment_id:     String,
	pub order_id:       String,
	pub user_id:        i64,
	pub payment_method: RpcPaymentMethod,
	pub status:         PaymentStatusWire,
	pub transaction_id: String,
}

impl From<Payment> for GetPaymentStatusRpcResponse {
	fn from(payment: Payment) -> Self {
		Self {
			payment_id:     payment.id.to_string(),
			order_id:       payment.order_id,
			user_id:        payment.user_id,
			payment_method: RpcPaymentMethod {
				payment_method_id: payment.payment_method.id,
				name:              payment.payment_method.name,
				bank_code:         payment.payment_method.bank_code,
			},
			status:         payment.status.into(),
			transaction_id: payment.transaction_id.unwrap_or_default(),
		}
	}
}
