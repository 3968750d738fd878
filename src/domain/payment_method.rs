use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PaymentMethod {
	pub id:         i64,
	pub name:       String,
	pub bank_code:  String,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	#[serde(
		with = "time::serde::rfc3339::option",
		skip_serializing_if = "Option::is_none",
		default
	)]
	pub deleted_at: Option<OffsetDateTime>,
}

impl PaymentMethod {
	pub fn is_deleted(&self) -> bool {
		self.deleted_at.is_some()
	}

	/// A method can back a new payment only when it has been persisted and
	/// has not been soft-deleted.
	pub fn is_assignable(&self) -> bool {
		self.id != 0 && !self.is_deleted()
	}
}

#[derive(Debug, Clone)]
pub struct NewPaymentMethod {
	pub name:      String,
	pub bank_code: String,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct PaymentMethodFilter {
	pub name:      Option<String>,
	pub bank_code: Option<String>,
}

impl PaymentMethodFilter {
	pub fn matches(&self, method: &PaymentMethod) -> bool {
		self.name.as_ref().is_none_or(|name| &method.name == name) &&
			self.bank_code
				.as_ref()
				.is_none_or(|code| &method.bank_code == code)
	}
}
