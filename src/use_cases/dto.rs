use serde::{Deserialize, Serialize};

use crate::domain::payment::PaymentStatus;
use crate::domain::payment_method::PaymentMethod;

#[derive(Debug, Clone)]
pub struct ProcessPaymentCommand {
	pub order_id:       String,
	pub user_id:        i64,
	pub payment_method: PaymentMethod,
	pub status:         PaymentStatus,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CreatePaymentMethodCommand {
	pub name:      String,
	pub bank_code: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UpdatePaymentMethodCommand {
	pub name:      String,
	pub bank_code: String,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationReport {
	pub scanned:  usize,
	pub notified: usize,
	pub failed:   usize,
}

impl ReconciliationReport {
	pub fn is_clean(&self) -> bool {
		self.failed == 0
	}
}
