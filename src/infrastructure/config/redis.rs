pub const PAYMENT_ID_SEQUENCE_KEY: &str = "payments:id_seq";
pub const PAYMENTS_INDEX_KEY: &str = "payments:ids";
pub const PENDING_NOTIFICATIONS_KEY: &str = "payments:pending_notifications";
pub const PAYMENT_METHOD_ID_SEQUENCE_KEY: &str = "payment_methods:id_seq";
pub const PAYMENT_METHODS_INDEX_KEY: &str = "payment_methods:ids";

pub fn payment_key(payment_id: i64) -> String {
	format!("payment:{payment_id}")
}

pub fn payment_order_key(order_id: &str) -> String {
	format!("payments:order:{order_id}")
}

pub fn payment_method_key(method_id: i64) -> String {
	format!("payment_method:{method_id}")
}
