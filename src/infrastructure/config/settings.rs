use std::time::Duration;

use serde::Deserialize;

fn default_server_port() -> u16 {
	3200
}

fn default_request_timeout_ms() -> u64 {
	5000
}

fn default_reconciliation_batch_size() -> usize {
	50
}

fn default_reconciliation_interval_ms() -> u64 {
	500
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
	pub redis_url: String,
	pub order_service_url: String,
	pub user_service_url: String,
	#[serde(default = "default_server_port")]
	pub server_port: u16,
	pub server_keepalive: u64,
	#[serde(default = "default_request_timeout_ms")]
	pub request_timeout_ms: u64,
	#[serde(default = "default_reconciliation_batch_size")]
	pub reconciliation_batch_size: usize,
	#[serde(default = "default_reconciliation_interval_ms")]
	pub reconciliation_interval_ms: u64,
	/// How long a successful payment waits before reconciliation may notify
	/// its order. Defaults to the request timeout.
	pub reconciliation_settle_ms: Option<u64>,
}

impl Config {
	pub fn load() -> Result<Self, config::ConfigError> {
		let config_builder = config::Config::builder()
			.add_source(config::Environment::with_prefix("APP"))
			.build()?;

		config_builder.try_deserialize()
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}

	pub fn reconciliation_interval(&self) -> Duration {
		Duration::from_millis(self.reconciliation_interval_ms)
	}

	pub fn reconciliation_settle_after(&self) -> Duration {
		self.reconciliation_settle_ms
			.map(Duration::from_millis)
			.unwrap_or_else(|| self.request_timeout())
	}
}

#[cfg(test)]
mod tests {
	use std::env;

	use super::*;

	// Both cases share the process environment, so they run as one test.
	#[test]
	fn test_config_load() {
		unsafe {
			env::set_var("APP_REDIS_URL", "redis://test_redis/");
			env::set_var("APP_ORDER_SERVICE_URL", "http://test_orders/");
			env::set_var("APP_USER_SERVICE_URL", "http://test_users/");
			env::set_var("APP_SERVER_KEEPALIVE", "120");
			env::set_var("APP_SERVER_PORT", "8080");
			env::set_var("APP_REQUEST_TIMEOUT_MS", "750");
			env::set_var("APP_RECONCILIATION_BATCH_SIZE", "10");
			env::set_var("APP_RECONCILIATION_SETTLE_MS", "2000");
		};

		let config = Config::load().expect("Failed to load config in test");

		assert_eq!(config.redis_url, "redis://test_redis/");
		assert_eq!(config.order_service_url, "http://test_orders/");
		assert_eq!(config.user_service_url, "http://test_users/");
		assert_eq!(config.server_keepalive, 120);
		assert_eq!(config.server_port, 8080);
		assert_eq!(config.request_timeout(), Duration::from_millis(750));
		assert_eq!(config.reconciliation_batch_size, 10);
		assert_eq!(config.reconciliation_interval(), Duration::from_millis(500));
		assert_eq!(config.reconciliation_settle_after(), Duration::from_millis(2000));

		unsafe {
			env::remove_var("APP_SERVER_PORT");
			env::remove_var("APP_REQUEST_TIMEOUT_MS");
			env::remove_var("APP_RECONCILIATION_BATCH_SIZE");
			env::remove_var("APP_RECONCILIATION_SETTLE_MS");
		}

		let defaults = Config::load().expect("Failed to load config in test");

		assert_eq!(defaults.server_port, 3200);
		assert_eq!(defaults.request_timeout(), Duration::from_millis(5000));
		assert_eq!(defaults.reconciliation_batch_size, 50);
		assert_eq!(defaults.reconciliation_settle_after(), defaults.request_timeout());

		unsafe {
			env::remove_var("APP_REDIS_URL");
			env::remove_var("APP_ORDER_SERVICE_URL");
			env::remove_var("APP_USER_SERVICE_URL");
			env::remove_var("APP_SERVER_KEEPALIVE");
		}
	}
}
