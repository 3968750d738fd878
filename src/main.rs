use std::sync::Arc;

use payment_service::infrastructure::config::settings::Config;
use payment_service::run;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
	let config = Arc::new(Config::load().map_err(|e| {
		std::io::Error::new(
			std::io::ErrorKind::InvalidInput,
			format!("Failed to load configuration: {e}"),
		)
	})?);
	run(config).await
}
