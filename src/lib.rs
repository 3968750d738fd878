use std::sync::Arc;
use std::time::Duration;

use actix_web::{App, HttpServer, web};
use log::{error, info};
use reqwest::Client;

pub mod domain {
	pub mod context;
	pub mod payment;
	pub mod payment_method;
	pub mod repository;
	pub mod services;
}

pub mod use_cases {
	pub mod dto;
	pub mod errors;
	pub mod payment_methods;
	pub mod payment_orchestrator;
	pub mod reconcile_notifications;
}

pub mod infrastructure {
	pub mod config {
		pub mod redis;
		pub mod settings;
	}
	pub mod persistence {
		pub mod in_memory_payment_method_repository;
		pub mod in_memory_payment_repository;
		pub mod redis_payment_method_repository;
		pub mod redis_payment_repository;
	}
	pub mod clients {
		pub mod http_order_service;
		pub mod http_user_service;
		pub mod in_memory_order_service;
		pub mod in_memory_user_service;
		pub mod request;
	}
	pub mod workers {
		pub mod notification_reconciliation_worker;
	}
}

pub mod adapters {
	pub mod web {
		pub mod context;
		pub mod errors;
		pub mod handlers;
		pub mod payment_methods_handler;
		pub mod payments_handler;
		pub mod rpc_handler;
		pub mod schema;
	}
}

use crate::adapters::web::context::RequestPolicy;
use crate::adapters::web::handlers::routes;
use crate::infrastructure::clients::http_order_service::HttpOrderService;
use crate::infrastructure::clients::http_user_service::HttpUserService;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::persistence::redis_payment_method_repository::RedisPaymentMethodRepository;
use crate::infrastructure::persistence::redis_payment_repository::RedisPaymentRepository;
use crate::infrastructure::workers::notification_reconciliation_worker::notification_reconciliation_worker;
use crate::use_cases::payment_methods::PaymentMethodUseCase;
use crate::use_cases::payment_orchestrator::PaymentOrchestrator;
use crate::use_cases::reconcile_notifications::ReconcileNotificationsUseCase;

pub async fn run(config: Arc<Config>) -> std::io::Result<()> {
	let _ = env_logger::try_init();

	let redis_client = redis::Client::open(config.redis_url.as_str())
		.map_err(|e| {
			error!("Invalid Redis URL {}: {e}", config.redis_url);
			std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
		})?;

	let http_client = Client::new();

	let payment_repo = RedisPaymentRepository::new(redis_client.clone());
	let method_repo = RedisPaymentMethodRepository::new(redis_client);
	let order_service =
		HttpOrderService::new(http_client.clone(), config.order_service_url.as_str());
	let user_service =
		HttpUserService::new(http_client, config.user_service_url.as_str());

	let orchestrator = PaymentOrchestrator::new(
		payment_repo.clone(),
		order_service.clone(),
		user_service,
	);
	let method_use_case = PaymentMethodUseCase::new(method_repo);
	let reconcile_use_case = ReconcileNotificationsUseCase::new(
		payment_repo,
		order_service,
		config.request_timeout(),
		config.reconciliation_settle_after(),
	);
	let policy = RequestPolicy {
		timeout: config.request_timeout(),
	};

	info!("Starting notification reconciliation worker...");
	tokio::spawn(notification_reconciliation_worker(
		reconcile_use_case,
		config.reconciliation_batch_size,
		config.reconciliation_interval(),
	));

	info!("Starting Actix-Web server on 0.0.0.0:{}...", config.server_port);
	HttpServer::new(move || {
		App::new()
			.app_data(web::Data::new(orchestrator.clone()))
			.app_data(web::Data::new(method_use_case.clone()))
			.app_data(web::Data::new(policy))
			.configure(
				routes::<
					RedisPaymentRepository,
					HttpOrderService,
					HttpUserService,
					RedisPaymentMethodRepository,
				>,
			)
	})
	.keep_alive(Duration::from_secs(config.server_keepalive))
	.bind(("0.0.0.0", config.server_port))?
	.run()
	.await
}
