use actix_web::{HttpRequest, HttpResponse, error, web};

use crate::adapters::web::errors::ApiError;
use crate::adapters::web::{payment_methods_handler, payments_handler, rpc_handler};
use crate::domain::repository::{PaymentMethodRepository, PaymentRepository};
use crate::domain::services::{OrderService, UserService};

pub async fn ping() -> HttpResponse {
	HttpResponse::Ok().body("pong!")
}

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
	ApiError::bad_request(format!("Invalid request body: {err}")).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
	ApiError::bad_request(format!("Invalid query: {err}")).into()
}

/// Registers every route. Expects the payment orchestrator and the payment
/// method use case for the given adapters as app data.
pub fn routes<R, O, U, M>(cfg: &mut web::ServiceConfig)
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
	M: PaymentMethodRepository,
{
	cfg.app_data(web::JsonConfig::default().error_handler(json_error))
		.app_data(web::QueryConfig::default().error_handler(query_error))
		.service(web::resource("/ping").route(web::get().to(ping)))
		.service(
			web::scope("/v1/payments")
				.service(
					web::resource("/create").route(
						web::post().to(payments_handler::create_payment::<R, O, U, M>),
					),
				)
				.service(
					web::resource(["", "/"])
						.route(web::get().to(payments_handler::get_payments::<R, O, U>)),
				)
				.service(web::resource("/order/{order_id}").route(
					web::get().to(payments_handler::get_payment_by_order_id::<R, O, U>),
				))
				.service(web::resource("/order/{order_id}/confirm").route(
					web::post().to(payments_handler::confirm_payment::<R, O, U>),
				))
				.service(web::resource("/{id}").route(
					web::get().to(payments_handler::get_payment_by_id::<R, O, U>),
				)),
		)
		.service(
			web::scope("/v1/payment-methods")
				.service(
					web::resource(["", "/"])
						.route(web::get().to(payment_methods_handler::find_all::<M>)),
				)
				.service(
					web::resource("/create")
						.route(web::post().to(payment_methods_handler::create::<M>)),
				)
				.service(
					web::resource("/update/{id}")
						.route(web::put().to(payment_methods_handler::update::<M>)),
				)
				.service(
					web::resource("/delete/{id}")
						.route(web::delete().to(payment_methods_handler::delete::<M>)),
				)
				.service(
					web::resource("/{id}")
						.route(web::get().to(payment_methods_handler::find_by_id::<M>)),
				),
		)
		.service(
			web::scope("/rpc/payments")
				.service(
					web::resource("/process")
						.route(web::post().to(rpc_handler::process_payment::<R, O, U>)),
				)
				.service(web::resource("/{payment_id}/status").route(
					web::get().to(rpc_handler::get_payment_status::<R, O, U>),
				)),
		);
}
