use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use payment_service::adapters::web::handlers::routes;
use payment_service::adapters::web::schema::{
	GetPaymentStatusRpcResponse, ProcessPaymentRpcResponse,
};
use payment_service::domain::payment::PaymentStatusWire;
use payment_service::infrastructure::clients::in_memory_order_service::InMemoryOrderService;
use payment_service::infrastructure::clients::in_memory_user_service::InMemoryUserService;
use payment_service::infrastructure::persistence::in_memory_payment_method_repository::InMemoryPaymentMethodRepository;
use payment_service::infrastructure::persistence::in_memory_payment_repository::InMemoryPaymentRepository;
use serde_json::json;

mod support;

use crate::support::fixtures::{ORDER_ID, TestWorld, USER_ID};

macro_rules! test_app {
	($world:expr) => {
		test::init_service(
			App::new()
				.app_data(web::Data::new($world.orchestrator.clone()))
				.app_data(web::Data::new($world.method_use_case.clone()))
				.configure(
					routes::<
						InMemoryPaymentRepository,
						InMemoryOrderService,
						InMemoryUserService,
						InMemoryPaymentMethodRepository,
					>,
				),
		)
		.await
	};
}

#[actix_web::test]
async fn test_process_payment_rpc() {
	let (world, method) = TestWorld::seeded().await;
	let app = test_app!(world);

	let req = test::TestRequest::post()
		.uri("/rpc/payments/process")
		.set_json(json!({
			"orderId": ORDER_ID,
			"userId": USER_ID,
			"paymentMethodId": method.id,
			"status": "PAYMENT_STATUS_SUCCESS",
		}))
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::OK);
	let body: ProcessPaymentRpcResponse = test::read_body_json(resp).await;
	assert_eq!(body.payment_id, "1");
	assert_eq!(body.order_id, ORDER_ID);
	assert_eq!(body.payment_method_id, method.id);
	assert_eq!(body.status, PaymentStatusWire::Success);
	assert_eq!(body.transaction_id, "");
	assert_eq!(world.orders.paid_orders().await, vec![ORDER_ID.to_string()]);
}

#[actix_web::test]
async fn test_process_payment_rpc_rejects_before_downstream_calls() {
	let (world, method) = TestWorld::seeded().await;
	let app = test_app!(world);

	let bodies = [
		json!({ "orderId": ORDER_ID, "userId": USER_ID, "status": "PENDING" }),
		json!({
			"orderId": ORDER_ID,
			"userId": USER_ID,
			"paymentMethodId": method.id,
			"status": "UNSPECIFIED",
		}),
		json!({
			"orderId": ORDER_ID,
			"userId": USER_ID,
			"paymentMethodId": method.id,
			"status": "REFUNDED",
		}),
	];

	for body in bodies {
		let req = test::TestRequest::post()
			.uri("/rpc/payments/process")
			.set_json(body)
			.to_request();
		let resp = test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	assert_eq!(world.orders.get_calls(), 0);
	assert_eq!(world.users.get_calls(), 0);
	assert!(world.payments.is_empty().await);
}

#[actix_web::test]
async fn test_process_payment_rpc_unknown_method_is_bad_request() {
	let (world, _) = TestWorld::seeded().await;
	let app = test_app!(world);

	let req = test::TestRequest::post()
		.uri("/rpc/payments/process")
		.set_json(json!({
			"orderId": ORDER_ID,
			"userId": USER_ID,
			"paymentMethodId": 77,
			"status": "PENDING",
		}))
		.to_request();
	let resp = test::call_service(&app, req).await;

	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	assert_eq!(world.orders.get_calls(), 0);
}

#[actix_web::test]
async fn test_get_payment_status_rpc() {
	let (world, method) = TestWorld::seeded().await;
	let app = test_app!(world);

	let req = test::TestRequest::post()
		.uri("/rpc/payments/process")
		.set_json(json!({
			"orderId": ORDER_ID,
			"userId": USER_ID,
			"paymentMethodId": method.id,
			"status": "PENDING",
		}))
		.to_request();
	let created: ProcessPaymentRpcResponse =
		test::call_and_read_body_json(&app, req).await;

	let req = test::TestRequest::get()
		.uri(&format!("/rpc/payments/{}/status", created.payment_id))
		.to_request();
	let status: GetPaymentStatusRpcResponse =
		test::call_and_read_body_json(&app, req).await;

	assert_eq!(status.payment_id, created.payment_id);
	assert_eq!(status.status, PaymentStatusWire::Pending);
	assert_eq!(status.payment_method.payment_method_id, method.id);
	assert_eq!(status.payment_method.bank_code, "BT");

	let req = test::TestRequest::get()
		.uri("/rpc/payments/not-a-number/status")
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

	let req = test::TestRequest::get()
		.uri("/rpc/payments/999/status")
		.to_request();
	let resp = test::call_service(&app, req).await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
