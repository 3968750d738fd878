use std::time::Duration;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use payment_service::domain::context::RequestContext;
use payment_service::domain::services::{
	Order, OrderService, ServiceError, User, UserService,
};
use payment_service::infrastructure::clients::http_order_service::HttpOrderService;
use payment_service::infrastructure::clients::http_user_service::HttpUserService;
use payment_service::infrastructure::clients::request::REQUEST_ID_HEADER;
use reqwest::Client;
use uuid::Uuid;

async fn get_order(path: web::Path<String>) -> HttpResponse {
	match path.as_str() {
		"ORD-1" => HttpResponse::Ok().json(Order {
			id:      "ORD-1".to_string(),
			user_id: Some(42),
			status:  "PENDING".to_string(),
		}),
		"ORD-BROKEN" => HttpResponse::InternalServerError().finish(),
		"ORD-SLOW" => {
			tokio::time::sleep(Duration::from_millis(500)).await;
			HttpResponse::Ok().finish()
		}
		_ => HttpResponse::NotFound().finish(),
	}
}

async fn mark_paid(req: HttpRequest, path: web::Path<String>) -> HttpResponse {
	let has_request_id = req.headers().contains_key(REQUEST_ID_HEADER);
	match path.as_str() {
		"ORD-1" if has_request_id => HttpResponse::Ok().finish(),
		_ => HttpResponse::ServiceUnavailable().finish(),
	}
}

async fn get_user(path: web::Path<i64>) -> HttpResponse {
	match path.into_inner() {
		42 => HttpResponse::Ok().json(User {
			id:   42,
			name: "Ana".to_string(),
		}),
		7 => HttpResponse::Ok().body("not json"),
		_ => HttpResponse::NotFound().finish(),
	}
}

/// Serves fake order and user endpoints on a random local port.
async fn start_fake_services() -> String {
	let server = HttpServer::new(|| {
		App::new()
			.route("/orders/{id}", web::get().to(get_order))
			.route("/orders/{id}/paid", web::post().to(mark_paid))
			.route("/users/{id}", web::get().to(get_user))
	})
	.workers(1)
	.bind(("127.0.0.1", 0))
	.unwrap();
	let addr = server.addrs()[0];

	actix_web::rt::spawn(server.run());
	format!("http://{addr}/")
}

#[actix_web::test]
async fn test_order_lookup() {
	let base_url = start_fake_services().await;
	let orders = HttpOrderService::new(Client::new(), base_url);
	let ctx = RequestContext::new();

	let order = orders.get_order(&ctx, "ORD-1").await.unwrap().unwrap();
	assert_eq!(order.user_id, Some(42));

	assert_eq!(orders.get_order(&ctx, "ORD-404").await.unwrap(), None);
	assert!(matches!(
		orders.get_order(&ctx, "ORD-BROKEN").await,
		Err(ServiceError::UnexpectedStatus { status: 500 })
	));
}

#[actix_web::test]
async fn test_order_lookup_honours_deadline() {
	let base_url = start_fake_services().await;
	let orders = HttpOrderService::new(Client::new(), base_url);
	let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));

	let result = orders.get_order(&ctx, "ORD-SLOW").await;

	assert!(matches!(result, Err(ServiceError::DeadlineExceeded)));
}

#[actix_web::test]
async fn test_mark_order_paid_forwards_request_id() {
	let base_url = start_fake_services().await;
	let orders = HttpOrderService::new(Client::new(), base_url);
	let ctx = RequestContext::with_request_id(Uuid::new_v4());

	orders.mark_order_paid(&ctx, "ORD-1").await.unwrap();

	assert!(matches!(
		orders.mark_order_paid(&ctx, "ORD-2").await,
		Err(ServiceError::UnexpectedStatus { status: 503 })
	));
}

#[actix_web::test]
async fn test_unreachable_service_is_unavailable() {
	let orders = HttpOrderService::new(Client::new(), "http://127.0.0.1:1");

	let result = orders.get_order(&RequestContext::new(), "ORD-1").await;

	assert!(matches!(result, Err(ServiceError::Unavailable { .. })));
}

#[actix_web::test]
async fn test_user_lookup() {
	let base_url = start_fake_services().await;
	let users = HttpUserService::new(Client::new(), base_url);
	let ctx = RequestContext::new();

	let user = users.get_user(&ctx, 42).await.unwrap().unwrap();
	assert_eq!(user.name, "Ana");

	assert_eq!(users.get_user(&ctx, 1).await.unwrap(), None);
	assert!(matches!(
		users.get_user(&ctx, 7).await,
		Err(ServiceError::InvalidResponse { .. })
	));
}
