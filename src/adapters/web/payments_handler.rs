use actix_web::{HttpRequest, HttpResponse, web};
use log::{info, warn};

use crate::adapters::web::context::context_for;
use crate::adapters::web::errors::ApiError;
use crate::adapters::web::schema::{
	CreatePaymentRequest, PaymentResponse, PaymentsQuery,
};
use crate::domain::payment::PaymentStatus;
use crate::domain::repository::{PaymentMethodRepository, PaymentRepository};
use crate::domain::services::{OrderService, UserService};
use crate::use_cases::dto::ProcessPaymentCommand;
use crate::use_cases::payment_methods::PaymentMethodUseCase;
use crate::use_cases::payment_orchestrator::PaymentOrchestrator;

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<i64, ApiError> {
	raw.parse::<i64>()
		.map_err(|_| ApiError::bad_request(format!("Invalid {what} ID")))
}

pub async fn create_payment<R, O, U, M>(
	req: HttpRequest,
	payload: web::Json<CreatePaymentRequest>,
	orchestrator: web::Data<PaymentOrchestrator<R, O, U>>,
	method_use_case: web::Data<PaymentMethodUseCase<M>>,
) -> Result<HttpResponse, ApiError>
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
	M: PaymentMethodRepository,
{
	let ctx = context_for(&req);
	let payload = payload.into_inner();

	let payment_method = method_use_case
		.find_by_id(&ctx, payload.payment_method_id)
		.await
		.map_err(|e| {
			warn!(
				"[{ctx}] Payment method {} rejected: {e}",
				payload.payment_method_id
			);
			ApiError::bad_request("Invalid payment method")
		})?;

	let command = ProcessPaymentCommand {
		order_id: payload.order_id,
		user_id: payload.user_id,
		payment_method,
		status: PaymentStatus::from_request_text(&payload.payment_status),
	};

	let payment = orchestrator.process_payment(&ctx, command).await?;
	Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

pub async fn get_payments<R, O, U>(
	req: HttpRequest,
	query: web::Query<PaymentsQuery>,
	orchestrator: web::Data<PaymentOrchestrator<R, O, U>>,
) -> Result<HttpResponse, ApiError>
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
{
	let ctx = context_for(&req);
	let filter = query.into_inner().into_filter().map_err(ApiError::bad_request)?;

	let payments = orchestrator.get_payments(&ctx, &filter).await?;
	let body: Vec<PaymentResponse> =
		payments.into_iter().map(PaymentResponse::from).collect();

	Ok(HttpResponse::Ok().json(body))
}

pub async fn get_payment_by_id<R, O, U>(
	req: HttpRequest,
	path: web::Path<String>,
	orchestrator: web::Data<PaymentOrchestrator<R, O, U>>,
) -> Result<HttpResponse, ApiError>
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
{
	let ctx = context_for(&req);
	let payment_id = parse_id(&path, "payment")?;

	let payment = orchestrator.get_payment_by_id(&ctx, payment_id).await?;
	Ok(HttpResponse::Ok().json(PaymentResponse::from(payment)))
}

/// Responds with `null` when the order has no payment.
pub async fn get_payment_by_order_id<R, O, U>(
	req: HttpRequest,
	path: web::Path<String>,
	orchestrator: web::Data<PaymentOrchestrator<R, O, U>>,
) -> Result<HttpResponse, ApiError>
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
{
	let ctx = context_for(&req);

	let payment = orchestrator.get_payment_by_order_id(&ctx, &path).await?;
	Ok(HttpResponse::Ok().json(payment.map(PaymentResponse::from)))
}

pub async fn confirm_payment<R, O, U>(
	req: HttpRequest,
	path: web::Path<String>,
	orchestrator: web::Data<PaymentOrchestrator<R, O, U>>,
) -> Result<HttpResponse, ApiError>
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
{
	let ctx = context_for(&req);
	let order_id = path.into_inner();

	orchestrator.confirm_payment(&ctx, &order_id).await?;
	info!("[{ctx}] Confirmed payment for order {order_id}");

	Ok(HttpResponse::NoContent().finish())
}
