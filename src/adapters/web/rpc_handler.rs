use actix_web::{HttpRequest, HttpResponse, web};
use log::{info, warn};

use crate::adapters::web::context::context_for;
use crate::adapters::web::errors::ApiError;
use crate::adapters::web::payments_handler::parse_id;
use crate::adapters::web::schema::{
	GetPaymentStatusRpcResponse, ProcessPaymentRpcRequest, ProcessPaymentRpcResponse,
};
use crate::domain::payment::PaymentStatus;
use crate::domain::repository::PaymentRepository;
use crate::domain::services::{OrderService, UserService};
use crate::use_cases::dto::ProcessPaymentCommand;
use crate::use_cases::errors::PaymentError;
use crate::use_cases::payment_orchestrator::PaymentOrchestrator;

/// RPC flavour of payment creation. The method id and the wire status are
/// checked before anything downstream is called.
pub async fn process_payment<R, O, U>(
	req: HttpRequest,
	payload: web::Json<ProcessPaymentRpcRequest>,
	orchestrator: web::Data<PaymentOrchestrator<R, O, U>>,
) -> Result<HttpResponse, ApiError>
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
{
	let ctx = context_for(&req);
	let payload = payload.into_inner();
	info!("[{ctx}] Processing payment for order {}", payload.order_id);

	if payload.payment_method_id == 0 {
		warn!("[{ctx}] Payment method is missing");
		return Err(ApiError::bad_request("Payment method is required"));
	}

	let status = PaymentStatus::try_from(payload.status).map_err(|e| {
		warn!("[{ctx}] Invalid payment status in request: {e}");
		ApiError::bad_request("Invalid payment status")
	})?;

	let payment_method = orchestrator
		.get_payment_method_by_id(&ctx, payload.payment_method_id)
		.await
		.map_err(|e| match e {
			PaymentError::PaymentMethodNotFound { .. } => {
				ApiError::bad_request(format!("Invalid payment method: {e}"))
			}
			other => ApiError::from(other),
		})?;

	let payment = orchestrator
		.process_payment(&ctx, ProcessPaymentCommand {
			order_id: payload.order_id,
			user_id: payload.user_id,
			payment_method,
			status,
		})
		.await?;

	Ok(HttpResponse::Ok().json(ProcessPaymentRpcResponse::from(payment)))
}

pub async fn get_payment_status<R, O, U>(
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
	info!("[{ctx}] Fetching payment status for payment {}", path.as_str());

	let payment_id = parse_id(&path, "payment")?;
	let payment = orchestrator.get_payment_status(&ctx, payment_id).await?;

	Ok(HttpResponse::Ok().json(GetPaymentStatusRpcResponse::from(payment)))
}
