use actix_web::{HttpRequest, HttpResponse, web};

use crate::adapters::web::context::context_for;
use crate::adapters::web::errors::ApiError;
use crate::adapters::web::payments_handler::parse_id;
use crate::adapters::web::schema::{
	ApiResponse, PaymentMethodRequest, PaymentMethodResponse, PaymentMethodsQuery,
};
use crate::domain::payment_method::PaymentMethodFilter;
use crate::domain::repository::PaymentMethodRepository;
use crate::use_cases::dto::{CreatePaymentMethodCommand, UpdatePaymentMethodCommand};
use crate::use_cases::payment_methods::PaymentMethodUseCase;

pub async fn find_all<M: PaymentMethodRepository>(
	req: HttpRequest,
	query: web::Query<PaymentMethodsQuery>,
	use_case: web::Data<PaymentMethodUseCase<M>>,
) -> Result<HttpResponse, ApiError> {
	let ctx = context_for(&req);
	let filter = PaymentMethodFilter::from(query.into_inner());

	let methods: Vec<PaymentMethodResponse> = use_case
		.find_all(&ctx, &filter)
		.await?
		.into_iter()
		.map(PaymentMethodResponse::from)
		.collect();

	Ok(HttpResponse::Ok().json(ApiResponse::data(200, methods)))
}

pub async fn find_by_id<M: PaymentMethodRepository>(
	req: HttpRequest,
	path: web::Path<String>,
	use_case: web::Data<PaymentMethodUseCase<M>>,
) -> Result<HttpResponse, ApiError> {
	let ctx = context_for(&req);
	let id = parse_id(&path, "payment method")?;

	let method = use_case.find_by_id(&ctx, id).await?;
	Ok(HttpResponse::Ok()
		.json(ApiResponse::data(200, PaymentMethodResponse::from(method))))
}

pub async fn create<M: PaymentMethodRepository>(
	req: HttpRequest,
	payload: web::Json<PaymentMethodRequest>,
	use_case: web::Data<PaymentMethodUseCase<M>>,
) -> Result<HttpResponse, ApiError> {
	let ctx = context_for(&req);
	let payload = payload.into_inner();

	let method = use_case
		.create(&ctx, CreatePaymentMethodCommand {
			name:      payload.name,
			bank_code: payload.bank_code,
		})
		.await?;

	Ok(HttpResponse::Created().json(ApiResponse {
		status:  201,
		message: Some("Payment method created successfully".to_string()),
		data:    Some(PaymentMethodResponse::from(method)),
	}))
}

pub async fn update<M: PaymentMethodRepository>(
	req: HttpRequest,
	path: web::Path<String>,
	payload: web::Json<PaymentMethodRequest>,
	use_case: web::Data<PaymentMethodUseCase<M>>,
) -> Result<HttpResponse, ApiError> {
	let ctx = context_for(&req);
	let id = parse_id(&path, "payment method")?;
	let payload = payload.into_inner();

	let method = use_case
		.update(&ctx, id, UpdatePaymentMethodCommand {
			name:      payload.name,
			bank_code: payload.bank_code,
		})
		.await?;

	Ok(HttpResponse::Ok().json(ApiResponse {
		status:  200,
		message: Some("Payment method updated successfully".to_string()),
		data:    Some(PaymentMethodResponse::from(method)),
	}))
}

pub async fn delete<M: PaymentMethodRepository>(
	req: HttpRequest,
	path: web::Path<String>,
	use_case: web::Data<PaymentMethodUseCase<M>>,
) -> Result<HttpResponse, ApiError> {
	let ctx = context_for(&req);
	let id = parse_id(&path, "payment method")?;

	use_case.delete(&ctx, id).await?;

	Ok(HttpResponse::Ok().json(ApiResponse::<()>::message(
		200,
		"Payment method deleted successfully",
	)))
}
