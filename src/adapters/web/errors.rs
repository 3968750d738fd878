use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, error};
use derive_more::derive::{Display, Error};
use serde::Serialize;

use crate::use_cases::errors::{PaymentError, PaymentMethodError};

#[derive(Serialize)]
struct ErrorResponse {
	#[serde(rename = "statusCode")]
	status_code: u16,
	error:       String,
	message:     String,
}

#[derive(Debug, Display, Error)]
pub enum ApiError {
	#[display("{message}")]
	BadClientDataError { message: String },
	#[display("{message}")]
	NotFoundError { message: String },
	#[display("{message}")]
	ConflictError { message: String },
	#[display("{message}")]
	ValidationError { message: String },
	#[display("{message}")]
	InternalServerError { message: String },
}

impl ApiError {
	pub fn bad_request(message: impl Into<String>) -> Self {
		ApiError::BadClientDataError {
			message: message.into(),
		}
	}

	pub fn name(&self) -> String {
		match self {
			ApiError::BadClientDataError { .. } => "Bad request".to_string(),
			ApiError::NotFoundError { .. } => "Not Found".to_string(),
			ApiError::ConflictError { .. } => "Conflict".to_string(),
			ApiError::ValidationError { .. } => "Unprocessable Entity".to_string(),
			ApiError::InternalServerError { .. } => {
				"Internal Server Error".to_string()
			}
		}
	}
}

impl error::ResponseError for ApiError {
	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.content_type(ContentType::json())
			.json(ErrorResponse {
				status_code: self.status_code().as_u16(),
				error:       self.to_string(),
				message:     self.name(),
			})
	}

	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadClientDataError { .. } => StatusCode::BAD_REQUEST,
			ApiError::NotFoundError { .. } => StatusCode::NOT_FOUND,
			ApiError::ConflictError { .. } => StatusCode::CONFLICT,
			ApiError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
			ApiError::InternalServerError { .. } => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl From<PaymentError> for ApiError {
	fn from(err: PaymentError) -> Self {
		let message = err.to_string();
		match err {
			PaymentError::InvalidOrder { .. } |
			PaymentError::InvalidUser { .. } |
			PaymentError::InvalidPaymentMethod { .. } |
			PaymentError::PaymentMethodNotFound { .. } => {
				ApiError::BadClientDataError { message }
			}
			PaymentError::NotFound => ApiError::NotFoundError { message },
			PaymentError::DuplicatePayment { .. } |
			PaymentError::InvalidTransition(_) => ApiError::ConflictError { message },
			PaymentError::PersistenceError(_) |
			PaymentError::OrderNotificationError { .. } => {
				ApiError::InternalServerError { message }
			}
		}
	}
}

impl From<PaymentMethodError> for ApiError {
	fn from(err: PaymentMethodError) -> Self {
		let message = err.to_string();
		match err {
			PaymentMethodError::NotFound => ApiError::NotFoundError { message },
			PaymentMethodError::AlreadyDeleted => ApiError::ConflictError { message },
			PaymentMethodError::Validation { .. } => {
				ApiError::ValidationError { message }
			}
			PaymentMethodError::Persistence(_) => {
				ApiError::InternalServerError { message }
			}
		}
	}
}
