use log::{error, info};
use time::OffsetDateTime;

use crate::domain::context::RequestContext;
use crate::domain::payment_method::{
	NewPaymentMethod, PaymentMethod, PaymentMethodFilter,
};
use crate::domain::repository::PaymentMethodRepository;
use crate::use_cases::dto::{CreatePaymentMethodCommand, UpdatePaymentMethodCommand};
use crate::use_cases::errors::PaymentMethodError;

#[derive(Clone)]
pub struct PaymentMethodUseCase<R: PaymentMethodRepository> {
	method_repo: R,
}

impl<R: PaymentMethodRepository> PaymentMethodUseCase<R> {
	pub fn new(method_repo: R) -> Self {
		Self { method_repo }
	}

	pub async fn find_all(
		&self,
		ctx: &RequestContext,
		filter: &PaymentMethodFilter,
	) -> Result<Vec<PaymentMethod>, PaymentMethodError> {
		ctx.run(self.method_repo.find_all(ctx, filter))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to get payment methods: {e}");
				PaymentMethodError::from(e)
			})
	}

	/// Soft-deleted methods are reported as missing.
	pub async fn find_by_id(
		&self,
		ctx: &RequestContext,
		id: i64,
	) -> Result<PaymentMethod, PaymentMethodError> {
		let method = ctx
			.run(self.method_repo.find_by_id(ctx, id))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to get payment method {id}: {e}");
				PaymentMethodError::from(e)
			})?;

		if method.is_deleted() {
			return Err(PaymentMethodError::NotFound);
		}
		Ok(method)
	}

	pub async fn create(
		&self,
		ctx: &RequestContext,
		command: CreatePaymentMethodCommand,
	) -> Result<PaymentMethod, PaymentMethodError> {
		validate(&command.name, &command.bank_code)?;

		let method = ctx
			.run(self.method_repo.create(ctx, NewPaymentMethod {
				name:      command.name,
				bank_code: command.bank_code,
			}))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to create payment method: {e}");
				PaymentMethodError::from(e)
			})?;

		info!("[{ctx}] Created payment method {}", method.id);
		Ok(method)
	}

	pub async fn update(
		&self,
		ctx: &RequestContext,
		id: i64,
		command: UpdatePaymentMethodCommand,
	) -> Result<PaymentMethod, PaymentMethodError> {
		validate(&command.name, &command.bank_code)?;

		let mut method = self.find_by_id(ctx, id).await?;
		method.name = command.name;
		method.bank_code = command.bank_code;
		method.updated_at = OffsetDateTime::now_utc();

		ctx.run(self.method_repo.update(ctx, method.clone()))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to update payment method {id}: {e}");
				PaymentMethodError::from(e)
			})?;

		Ok(method)
	}

	pub async fn delete(
		&self,
		ctx: &RequestContext,
		id: i64,
	) -> Result<(), PaymentMethodError> {
		let method = ctx
			.run(self.method_repo.find_by_id(ctx, id))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to find payment method {id} for deletion: {e}");
				PaymentMethodError::from(e)
			})?;

		if method.is_deleted() {
			error!("[{ctx}] Payment method {id} is already deleted");
			return Err(PaymentMethodError::AlreadyDeleted);
		}

		ctx.run(
			self.method_repo
				.delete(ctx, id, OffsetDateTime::now_utc()),
		)
		.await
		.map_err(|e| {
			error!("[{ctx}] Failed to delete payment method {id}: {e}");
			PaymentMethodError::from(e)
		})?;

		info!("[{ctx}] Successfully deleted payment method with ID: {id}");
		Ok(())
	}
}

fn validate(name: &str, bank_code: &str) -> Result<(), PaymentMethodError> {
	if name.trim().is_empty() {
		return Err(PaymentMethodError::Validation { field: "name" });
	}
	if bank_code.trim().is_empty() {
		return Err(PaymentMethodError::Validation { field: "bank_code" });
	}
	Ok(())
}
