use log::{error, info, warn};
use time::OffsetDateTime;

use crate::domain::context::RequestContext;
use crate::domain::payment::{NewPayment, Payment, PaymentFilter, PaymentStatus};
use crate::domain::payment_method::PaymentMethod;
use crate::domain::repository::{PaymentRepository, StoreError};
use crate::domain::services::{OrderService, UserService};
use crate::use_cases::dto::ProcessPaymentCommand;
use crate::use_cases::errors::PaymentError;

/// Drives the payment workflow: validates the order and the user, persists
/// the payment and, for successful payments, tells the order service that the
/// order is paid.
///
/// Every downstream call is issued sequentially and wrapped in the caller's
/// [`RequestContext`]; a deadline that expires mid-workflow surfaces as the
/// error of the step it interrupted and nothing already committed is undone.
#[derive(Clone)]
pub struct PaymentOrchestrator<R, O, U>
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
{
	payment_repo:  R,
	order_service: O,
	user_service:  U,
}

impl<R, O, U> PaymentOrchestrator<R, O, U>
where
	R: PaymentRepository,
	O: OrderService,
	U: UserService,
{
	pub fn new(payment_repo: R, order_service: O, user_service: U) -> Self {
		Self {
			payment_repo,
			order_service,
			user_service,
		}
	}

	pub async fn process_payment(
		&self,
		ctx: &RequestContext,
		command: ProcessPaymentCommand,
	) -> Result<Payment, PaymentError> {
		let ProcessPaymentCommand {
			order_id,
			user_id,
			payment_method,
			status,
		} = command;

		if payment_method.id == 0 {
			error!("[{ctx}] Payment method is missing for order {order_id}");
			return Err(PaymentError::InvalidPaymentMethod { method_id: 0 });
		}

		info!("[{ctx}] Processing payment for order {order_id}");

		match ctx.run(self.order_service.get_order(ctx, &order_id)).await {
			Ok(Some(_)) => {}
			Ok(None) => {
				error!("[{ctx}] Invalid order {order_id}: not found");
				return Err(PaymentError::InvalidOrder { order_id });
			}
			Err(e) => {
				error!("[{ctx}] Invalid order {order_id}: {e}");
				return Err(PaymentError::InvalidOrder { order_id });
			}
		}

		match ctx.run(self.user_service.get_user(ctx, user_id)).await {
			Ok(Some(_)) => {}
			Ok(None) => {
				error!("[{ctx}] Invalid user {user_id}: not found");
				return Err(PaymentError::InvalidUser { user_id });
			}
			Err(e) => {
				error!("[{ctx}] Invalid user {user_id}: {e}");
				return Err(PaymentError::InvalidUser { user_id });
			}
		}

		if !payment_method.is_assignable() {
			error!(
				"[{ctx}] Payment method {} cannot be assigned to order {order_id}",
				payment_method.id
			);
			return Err(PaymentError::InvalidPaymentMethod {
				method_id: payment_method.id,
			});
		}

		let new_payment = NewPayment {
			order_id: order_id.clone(),
			user_id,
			payment_method,
			status,
		};

		let mut payment = match ctx
			.run(self.payment_repo.create(ctx, new_payment))
			.await
		{
			Ok(payment) => payment,
			Err(StoreError::DuplicateOrder { order_id }) => {
				warn!("[{ctx}] Payment for order {order_id} already exists");
				return Err(PaymentError::DuplicatePayment { order_id });
			}
			Err(StoreError::MissingPaymentMethod) => {
				error!("[{ctx}] Store rejected payment without a method");
				return Err(PaymentError::InvalidPaymentMethod { method_id: 0 });
			}
			Err(e) => {
				error!("[{ctx}] Failed to save payment for order {order_id}: {e}");
				return Err(PaymentError::PersistenceError(e));
			}
		};

		if status == PaymentStatus::Success {
			if let Err(e) = ctx
				.run(self.order_service.mark_order_paid(ctx, &order_id))
				.await
			{
				// The payment stays committed; reconciliation retries the
				// notification later.
				error!(
					"[{ctx}] Failed to mark order {order_id} as paid (payment {}): \
					 {e}",
					payment.id
				);
				return Err(PaymentError::OrderNotificationError {
					order_id,
					source: e,
				});
			}
			info!("[{ctx}] Order {order_id} marked as PAID");

			let notified_at = OffsetDateTime::now_utc();
			match self
				.payment_repo
				.mark_order_notified(ctx, payment.id, notified_at)
				.await
			{
				Ok(()) => payment.order_notified_at = Some(notified_at),
				Err(e) => warn!(
					"[{ctx}] Could not record notification for payment {}: {e}",
					payment.id
				),
			}
		}

		info!(
			"[{ctx}] Payment {} processed successfully for order {order_id}",
			payment.id
		);
		Ok(payment)
	}

	pub async fn confirm_payment(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<(), PaymentError> {
		self.settle_as_success(ctx, order_id).await?;
		info!("[{ctx}] Payment confirmed for order {order_id}");
		Ok(())
	}

	/// Flips the payment of `order_id` to `success` without re-validating the
	/// order or the user.
	pub async fn mark_payment_paid(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<(), PaymentError> {
		self.settle_as_success(ctx, order_id).await?;
		info!("[{ctx}] Payment for order {order_id} marked as paid");
		Ok(())
	}

	pub async fn get_payment_status(
		&self,
		ctx: &RequestContext,
		payment_id: i64,
	) -> Result<Payment, PaymentError> {
		self.get_payment_by_id(ctx, payment_id).await
	}

	pub async fn get_payment_by_id(
		&self,
		ctx: &RequestContext,
		payment_id: i64,
	) -> Result<Payment, PaymentError> {
		ctx.run(self.payment_repo.find_by_id(ctx, payment_id))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to get payment {payment_id}: {e}");
				PaymentError::from_lookup(e)
			})
	}

	pub async fn get_payment_by_order_id(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<Option<Payment>, PaymentError> {
		ctx.run(self.payment_repo.find_by_order_id(ctx, order_id))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to get payment for order {order_id}: {e}");
				PaymentError::PersistenceError(e)
			})
	}

	pub async fn get_payments(
		&self,
		ctx: &RequestContext,
		filter: &PaymentFilter,
	) -> Result<Vec<Payment>, PaymentError> {
		ctx.run(self.payment_repo.find_all(ctx, filter))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to get payments: {e}");
				PaymentError::PersistenceError(e)
			})
	}

	pub async fn get_payment_method_by_id(
		&self,
		ctx: &RequestContext,
		method_id: i64,
	) -> Result<PaymentMethod, PaymentError> {
		match ctx
			.run(self.payment_repo.find_payment_method_by_id(ctx, method_id))
			.await
		{
			Ok(method) => Ok(method),
			Err(StoreError::NotFound) => {
				error!("[{ctx}] Payment method {method_id} not found");
				Err(PaymentError::PaymentMethodNotFound { method_id })
			}
			Err(e) => {
				error!("[{ctx}] Failed to get payment method {method_id}: {e}");
				Err(PaymentError::PersistenceError(e))
			}
		}
	}

	async fn settle_as_success(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<(), PaymentError> {
		let payment = match self.get_payment_by_order_id(ctx, order_id).await? {
			Some(payment) => payment,
			None => {
				error!("[{ctx}] Payment not found for order {order_id}");
				return Err(PaymentError::NotFound);
			}
		};

		if payment.status == PaymentStatus::Success {
			return Ok(());
		}

		let next = payment
			.status
			.transition_to(PaymentStatus::Success)
			.inspect_err(|e| error!("[{ctx}] Payment {}: {e}", payment.id))?;

		ctx.run(self.payment_repo.update_status(ctx, order_id, next))
			.await
			.map_err(|e| {
				error!("[{ctx}] Failed to update payment status: {e}");
				PaymentError::PersistenceError(e)
			})
	}
}
