use std::time::Duration;

use log::{error, info, warn};
use time::OffsetDateTime;

use crate::domain::context::RequestContext;
use crate::domain::payment::Payment;
use crate::domain::repository::{PaymentRepository, StoreError};
use crate::domain::services::OrderService;
use crate::use_cases::dto::ReconciliationReport;

/// Re-sends "mark order paid" for successful payments whose notification
/// never got through, and stamps each payment once the order service accepts
/// it.
///
/// A payment is only picked up once it has been queued for `settle_after`,
/// leaving the request that committed it time to send the first
/// notification itself. Failed attempts go to the back of the queue so a
/// payment the order service keeps rejecting cannot hold up the others.
#[derive(Clone)]
pub struct ReconcileNotificationsUseCase<R: PaymentRepository, O: OrderService> {
	payment_repo:    R,
	order_service:   O,
	attempt_timeout: Duration,
	settle_after:    Duration,
}

impl<R: PaymentRepository, O: OrderService> ReconcileNotificationsUseCase<R, O> {
	pub fn new(
		payment_repo: R,
		order_service: O,
		attempt_timeout: Duration,
		settle_after: Duration,
	) -> Self {
		Self {
			payment_repo,
			order_service,
			attempt_timeout,
			settle_after,
		}
	}

	pub async fn execute(
		&self,
		ctx: &RequestContext,
		batch_size: usize,
	) -> Result<ReconciliationReport, StoreError> {
		let queued_before = OffsetDateTime::now_utc() - self.settle_after;
		let scan_ctx = ctx.bounded(self.attempt_timeout);
		let pending = scan_ctx
			.run(self.payment_repo.find_pending_notifications(
				&scan_ctx,
				queued_before,
				batch_size,
			))
			.await?;

		let mut report = ReconciliationReport {
			scanned: pending.len(),
			..Default::default()
		};

		for payment in pending {
			let call_ctx = ctx.bounded(self.attempt_timeout);
			if let Err(e) = call_ctx
				.run(self.order_service.mark_order_paid(&call_ctx, &payment.order_id))
				.await
			{
				warn!(
					"[{ctx}] Order {} still not marked as paid (payment {}): {e}",
					payment.order_id, payment.id
				);
				report.failed += 1;
				self.requeue(ctx, &payment).await;
				continue;
			}

			let stamp_ctx = ctx.bounded(self.attempt_timeout);
			match stamp_ctx
				.run(self.payment_repo.mark_order_notified(
					&stamp_ctx,
					payment.id,
					OffsetDateTime::now_utc(),
				))
				.await
			{
				Ok(()) => {
					info!(
						"[{ctx}] Order {} marked as PAID by reconciliation",
						payment.order_id
					);
					report.notified += 1;
				}
				Err(e) => {
					error!(
						"[{ctx}] Order {} notified but payment {} not stamped: {e}",
						payment.order_id, payment.id
					);
					report.failed += 1;
				}
			}
		}

		Ok(report)
	}

	async fn requeue(&self, ctx: &RequestContext, payment: &Payment) {
		let requeue_ctx = ctx.bounded(self.attempt_timeout);
		if let Err(e) = requeue_ctx
			.run(self.payment_repo.requeue_notification(
				&requeue_ctx,
				payment.id,
				OffsetDateTime::now_utc(),
			))
			.await
		{
			error!("[{ctx}] Failed to requeue payment {}: {e}", payment.id);
		}
	}
}
