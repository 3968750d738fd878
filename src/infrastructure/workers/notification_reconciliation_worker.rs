use std::time::Duration;

use log::{error, info, warn};
use tokio::time::sleep;

use crate::domain::context::RequestContext;
use crate::domain::repository::PaymentRepository;
use crate::domain::services::OrderService;
use crate::use_cases::reconcile_notifications::ReconcileNotificationsUseCase;

/// The longest the worker waits between passes while failures persist.
pub const MAX_RECONCILIATION_DELAY_MS: u64 = 30_000;

pub fn next_backoff_delay(current: Duration, base: Duration) -> Duration {
	current
		.max(base)
		.saturating_mul(2)
		.min(Duration::from_millis(MAX_RECONCILIATION_DELAY_MS))
}

pub async fn notification_reconciliation_worker<R, O>(
	use_case: ReconcileNotificationsUseCase<R, O>,
	batch_size: usize,
	interval: Duration,
) where
	R: PaymentRepository + Clone + Send + Sync + 'static,
	O: OrderService + Clone + Send + Sync + 'static,
{
	let mut delay = interval;

	loop {
		let ctx = RequestContext::new();

		match use_case.execute(&ctx, batch_size).await {
			Ok(report) if report.is_clean() => {
				if report.notified > 0 {
					info!(
						"[{ctx}] Reconciled {} order notification(s)",
						report.notified
					);
				}
				delay = interval;
			}
			Ok(report) => {
				delay = next_backoff_delay(delay, interval);
				warn!(
					"[{ctx}] {} of {} order notification(s) still failing, next \
					 pass in {delay:?}",
					report.failed, report.scanned
				);
			}
			Err(e) => {
				delay = next_backoff_delay(delay, interval);
				error!(
					"[{ctx}] Failed to load pending notifications: {e}, next pass \
					 in {delay:?}"
				);
			}
		}

		sleep(delay).await;
	}
}
