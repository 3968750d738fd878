use std::time::Duration;

use async_trait::async_trait;
use circuitbreaker_rs::{BreakerError, CircuitBreaker, DefaultPolicy};
use log::{debug, error};
use reqwest::{Client, StatusCode};

use crate::domain::context::RequestContext;
use crate::domain::services::{Order, OrderService, ServiceError};
use crate::infrastructure::clients::request::{transport_error, with_context};

/// Order service reached over HTTP. The "mark order paid" call goes through a
/// circuit breaker so a failing order service is not hammered by every
/// successful payment and every reconciliation pass.
#[derive(Clone)]
pub struct HttpOrderService {
	http_client: Client,
	base_url:    String,
	breaker:     CircuitBreaker<DefaultPolicy, ServiceError>,
}

impl HttpOrderService {
	pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
		let breaker = CircuitBreaker::<DefaultPolicy, ServiceError>::builder()
			.failure_threshold(0.5)
			.cooldown(Duration::from_secs(30))
			.build();
		Self::with_breaker(http_client, base_url, breaker)
	}

	pub fn with_breaker(
		http_client: Client,
		base_url: impl Into<String>,
		breaker: CircuitBreaker<DefaultPolicy, ServiceError>,
	) -> Self {
		Self {
			http_client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
			breaker,
		}
	}
}

#[async_trait]
impl OrderService for HttpOrderService {
	async fn get_order(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<Option<Order>, ServiceError> {
		let url = format!("{}/orders/{order_id}", self.base_url);
		debug!("[{ctx}] GET {url}");

		let resp = with_context(self.http_client.get(&url), ctx)
			.send()
			.await
			.map_err(transport_error)?;

		match resp.status() {
			StatusCode::NOT_FOUND => Ok(None),
			status if status.is_success() => resp
				.json::<Order>()
				.await
				.map(Some)
				.map_err(|e| ServiceError::InvalidResponse {
					reason: e.to_string(),
				}),
			status => Err(ServiceError::UnexpectedStatus {
				status: status.as_u16(),
			}),
		}
	}

	async fn mark_order_paid(
		&self,
		ctx: &RequestContext,
		order_id: &str,
	) -> Result<(), ServiceError> {
		let url = format!("{}/orders/{order_id}/paid", self.base_url);
		debug!("[{ctx}] POST {url}");

		let result: Result<(), BreakerError<ServiceError>> = self
			.breaker
			.call_async(|| async {
				let resp = with_context(self.http_client.post(&url), ctx)
					.send()
					.await
					.map_err(transport_error)?;

				if resp.status().is_success() {
					Ok(())
				} else {
					Err(ServiceError::UnexpectedStatus {
						status: resp.status().as_u16(),
					})
				}
			})
			.await;

		match result {
			Ok(()) => Ok(()),
			Err(BreakerError::Open) => {
				error!("[{ctx}] Order service circuit is open, skipping {order_id}");
				Err(ServiceError::CircuitOpen)
			}
			Err(BreakerError::Operation(e)) => Err(e),
			Err(e) => Err(ServiceError::Unavailable {
				reason: e.to_string(),
			}),
		}
	}
}
