use std::time::Duration;

use actix_web::{HttpRequest, web};
use uuid::Uuid;

use crate::domain::context::RequestContext;
use crate::infrastructure::clients::request::REQUEST_ID_HEADER;

/// Per-request limits installed as app data. Handlers without it run without
/// a deadline.
#[derive(Debug, Clone, Copy)]
pub struct RequestPolicy {
	pub timeout: Duration,
}

/// Builds the context for an inbound request, reusing the caller's request
/// id when it sends a valid one.
pub fn context_for(req: &HttpRequest) -> RequestContext {
	let request_id = req
		.headers()
		.get(REQUEST_ID_HEADER)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| Uuid::parse_str(value).ok())
		.unwrap_or_else(Uuid::new_v4);

	let ctx = RequestContext::with_request_id(request_id);
	match req.app_data::<web::Data<RequestPolicy>>() {
		Some(policy) => ctx.with_timeout(policy.timeout),
		None => ctx,
	}
}
