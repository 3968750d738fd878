use reqwest::RequestBuilder;

use crate::domain::context::RequestContext;
use crate::domain::services::ServiceError;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Forwards the request id and bounds the call by whatever is left of the
/// caller's deadline.
pub fn with_context(
	request: RequestBuilder,
	ctx: &RequestContext,
) -> RequestBuilder {
	let request = request.header(REQUEST_ID_HEADER, ctx.request_id.to_string());
	match ctx.remaining() {
		Some(left) => request.timeout(left),
		None => request,
	}
}

pub fn transport_error(err: reqwest::Error) -> ServiceError {
	if err.is_timeout() {
		ServiceError::DeadlineExceeded
	} else {
		ServiceError::Unavailable {
			reason: err.to_string(),
		}
	}
}
