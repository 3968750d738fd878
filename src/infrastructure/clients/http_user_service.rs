use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};

use crate::domain::context::RequestContext;
use crate::domain::services::{ServiceError, User, UserService};
use crate::infrastructure::clients::request::{transport_error, with_context};

#[derive(Clone)]
pub struct HttpUserService {
	http_client: Client,
	base_url:    String,
}

impl HttpUserService {
	pub fn new(http_client: Client, base_url: impl Into<String>) -> Self {
		Self {
			http_client,
			base_url: base_url.into().trim_end_matches('/').to_string(),
		}
	}
}

#[async_trait]
impl UserService for HttpUserService {
	async fn get_user(
		&self,
		ctx: &RequestContext,
		user_id: i64,
	) -> Result<Option<User>, ServiceError> {
		let url = format!("{}/users/{user_id}", self.base_url);
		debug!("[{ctx}] GET {url}");

		let resp = with_context(self.http_client.get(&url), ctx)
			.send()
			.await
			.map_err(transport_error)?;

		match resp.status() {
			StatusCode::NOT_FOUND => Ok(None),
			status if status.is_success() => resp
				.json::<User>()
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
}
