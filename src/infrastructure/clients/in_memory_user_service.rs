use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::context::RequestContext;
use crate::domain::services::{ServiceError, User, UserService};

#[derive(Default, Clone)]
pub struct InMemoryUserService {
	users:       Arc<RwLock<HashMap<i64, User>>>,
	get_calls:   Arc<AtomicUsize>,
	unavailable: Arc<AtomicBool>,
}

impl InMemoryUserService {
	pub fn new() -> Self {
		Self::default()
	}

	pub async fn add_user(&self, user_id: i64) {
		self.users.write().await.insert(user_id, User {
			id:   user_id,
			name: format!("user-{user_id}"),
		});
	}

	pub fn get_calls(&self) -> usize {
		self.get_calls.load(Ordering::SeqCst)
	}

	pub fn set_unavailable(&self, unavailable: bool) {
		self.unavailable.store(unavailable, Ordering::SeqCst);
	}
}

#[async_trait]
impl UserService for InMemoryUserService {
	async fn get_user(
		&self,
		_ctx: &RequestContext,
		user_id: i64,
	) -> Result<Option<User>, ServiceError> {
		self.get_calls.fetch_add(1, Ordering::SeqCst);

		if self.unavailable.load(Ordering::SeqCst) {
			return Err(ServiceError::Unavailable {
				reason: "user service is down".to_string(),
			});
		}

		Ok(self.users.read().await.get(&user_id).cloned())
	}
}
