use std::time::Duration;

use payment_service::domain::context::RequestContext;
use payment_service::domain::payment::PaymentStatus;
use payment_service::domain::payment_method::{NewPaymentMethod, PaymentMethod};
use payment_service::domain::repository::PaymentMethodRepository;
use payment_service::infrastructure::clients::in_memory_order_service::InMemoryOrderService;
use payment_service::infrastructure::clients::in_memory_user_service::InMemoryUserService;
use payment_service::infrastructure::persistence::in_memory_payment_method_repository::InMemoryPaymentMethodRepository;
use payment_service::infrastructure::persistence::in_memory_payment_repository::InMemoryPaymentRepository;
use payment_service::use_cases::dto::ProcessPaymentCommand;
use payment_service::use_cases::payment_methods::PaymentMethodUseCase;
use payment_service::use_cases::payment_orchestrator::PaymentOrchestrator;
use payment_service::use_cases::reconcile_notifications::ReconcileNotificationsUseCase;

pub type TestOrchestrator =
	PaymentOrchestrator<InMemoryPaymentRepository, InMemoryOrderService, InMemoryUserService>;

pub const ORDER_ID: &str = "ORD-1001";
pub const USER_ID: i64 = 42;

/// Every capability backed by an in-memory double, sharing state with the
/// use cases built from it.
pub struct TestWorld {
	pub methods:         InMemoryPaymentMethodRepository,
	pub payments:        InMemoryPaymentRepository,
	pub orders:          InMemoryOrderService,
	pub users:           InMemoryUserService,
	pub orchestrator:    TestOrchestrator,
	pub method_use_case: PaymentMethodUseCase<InMemoryPaymentMethodRepository>,
}

impl TestWorld {
	pub fn new() -> Self {
		let methods = InMemoryPaymentMethodRepository::new();
		let payments = InMemoryPaymentRepository::new(methods.clone());
		let orders = InMemoryOrderService::new();
		let users = InMemoryUserService::new();
		let orchestrator =
			PaymentOrchestrator::new(payments.clone(), orders.clone(), users.clone());
		let method_use_case = PaymentMethodUseCase::new(methods.clone());

		Self {
			methods,
			payments,
			orders,
			users,
			orchestrator,
			method_use_case,
		}
	}

	/// Seeds the default order and user and one payment method.
	pub async fn seeded() -> (Self, PaymentMethod) {
		let world = Self::new();
		world.orders.add_order(ORDER_ID).await;
		world.users.add_user(USER_ID).await;
		let method = world.add_method("Bank Transfer", "BT").await;
		(world, method)
	}

	pub async fn add_method(&self, name: &str, bank_code: &str) -> PaymentMethod {
		self.methods
			.create(&RequestContext::new(), NewPaymentMethod {
				name:      name.to_string(),
				bank_code: bank_code.to_string(),
			})
			.await
			.expect("Failed to seed payment method")
	}

	/// Reconciler that picks payments up as soon as they are queued.
	pub fn reconciler(
		&self,
	) -> ReconcileNotificationsUseCase<InMemoryPaymentRepository, InMemoryOrderService>
	{
		self.reconciler_with(Duration::from_secs(5), Duration::ZERO)
	}

	pub fn reconciler_with(
		&self,
		attempt_timeout: Duration,
		settle_after: Duration,
	) -> ReconcileNotificationsUseCase<InMemoryPaymentRepository, InMemoryOrderService>
	{
		ReconcileNotificationsUseCase::new(
			self.payments.clone(),
			self.orders.clone(),
			attempt_timeout,
			settle_after,
		)
	}
}

pub fn command(
	order_id: &str,
	method: &PaymentMethod,
	status: PaymentStatus,
) -> ProcessPaymentCommand {
	ProcessPaymentCommand {
		order_id: order_id.to_string(),
		user_id: USER_ID,
		payment_method: method.clone(),
		status,
	}
}
