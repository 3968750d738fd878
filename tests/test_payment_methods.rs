use payment_service::domain::context::RequestContext;
use payment_service::domain::payment_method::PaymentMethodFilter;
use payment_service::use_cases::dto::{
	CreatePaymentMethodCommand, UpdatePaymentMethodCommand,
};
use payment_service::use_cases::errors::PaymentMethodError;

mod support;

use crate::support::fixtures::TestWorld;

fn create(name: &str, bank_code: &str) -> CreatePaymentMethodCommand {
	CreatePaymentMethodCommand {
		name:      name.to_string(),
		bank_code: bank_code.to_string(),
	}
}

#[tokio::test]
async fn test_create_and_find_payment_method() {
	let world = TestWorld::new();
	let ctx = RequestContext::new();

	let created = world
		.method_use_case
		.create(&ctx, create("Virtual Account", "VA"))
		.await
		.unwrap();
	let found = world.method_use_case.find_by_id(&ctx, created.id).await.unwrap();

	assert_eq!(found, created);
	assert!(found.deleted_at.is_none());
}

#[tokio::test]
async fn test_create_requires_name_and_bank_code() {
	let world = TestWorld::new();

	let result = world
		.method_use_case
		.create(&RequestContext::new(), create("", "VA"))
		.await;

	assert!(matches!(
		result,
		Err(PaymentMethodError::Validation { field: "name" })
	));
}

#[tokio::test]
async fn test_find_all_filters_and_hides_deleted() {
	let world = TestWorld::new();
	let ctx = RequestContext::new();
	let transfer = world.add_method("Bank Transfer", "BT").await;
	world.add_method("Virtual Account", "VA").await;
	world.method_use_case.delete(&ctx, transfer.id).await.unwrap();

	let all = world
		.method_use_case
		.find_all(&ctx, &PaymentMethodFilter::default())
		.await
		.unwrap();
	let by_code = world
		.method_use_case
		.find_all(&ctx, &PaymentMethodFilter {
			bank_code: Some("BT".to_string()),
			..Default::default()
		})
		.await
		.unwrap();

	assert_eq!(all.len(), 1);
	assert_eq!(all[0].bank_code, "VA");
	assert!(by_code.is_empty());
}

#[tokio::test]
async fn test_update_changes_fields() {
	let world = TestWorld::new();
	let ctx = RequestContext::new();
	let method = world.add_method("Bank Transfer", "BT").await;

	let updated = world
		.method_use_case
		.update(&ctx, method.id, UpdatePaymentMethodCommand {
			name:      "Wire Transfer".to_string(),
			bank_code: "WT".to_string(),
		})
		.await
		.unwrap();

	assert_eq!(updated.name, "Wire Transfer");
	assert!(updated.updated_at >= method.updated_at);
	let stored = world.method_use_case.find_by_id(&ctx, method.id).await.unwrap();
	assert_eq!(stored.bank_code, "WT");
}

#[tokio::test]
async fn test_update_missing_method_is_not_found() {
	let world = TestWorld::new();

	let result = world
		.method_use_case
		.update(&RequestContext::new(), 77, UpdatePaymentMethodCommand {
			name:      "Wire Transfer".to_string(),
			bank_code: "WT".to_string(),
		})
		.await;

	assert!(matches!(result, Err(PaymentMethodError::NotFound)));
}

#[tokio::test]
async fn test_delete_is_soft_and_not_repeatable() {
	let world = TestWorld::new();
	let ctx = RequestContext::new();
	let method = world.add_method("Bank Transfer", "BT").await;

	world.method_use_case.delete(&ctx, method.id).await.unwrap();

	assert!(matches!(
		world.method_use_case.find_by_id(&ctx, method.id).await,
		Err(PaymentMethodError::NotFound)
	));
	assert!(matches!(
		world.method_use_case.delete(&ctx, method.id).await,
		Err(PaymentMethodError::AlreadyDeleted)
	));
	assert!(matches!(
		world.method_use_case.delete(&ctx, 999).await,
		Err(PaymentMethodError::NotFound)
	));

	let raw = world.methods.get(method.id).await.unwrap();
	assert!(raw.deleted_at.is_some());
}
