use super::*;
use crate::services::account::{Subscription, SubscriptionStatus};
use crate::services::checkout::CheckoutError;
use http_body_util::BodyExt;
use std::sync::Mutex;
use uuid::Uuid;

struct MockCheckout {
    result: Result<String, u16>,
    seen: Mutex<Vec<CheckoutRequest>>,
}

impl MockCheckout {
    fn ok(id: &str) -> Self {
        Self { result: Ok(id.to_owned()), seen: Mutex::new(Vec::new()) }
    }

    fn failing(status: u16) -> Self {
        Self { result: Err(status), seen: Mutex::new(Vec::new()) }
    }
}

#[async_trait::async_trait]
impl CheckoutProvider for MockCheckout {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<String, CheckoutError> {
        self.seen.lock().expect("mock mutex should lock").push(request.clone());
        match &self.result {
            Ok(id) => Ok(id.clone()),
            Err(status) => Err(CheckoutError::Provider { status: *status, body: "boom".into() }),
        }
    }
}

fn user() -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        subscription: Subscription {
            plan: Plan::Starter,
            status: SubscriptionStatus::Trial,
            trial_ends: "2026-01-01T00:00:00Z".into(),
        },
    }
}

fn body(plan: Plan, cycle: BillingCycle) -> CreateCheckoutRequest {
    CreateCheckoutRequest { plan_name: plan, billing_cycle: cycle }
}

#[tokio::test]
async fn checkout_returns_provider_session_id() {
    let mock = MockCheckout::ok("cs_test_42");
    let user = user();
    let provider: &dyn CheckoutProvider = &mock;
    let response = start_checkout(Some(provider), &user, &body(Plan::Enterprise, BillingCycle::Yearly)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["id"], "cs_test_42");

    let seen = mock.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].user_id, user.id);
    assert_eq!(seen[0].email, "ada@example.com");
    assert_eq!(seen[0].plan, Plan::Enterprise);
    assert_eq!(seen[0].cycle, BillingCycle::Yearly);
}

#[tokio::test]
async fn checkout_without_provider_is_unavailable() {
    let response = start_checkout(None, &user(), &body(Plan::Starter, BillingCycle::Monthly)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn checkout_provider_failure_is_bad_gateway() {
    let mock = MockCheckout::failing(402);
    let provider: &dyn CheckoutProvider = &mock;
    let response = start_checkout(Some(provider), &user(), &body(Plan::Starter, BillingCycle::Monthly)).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[test]
fn checkout_request_body_uses_typed_enums() {
    let parsed: CreateCheckoutRequest =
        serde_json::from_str(r#"{"planName":"Professional","billingCycle":"yearly"}"#).unwrap();
    assert_eq!(parsed.plan_name, Plan::Professional);
    assert_eq!(parsed.billing_cycle, BillingCycle::Yearly);

    assert!(serde_json::from_str::<CreateCheckoutRequest>(r#"{"planName":"Gold","billingCycle":"yearly"}"#).is_err());
    assert!(serde_json::from_str::<CreateCheckoutRequest>(r#"{"planName":"Starter"}"#).is_err());
}

#[test]
fn checkout_request_plan_names_are_capitalized() {
    for (wire, plan) in [("Starter", Plan::Starter), ("Professional", Plan::Professional), ("Enterprise", Plan::Enterprise)] {
        let raw = format!(r#"{{"planName":"{wire}","billingCycle":"monthly"}}"#);
        let parsed: CreateCheckoutRequest = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.plan_name, plan);
    }

    let lowercase = r#"{"planName":"starter","billingCycle":"monthly"}"#;
    assert!(serde_json::from_str::<CreateCheckoutRequest>(lowercase).is_err());
}

#[tokio::test]
async fn plans_handler_returns_catalog() {
    let Json(offers) = plans().await;
    assert_eq!(offers.len(), 3);
}
