use super::*;

#[test]
fn login_response_decodes_server_shape() {
    let body = r#"{
        "token": "abc",
        "user": {
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Ada",
            "email": "a@b.com",
            "subscription": {"plan": "Starter", "status": "trial", "trialEnds": "2026-01-01T00:00:00Z"}
        }
    }"#;
    let parsed: LoginResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.token, "abc");
    assert_eq!(parsed.user.name, "Ada");
    let subscription = parsed.user.subscription.unwrap();
    assert_eq!(subscription.plan, "Starter");
    assert_eq!(subscription.trial_ends, "2026-01-01T00:00:00Z");
}

#[test]
fn user_without_subscription_decodes() {
    let body = r#"{"id":"00000000-0000-0000-0000-000000000001","name":"Ada","email":"a@b.com"}"#;
    let user: User = serde_json::from_str(body).unwrap();
    assert!(user.subscription.is_none());
}

#[test]
fn empty_dashboard_decodes_as_zeroes() {
    let data: DashboardData = serde_json::from_str("{}").unwrap();
    assert_eq!(data, DashboardData::default());

    let partial: DashboardData = serde_json::from_str(r#"{"stats":{"projects":2}}"#).unwrap();
    assert_eq!(partial.stats.projects, 2);
    assert_eq!(partial.stats.api_calls, 0);
    assert!(partial.recent_activity.is_empty());
}

#[test]
fn checkout_request_uses_camel_case() {
    let json = serde_json::to_value(CheckoutRequest {
        plan_name: PlanName::Starter,
        billing_cycle: BillingCycle::Monthly,
    })
    .unwrap();
    assert_eq!(json, serde_json::json!({"planName": "Starter", "billingCycle": "monthly"}));
}

#[test]
fn plan_and_cycle_wire_values_match_server_enums() {
    let plans = [PlanName::Starter, PlanName::Professional, PlanName::Enterprise];
    let wire: Vec<_> = plans.iter().map(|p| serde_json::to_value(p).unwrap()).collect();
    assert_eq!(wire, ["Starter", "Professional", "Enterprise"]);

    assert_eq!(serde_json::to_value(BillingCycle::Monthly).unwrap(), "monthly");
    assert_eq!(serde_json::to_value(BillingCycle::Yearly).unwrap(), "yearly");
}

#[test]
fn lowercase_plan_names_are_not_server_values() {
    assert!(serde_json::from_str::<PlanName>(r#""starter""#).is_err());
    assert_eq!(serde_json::from_str::<PlanName>(r#""Professional""#).unwrap(), PlanName::Professional);
}
