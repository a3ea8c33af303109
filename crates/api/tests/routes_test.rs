//! Router tests over in-memory stores and a scripted reasoning service.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use nestegg_api::{AppState, create_router};
use nestegg_core::advisor::ReasoningError;
use nestegg_core::memory::{MemoryStore, ScriptedReasoner};
use nestegg_shared::{JwtConfig, JwtService, UserId};
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
    reasoner: Arc<ScriptedReasoner>,
    store: Arc<MemoryStore>,
}

impl TestApp {
    fn new(replies: Vec<Result<String, ReasoningError>>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let reasoner = Arc::new(ScriptedReasoner::new(replies));
        let jwt = Arc::new(JwtService::new(JwtConfig {
            secret: "router-test-secret".into(),
            ..JwtConfig::default()
        }));
        let state = AppState {
            categories: store.clone(),
            goals: store.clone(),
            investments: store.clone(),
            transactions: store.clone(),
            progress: store.clone(),
            health: store.clone(),
            reasoning: reasoner.clone(),
            jwt_service: jwt.clone(),
        };
        Self {
            router: create_router(state),
            jwt,
            reasoner,
            store,
        }
    }

    fn token(&self, user: UserId) -> String {
        self.jwt.generate_access_token(user, None).unwrap()
    }

    async fn call(
        &self,
        user: Option<UserId>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}

fn split_reply(equity: u8, debt: u8) -> Result<String, ReasoningError> {
    Ok(format!("{{\"equity\": {equity}, \"debt\": {debt}}}"))
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new(vec![]);
    let (status, body) = app.call(None, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
    assert_eq!(body["service"], "nestegg-api");
}

#[tokio::test]
async fn test_health_reports_unreachable_store() {
    let app = TestApp::new(vec![]);
    app.store.go_offline().await;

    let (status, body) = app.call(None, Method::GET, "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "down");
}

#[rstest]
#[case("/api/v1/goals")]
#[case("/api/v1/categories")]
#[case("/api/v1/surplus")]
#[case("/api/v1/progress")]
#[tokio::test]
async fn test_protected_routes_require_token(#[case] uri: &str) {
    let app = TestApp::new(vec![]);
    let (status, body) = app.call(None, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new(vec![]);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/categories")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token(UserId::new())))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_goal_starts_at_zero_with_advised_split() {
    let app = TestApp::new(vec![split_reply(70, 30)]);
    let user = UserId::new();

    let (status, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals",
            Some(json!({
                "name": "  House deposit ",
                "target_amount": 50000,
                "user_questionnaire_answers": {"risk": "high"}
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let goal = &body["data"];
    assert_eq!(goal["name"], "House deposit");
    assert_eq!(decimal(&goal["current_amount"]), Decimal::ZERO);
    assert_eq!(decimal(&goal["investment"]["percentage_equity"]), Decimal::from(70));
    assert_eq!(decimal(&goal["investment"]["percentage_debt"]), Decimal::from(30));

    let requests = app.reasoner.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contents[0].text.contains("high"));
}

#[tokio::test]
async fn test_create_goal_falls_back_when_reasoning_fails() {
    let app = TestApp::new(vec![Err(ReasoningError::Timeout)]);
    let (status, body) = app
        .call(
            Some(UserId::new()),
            Method::POST,
            "/api/v1/goals",
            Some(json!({"name": "Car", "target_amount": "8000"})),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(decimal(&body["data"]["investment"]["percentage_equity"]), Decimal::from(60));
    assert_eq!(decimal(&body["data"]["investment"]["percentage_debt"]), Decimal::from(40));
}

#[tokio::test]
async fn test_calculate_split_normalizes_and_hides_other_users_goals() {
    let app = TestApp::new(vec![
        split_reply(60, 40),
        Ok("Sure! {\"equity\": 90, \"debt\": 30} hope that helps".into()),
    ]);
    let owner = UserId::new();
    let (_, created) = app
        .call(
            Some(owner),
            Method::POST,
            "/api/v1/goals",
            Some(json!({"name": "Retire", "target_amount": 1000000})),
        )
        .await;
    let goal_id = created["data"]["id"].clone();

    let (status, body) = app
        .call(
            Some(owner),
            Method::POST,
            "/api/v1/investments/calculate-split",
            Some(json!({"goal_id": goal_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"percentage_equity": 75, "percentage_debt": 25}));

    let (status, _) = app
        .call(
            Some(UserId::new()),
            Method::POST,
            "/api/v1/investments/calculate-split",
            Some(json!({"goal_id": goal_id})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_allocate_single_and_batch() {
    let app = TestApp::new(vec![]);
    let user = UserId::new();
    let mut ids = Vec::new();
    for name in ["Emergency fund", "Holiday"] {
        let (_, body) = app
            .call(
                Some(user),
                Method::POST,
                "/api/v1/goals",
                Some(json!({"name": name, "target_amount": 5000})),
            )
            .await;
        ids.push(body["data"]["id"].clone());
    }

    let (status, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals/allocate",
            Some(json!({"goal_id": ids[0], "amount": 200})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["data"]["current_amount"]), Decimal::from(200));

    let (status, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals/allocate",
            Some(json!({"allocations": [
                {"goal_id": ids[0], "amount": 150},
                {"goal_id": ids[1], "amount": 75}
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let goals = body["data"].as_array().unwrap();
    assert_eq!(goals.len(), 2);
    assert_eq!(decimal(&goals[0]["current_amount"]), Decimal::from(350));
    assert_eq!(decimal(&goals[1]["current_amount"]), Decimal::from(75));
}

#[tokio::test]
async fn test_allocate_rejects_non_positive_and_unowned() {
    let app = TestApp::new(vec![]);
    let user = UserId::new();
    let (_, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals",
            Some(json!({"name": "Boat", "target_amount": 5000})),
        )
        .await;
    let goal_id = body["data"]["id"].clone();

    let (status, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals/allocate",
            Some(json!({"goal_id": goal_id, "amount": 0})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals/allocate",
            Some(json!({"allocations": [
                {"goal_id": goal_id, "amount": 10},
                {"goal_id": UserId::new().to_string(), "amount": 10}
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .call(Some(user), Method::GET, &format!("/api/v1/goals/{}", goal_id.as_str().unwrap()), None)
        .await;
    assert_eq!(decimal(&body["data"]["current_amount"]), Decimal::ZERO);

    let (status, _) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals/allocate",
            Some(json!({"allocations": [
                {"goal_id": goal_id, "amount": 10},
                {"goal_id": goal_id, "amount": 15}
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals/allocate",
            Some(json!({"goal_id": goal_id, "amount": 1000000000000000u64})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, body) = app
        .call(Some(user), Method::GET, &format!("/api/v1/goals/{}", goal_id.as_str().unwrap()), None)
        .await;
    assert_eq!(decimal(&body["data"]["current_amount"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_investment_update_derives_other_side() {
    let app = TestApp::new(vec![split_reply(70, 30)]);
    let user = UserId::new();
    let (_, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals",
            Some(json!({"name": "School fees", "target_amount": 20000})),
        )
        .await;
    let investment_id = body["data"]["investment"]["id"].clone();

    let (status, body) = app
        .call(
            Some(user),
            Method::PUT,
            "/api/v1/investments",
            Some(json!({"id": investment_id, "percentage_debt": 30})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["data"]["percentage_debt"]), Decimal::from(30));
    assert_eq!(decimal(&body["data"]["percentage_equity"]), Decimal::from(70));

    let (status, body) = app
        .call(
            Some(user),
            Method::PUT,
            "/api/v1/investments",
            Some(json!({"id": investment_id, "percentage_debt": 50, "percentage_equity": 40})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_forecast_endpoint() {
    let app = TestApp::new(vec![split_reply(100, 0)]);
    let user = UserId::new();
    let (_, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/goals",
            Some(json!({"name": "Nest egg", "target_amount": 100000})),
        )
        .await;
    let goal_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .call(
            Some(user),
            Method::GET,
            &format!("/api/v1/goals/{goal_id}/forecast?months=24&monthly_contribution=100"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["points"].as_array().unwrap().len(), 24);

    let (status, _) = app
        .call(
            Some(user),
            Method::GET,
            &format!("/api/v1/goals/{goal_id}/forecast?months=0"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .call(
            Some(user),
            Method::GET,
            &format!(
                "/api/v1/goals/{goal_id}/forecast?months=360&monthly_contribution=1000000000000000000000000000"
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_surplus_is_clamped_at_zero() {
    let app = TestApp::new(vec![]);
    let user = UserId::new();

    app.call(
        Some(user),
        Method::POST,
        "/api/v1/categories",
        Some(json!({"name": "Food", "size": 200})),
    )
    .await;
    let (status, _) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/transactions",
            Some(json!({"category": "Rent", "amount": -500, "timestamp": "2026-03-01T09:00:00Z"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.call(Some(user), Method::GET, "/api/v1/surplus", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["data"]["net"]), Decimal::from(-500));
    assert_eq!(decimal(&body["data"]["surplus"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_transactions_by_timestamp() {
    let app = TestApp::new(vec![]);
    let user = UserId::new();
    let ts = "2026-03-01T09:00:00Z";

    let (status, _) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/transactions",
            Some(json!({"category": "Salary", "amount": 3000, "timestamp": ts})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/transactions",
            Some(json!({"category": "Bonus", "amount": 100, "timestamp": ts})),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .call(
            Some(user),
            Method::PUT,
            &format!("/api/v1/transactions?timestamp={ts}"),
            Some(json!({"timestamp": "2026-03-02T09:00:00Z"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .call(
            Some(user),
            Method::GET,
            "/api/v1/transactions?filter=outflow",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    let (status, _) = app
        .call(
            Some(user),
            Method::DELETE,
            &format!("/api/v1/transactions?timestamp={ts}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_progress_lifecycle() {
    let app = TestApp::new(vec![]);
    let user = UserId::new();

    let (status, body) = app.call(Some(user), Method::GET, "/api/v1/progress", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());

    let (status, _) = app
        .call(Some(user), Method::POST, "/api/v1/progress", Some(json!({"current_step": 2})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .call(Some(user), Method::POST, "/api/v1/progress", Some(json!({"current_step": 3})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .call(Some(user), Method::PUT, "/api/v1/progress", Some(json!({"current_step": 3})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["current_step"], 3);

    let (status, _) = app
        .call(Some(user), Method::PUT, "/api/v1/progress", Some(json!({"current_step": 0})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_chat_surfaces_upstream_failure() {
    let app = TestApp::new(vec![
        Ok("Start with an emergency fund.".into()),
        Err(ReasoningError::Status {
            status: 503,
            body: "overloaded".into(),
        }),
    ]);
    let user = UserId::new();

    let (status, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/chat",
            Some(json!({"message": "Where do I start?"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Start with an emergency fund."}));

    let (status, body) = app
        .call(
            Some(user),
            Method::POST,
            "/api/v1/chat",
            Some(json!({
                "message": "And then?",
                "conversationHistory": [
                    {"role": "user", "content": "Where do I start?"},
                    {"role": "assistant", "content": "Start with an emergency fund."}
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to get response from AI");
}
