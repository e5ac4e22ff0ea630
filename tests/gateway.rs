mod common;

use std::time::Duration;

use serde_json::json;

use risk_console::domain::context::RiskContext;
use risk_console::domain::listing::ListQuery;
use risk_console::domain::types::ResourceId;
use risk_console::domain::user::User;
use risk_console::repository::errors::ApiError;
use risk_console::repository::{HttpGateway, ResourceReader, ResourceWriter};
use risk_console::resource::ResourceKind;
use risk_console::session::BearerToken;

fn gateway(base_url: &str) -> HttpGateway {
    HttpGateway::new(base_url, Duration::from_secs(5)).unwrap()
}

fn token(raw: &str) -> BearerToken {
    BearerToken::new(raw).unwrap()
}

#[actix_web::test]
async fn fetches_a_page_with_pagination() {
    let base_url = common::spawn_backend();
    let gateway = gateway(&base_url);

    let response = gateway
        .fetch_page::<RiskContext>(
            ResourceKind::RiskContexts,
            &token(common::GOOD_TOKEN),
            &ListQuery::new(1, 10),
        )
        .await
        .unwrap();

    assert_eq!(response.data.len(), 2);
    assert_eq!(response.data[0].code, "OPS_2025");
    assert_eq!(
        response.data[0].counts.as_ref().map(|c| c.risk_categories),
        Some(3)
    );
    let pagination = response.pagination.unwrap();
    assert_eq!(pagination.total_items, 2);
    assert!(!pagination.has_next_page);
}

#[actix_web::test]
async fn filter_parameters_reach_the_backend() {
    let base_url = common::spawn_backend();
    let gateway = gateway(&base_url);

    let response = gateway
        .fetch_page::<User>(
            ResourceKind::Users,
            &token(common::GOOD_TOKEN),
            &ListQuery::new(1, 10).param("role", "viewer"),
        )
        .await
        .unwrap();

    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0].username, "budi");
}

#[actix_web::test]
async fn rejected_token_is_unauthenticated() {
    let base_url = common::spawn_backend();
    let gateway = gateway(&base_url);

    let err = gateway
        .fetch_page::<User>(ResourceKind::Users, &token("expired"), &ListQuery::new(1, 10))
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Unauthenticated);
}

#[actix_web::test]
async fn unknown_path_reports_the_status() {
    let base_url = common::spawn_backend();
    let gateway = gateway(&format!("{base_url}/v2"));

    let err = gateway
        .fetch_page::<User>(
            ResourceKind::Users,
            &token(common::GOOD_TOKEN),
            &ListQuery::new(1, 10),
        )
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::FetchFailed { status: Some(404) });
}

#[actix_web::test]
async fn unreachable_backend_has_no_status() {
    let gateway = gateway("http://127.0.0.1:1/api");

    let err = gateway
        .fetch_page::<User>(
            ResourceKind::Users,
            &token(common::GOOD_TOKEN),
            &ListQuery::new(1, 10),
        )
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::FetchFailed { status: None });
}

#[actix_web::test]
async fn patch_surfaces_the_server_message() {
    let base_url = common::spawn_backend();
    let gateway = gateway(&base_url);
    let id = ResourceId::new("ctx-1").unwrap();

    gateway
        .patch_item(
            ResourceKind::RiskContexts,
            &token(common::GOOD_TOKEN),
            &id,
            &json!({"name": "Renamed", "code": "OPS_2025"}),
        )
        .await
        .unwrap();

    let err = gateway
        .patch_item(
            ResourceKind::RiskContexts,
            &token(common::GOOD_TOKEN),
            &id,
            &json!({"name": "Renamed", "code": "TAKEN"}),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::UpdateRejected {
            status: Some(409),
            message: Some("Code already exists".to_string()),
        }
    );
    assert_eq!(
        err.user_message("risk contexts", "risk context"),
        "Code already exists"
    );
}

#[actix_web::test]
async fn patch_without_a_message_falls_back_to_the_generic_text() {
    let base_url = common::spawn_backend();
    let gateway = gateway(&base_url);
    let id = ResourceId::new("ctx-2").unwrap();

    let err = gateway
        .patch_item(
            ResourceKind::RiskContexts,
            &token(common::GOOD_TOKEN),
            &id,
            &json!({"name": "Boom"}),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::UpdateRejected {
            status: Some(500),
            message: None,
        }
    );
    assert_eq!(
        err.user_message("risk contexts", "risk context"),
        "Failed to update risk context. Please try again."
    );
}
