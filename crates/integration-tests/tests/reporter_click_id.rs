//! Integration tests for click-id conversion reports.
//!
//! These tests verify the `gdt_vid` flow: the click id is combined with the
//! configured account and action set ids and sent to the click-id endpoint.

use serde_json::json;
use tencent_ads_conversion::{
    ActionType, ConversionParams, ConversionReporter, PageQuery, TrackingMethod,
};
use tencent_ads_conversion_integration_tests::StubApi;

fn purchase() -> ConversionParams {
    ConversionParams::new(ActionType::PURCHASE)
        .with_value(10000)
        .with_quantity(1)
}

// =============================================================================
// Request Shape Tests
// =============================================================================

#[tokio::test]
async fn test_click_id_report_posts_to_click_id_endpoint() {
    let api = StubApi::start().await;
    let reporter = ConversionReporter::new(
        api.config(Some("abc"), Some("A1"), Some("S1")),
        &PageQuery::new("?gdt_vid=click-9"),
    )
    .expect("reporter");

    let response = reporter
        .report_conversion(&purchase())
        .await
        .expect("report succeeds");
    assert!(response.is_success());

    let requests = api.requests();
    assert_eq!(requests.len(), 1);

    let request = requests.first().expect("one request");
    assert_eq!(request.path, "/v1.1/user_actions/add");
    assert_eq!(request.header("access-token"), Some("abc"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    assert_eq!(
        request.json(),
        json!({
            "actionType": "PURCHASE",
            "value": 10000,
            "quantity": 1,
            "account_id": "A1",
            "user_action_set_id": "S1",
            "click_id": "click-9"
        })
    );
}

#[tokio::test]
async fn test_click_id_is_sent_verbatim() {
    let api = StubApi::start().await;
    // One layer of query decoding only: `%2525` arrives as `%25`.
    let reporter = ConversionReporter::new(
        api.config(Some("abc"), Some("A1"), Some("S1")),
        &PageQuery::new("gdt_vid=wx%2525abc"),
    )
    .expect("reporter");

    reporter
        .report_conversion(&ConversionParams::new(ActionType::REGISTER))
        .await
        .expect("report succeeds");

    let body = api.requests().pop().expect("one request").json();
    assert_eq!(body["click_id"], "wx%25abc");
    assert_eq!(body["actionType"], "REGISTER");
}

#[tokio::test]
async fn test_each_report_is_shaped_independently() {
    let api = StubApi::start().await;
    let reporter = ConversionReporter::new(
        api.config(Some("abc"), Some("A1"), Some("S1")),
        &PageQuery::new("gdt_vid=click-9"),
    )
    .expect("reporter");

    for action in ActionType::RECOMMENDED {
        reporter
            .report_conversion(&ConversionParams::new(action))
            .await
            .expect("report succeeds");
    }

    let actions: Vec<String> = api
        .requests()
        .iter()
        .map(|r| {
            let body = r.json();
            assert_eq!(body["click_id"], "click-9");
            body["actionType"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(actions, ["PURCHASE", "COMPLETE_ORDER", "REGISTER"]);
}

// =============================================================================
// Tracking Status Tests
// =============================================================================

#[tokio::test]
async fn test_tracking_status_for_click_id_landing() {
    let api = StubApi::start().await;
    let reporter = ConversionReporter::new(
        api.config(Some("abc"), Some("A1"), Some("S1")),
        &PageQuery::new("gdt_vid=click-9"),
    )
    .expect("reporter");

    let status = reporter.tracking_status();
    assert!(!status.has_callback);
    assert!(status.has_click_id);
    assert_eq!(status.tracking_method, TrackingMethod::ClickId);
    assert_eq!(status.click_id.as_deref(), Some("click-9"));

    // Reading the status never touches the network.
    let _ = reporter.tracking_status();
    assert!(api.requests().is_empty());
}
