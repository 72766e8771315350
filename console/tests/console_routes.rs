//! Router-level tests of the console pages

mod common;

use axum::http::StatusCode;
use common::{assert_status, body_text, console, get, location, post_form, FakeApi, PASSWORD, TOKEN};

#[tokio::test]
async fn test_pages_require_a_session() {
    let api = FakeApi::new();
    let (app, _) = console(api.clone(), None).await;

    let response = get(&app, "/devices?status=pending").await;
    assert_status(&response, StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"action="/login""#));
    assert!(html.contains(r#"name="next" value="/devices?status=pending""#));
    assert!(api.calls().is_empty());

    let response = post_form(&app, "/dashboard/reload", "").await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_sign_in_dashboard_then_rejected_token() {
    let api = FakeApi::new();
    let (app, state) = console(api.clone(), None).await;

    let response = post_form(&app, "/login", "email=wrong%40harbor.local&password=nope").await;
    assert_status(&response, StatusCode::OK);
    assert!(body_text(response).await.contains("invalid credentials"));
    assert!(!state.session.is_authenticated());

    let form = format!("email=admin%40harbor.local&password={}&next=%2F", PASSWORD);
    let response = post_form(&app, "/login", &form).await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(state.session.token().as_deref(), Some(TOKEN));

    api.clear_calls();
    let response = get(&app, "/").await;
    assert_status(&response, StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Panorama em Tempo Real"));

    let mut calls = api.calls();
    calls.sort();
    assert_eq!(
        calls,
        vec![
            "deployment_stats",
            "device_counts",
            "list_audit:1",
            "list_deployments::1",
            "list_devices:1",
        ]
    );

    // The backend stops accepting the token: the next load ends the session
    api.reject_tokens();
    let response = post_form(&app, "/dashboard/reload", "").await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert!(!state.session.is_authenticated());

    let response = get(&app, "/").await;
    assert_status(&response, StatusCode::OK);
    assert!(body_text(response).await.contains(r#"action="/login""#));
}

#[tokio::test]
async fn test_dashboard_refresh_interval_choice() {
    let api = FakeApi::new();
    let (app, state) = console(api.clone(), Some(TOKEN)).await;

    let response = get(&app, "/").await;
    assert_status(&response, StatusCode::OK);

    let response = post_form(&app, "/dashboard/refresh", "interval_ms=60000").await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let (view, opened) = state.views.dashboard(|| unreachable!("dashboard is already open"));
    assert!(!opened);
    assert_eq!(view.refresh_ms(), 60_000);

    // Intervals outside the offered choices are ignored
    post_form(&app, "/dashboard/refresh", "interval_ms=1234").await;
    assert_eq!(view.refresh_ms(), 60_000);

    // Leaving for a list page closes the live view
    get(&app, "/devices").await;
    assert!(!state.views.is_open());
    assert_eq!(view.refresh_ms(), 0);
}

#[tokio::test]
async fn test_out_of_range_page_is_replaced() {
    let api = FakeApi::new();
    api.set_deployment_pages(2);
    let (app, _) = console(api.clone(), Some(TOKEN)).await;

    let response = get(&app, "/deployments?status=active&page=3").await;
    assert_status(&response, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/deployments?status=active&page=2");
    assert_eq!(api.calls(), vec!["list_deployments:active:3"]);

    let response = get(&app, "/deployments?status=active&page=2").await;
    assert_status(&response, StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Pagina 2 de 2"));
}

#[tokio::test]
async fn test_empty_list_counts_as_one_page() {
    let api = FakeApi::new();
    let (app, _) = console(api.clone(), Some(TOKEN)).await;

    let response = get(&app, "/audit?actor=ops&page=4").await;
    assert_status(&response, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/audit?actor=ops");
}

#[tokio::test]
async fn test_filter_apply_resets_page() {
    let api = FakeApi::new();
    let (app, _) = console(api.clone(), Some(TOKEN)).await;

    let response = get(&app, "/deployments/apply?status=completed&page=4").await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/deployments?status=completed");
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_list_reload_keeps_query() {
    let api = FakeApi::new();
    let (app, _) = console(api.clone(), Some(TOKEN)).await;

    let response = post_form(
        &app,
        "/devices/reload",
        "return_to=%2Fdevices%3Fstatus%3Dpending%26tag%3Drack-01",
    )
    .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/devices?status=pending&tag=rack-01");
    assert!(api.calls().is_empty());

    // Following the redirect refetches with the same filters
    let response = get(&app, &location(&response)).await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(api.calls(), vec!["list_devices:1".to_string()]);
    api.clear_calls();

    // Foreign targets fall back to the list itself
    let response = post_form(&app, "/devices/reload", "return_to=https%3A%2F%2Fevil.example").await;
    assert_eq!(location(&response), "/devices");
}

#[tokio::test]
async fn test_device_status_needs_confirmation() {
    let api = FakeApi::new();
    let (app, _) = console(api.clone(), Some(TOKEN)).await;

    let response = get(&app, "/devices/dev-1/status/accepted?return_to=%2Fdevices%2Fdev-1").await;
    assert_status(&response, StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Alterar o status deste device para accepted?"));

    // Declined: nothing is sent
    let response = post_form(
        &app,
        "/devices/dev-1/status",
        "status=accepted&return_to=%2Fdevices%2Fdev-1",
    )
    .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/devices/dev-1");
    assert!(api.calls().is_empty());

    let response = post_form(
        &app,
        "/devices/dev-1/status",
        "confirm=yes&status=accepted&return_to=%2Fdevices%2Fdev-1",
    )
    .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/devices/dev-1");
    assert_eq!(api.calls(), vec!["update_device_status:dev-1:accepted"]);

    let html = body_text(get(&app, "/devices/dev-1").await).await;
    assert!(html.contains("Status atualizado para accepted."));

    // The feedback is shown once
    let html = body_text(get(&app, "/devices/dev-1").await).await;
    assert!(!html.contains("Status atualizado para accepted."));
}

#[tokio::test]
async fn test_unknown_device_status_is_rejected() {
    let api = FakeApi::new();
    let (app, _) = console(api.clone(), Some(TOKEN)).await;

    let response = get(&app, "/devices/dev-1/status/exploded").await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/devices/dev-1");

    let response = post_form(&app, "/devices/dev-1/status", "confirm=yes&status=exploded").await;
    assert_eq!(location(&response), "/devices/dev-1");
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_cancel_from_list_returns_to_filtered_list() {
    let api = FakeApi::new();
    let (app, _) = console(api.clone(), Some(TOKEN)).await;

    let response = post_form(
        &app,
        "/deployments/dep-12345678/cancel",
        "confirm=yes&return_to=%2Fdeployments%3Fstatus%3Dactive",
    )
    .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/deployments?status=active");
    assert_eq!(api.calls(), vec!["cancel_deployment:dep-12345678"]);

    let html = body_text(get(&app, "/deployments?status=active").await).await;
    assert!(html.contains("Deployment dep-1234... cancelado com sucesso."));
}

#[tokio::test]
async fn test_cancel_from_detail_reloads_detail() {
    let api = FakeApi::new();
    let (app, state) = console(api.clone(), Some(TOKEN)).await;

    let html = body_text(get(&app, "/deployments/dep-1").await).await;
    assert!(html.contains("Detalhe do Deployment"));
    assert!(html.contains("/deployments/dep-1/cancel?return_to=%2Fdeployments%2Fdep-1"));
    assert!(state.views.open_deployment("dep-1").is_some());

    let response = get(&app, "/deployments/dep-1/cancel?return_to=%2Fdeployments%2Fdep-1").await;
    assert_status(&response, StatusCode::OK);
    assert!(body_text(response).await.contains("Cancelar este deployment?"));
    assert!(!state.views.is_open());

    api.clear_calls();
    post_form(
        &app,
        "/deployments/dep-1/cancel",
        "confirm=yes&return_to=%2Fdeployments%2Fdep-1",
    )
    .await;

    let html = body_text(get(&app, "/deployments/dep-1").await).await;
    assert!(html.contains("Deployment cancelado com sucesso."));
    assert_eq!(
        api.calls(),
        vec![
            "cancel_deployment:dep-1",
            "get_deployment:dep-1",
            "deployment_devices:dep-1",
        ]
    );
}

#[tokio::test]
async fn test_action_with_rejected_token_signs_out() {
    let api = FakeApi::new();
    let (app, state) = console(api.clone(), Some(TOKEN)).await;
    api.reject_tokens();

    let response = post_form(
        &app,
        "/deployments/dep-1/cancel",
        "confirm=yes&return_to=%2Fdeployments",
    )
    .await;
    assert_status(&response, StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Fdeployments");
    assert!(!state.session.is_authenticated());
}

#[tokio::test]
async fn test_ambient_routes() {
    let api = FakeApi::new();
    let (app, _) = console(api.clone(), None).await;

    let response = get(&app, "/health").await;
    assert_status(&response, StatusCode::OK);
    let health: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["service"], "harbor-console");

    let response = get(&app, "/static/console.css").await;
    assert_status(&response, StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/css; charset=utf-8"
    );

    let response = get(&app, "/nowhere").await;
    assert_status(&response, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
}
