//! HTTP-level integration tests for the `/api/workflows` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_workflow_returns_201(pool: PgPool) {
    let instance_id = common::seed_instance(&pool, "main").await;

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/workflows",
        serde_json::json!({
            "instanceId": instance_id,
            "externalWorkflowId": "wf-abc",
            "name": "Daily report",
            "tags": "reports,daily",
            "project": "analytics",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["externalWorkflowId"], "wf-abc");
    assert_eq!(json["data"]["project"], "analytics");
    // `active` defaults to false when omitted.
    assert_eq!(json["data"]["active"], false);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_with_unknown_instance_returns_404_and_no_row(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/workflows",
        serde_json::json!({
            "instanceId": 424242,
            "externalWorkflowId": "wf-abc",
            "name": "Orphan",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let list = body_json(get(app, "/api/workflows").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_external_id_within_instance_returns_400(pool: PgPool) {
    let instance_id = common::seed_instance(&pool, "main").await;
    common::seed_workflow(&pool, instance_id, "wf-dup").await;

    let app = common::build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/workflows",
        serde_json::json!({
            "instanceId": instance_id,
            "externalWorkflowId": "wf-dup",
            "name": "Duplicate",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The same external id under a different instance is fine.
    let other_instance = common::seed_instance(&pool, "other").await;
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/workflows",
        serde_json::json!({
            "instanceId": other_instance,
            "externalWorkflowId": "wf-dup",
            "name": "Same id, other instance",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_filters_by_instance_active_and_project(pool: PgPool) {
    let alpha = common::seed_instance(&pool, "alpha").await;
    let beta = common::seed_instance(&pool, "beta").await;

    // seed_workflow creates active workflows.
    common::seed_workflow(&pool, alpha, "wf-1").await;
    let wf2 = common::seed_workflow(&pool, alpha, "wf-2").await;
    common::seed_workflow(&pool, beta, "wf-3").await;

    // Deactivate wf-2 and tag it with a project.
    let app = common::build_test_app(pool.clone());
    put_json(
        app,
        &format!("/api/workflows/{wf2}"),
        serde_json::json!({ "active": false, "project": "ops" }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let by_instance =
        body_json(get(app, &format!("/api/workflows?instanceId={alpha}")).await).await;
    assert_eq!(by_instance["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let active_only = body_json(
        get(app, &format!("/api/workflows?instanceId={alpha}&active=true")).await,
    )
    .await;
    assert_eq!(active_only["data"].as_array().unwrap().len(), 1);
    assert_eq!(active_only["data"][0]["externalWorkflowId"], "wf-1");

    let app = common::build_test_app(pool);
    let by_project = body_json(get(app, "/api/workflows?project=ops").await).await;
    assert_eq!(by_project["data"].as_array().unwrap().len(), 1);
    assert_eq!(by_project["data"][0]["externalWorkflowId"], "wf-2");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_list_includes_instance_summary_and_execution_count(pool: PgPool) {
    let instance_id = common::seed_instance(&pool, "counted").await;
    let workflow_id = common::seed_workflow(&pool, instance_id, "wf-1").await;
    common::seed_execution(&pool, workflow_id, "success", "2026-08-01T08:00:00Z").await;
    common::seed_execution(&pool, workflow_id, "error", "2026-08-01T09:00:00Z").await;

    let app = common::build_test_app(pool);
    let json = body_json(get(app, "/api/workflows").await).await;
    let item = &json["data"][0];
    assert_eq!(item["executionCount"], 2);
    assert_eq!(item["instance"]["name"], "counted");
    assert_eq!(item["instance"]["apiBaseUrl"], "https://n8n.example.com");
    assert!(item["instance"].get("apiKey").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_detail_includes_ten_most_recent_executions(pool: PgPool) {
    let instance_id = common::seed_instance(&pool, "main").await;
    let workflow_id = common::seed_workflow(&pool, instance_id, "wf-1").await;
    for hour in 0..12 {
        common::seed_execution(
            &pool,
            workflow_id,
            "success",
            &format!("2026-08-01T{hour:02}:00:00Z"),
        )
        .await;
    }

    let app = common::build_test_app(pool);
    let response = get(app, &format!("/api/workflows/{workflow_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let recent = json["data"]["recentExecutions"].as_array().unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(json["data"]["instance"]["name"], "main");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_workflow_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/workflows/999999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_touches_only_mutable_fields(pool: PgPool) {
    let instance_id = common::seed_instance(&pool, "main").await;
    let workflow_id = common::seed_workflow(&pool, instance_id, "wf-1").await;

    let app = common::build_test_app(pool);
    let response = put_json(
        app,
        &format!("/api/workflows/{workflow_id}"),
        serde_json::json!({
            "name": "Renamed",
            "active": false,
            // Identity fields are not part of the update schema; unknown
            // keys are ignored.
            "externalWorkflowId": "hijacked",
            "instanceId": 999,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["active"], false);
    assert_eq!(json["data"]["externalWorkflowId"], "wf-1");
    assert_eq!(json["data"]["instanceId"], instance_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_workflow_cascades_to_executions(pool: PgPool) {
    let instance_id = common::seed_instance(&pool, "main").await;
    let workflow_id = common::seed_workflow(&pool, instance_id, "wf-1").await;
    common::seed_execution(&pool, workflow_id, "success", "2026-08-01T08:00:00Z").await;

    let app = common::build_test_app(pool.clone());
    let response = delete(app, &format!("/api/workflows/{workflow_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let executions = body_json(get(app, "/api/executions").await).await;
    assert_eq!(executions["pagination"]["total"], 0);
}
