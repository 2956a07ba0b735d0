//! Integration tests for the repository layer against a real database:
//! - Create full hierarchy (instance -> workflow -> execution)
//! - Cascade delete behaviour
//! - Unique and check constraint violations
//! - Update and list operations

use flowdeck_core::types::Timestamp;
use flowdeck_db::models::execution::CreateExecution;
use flowdeck_db::models::instance::{CreateInstance, UpdateInstance};
use flowdeck_db::models::workflow::{CreateWorkflow, UpdateWorkflow, WorkflowFilter};
use flowdeck_db::repositories::{ExecutionRepo, InstanceRepo, WorkflowRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_instance(name: &str) -> CreateInstance {
    CreateInstance {
        name: name.to_string(),
        api_base_url: "https://n8n.example.com".to_string(),
        api_key: "secret".to_string(),
        auth_type: None,
    }
}

fn new_workflow(instance_id: i64, external_id: &str) -> CreateWorkflow {
    CreateWorkflow {
        instance_id,
        external_workflow_id: external_id.to_string(),
        name: format!("wf {external_id}"),
        active: Some(true),
        tags: None,
        project: None,
    }
}

fn new_execution(workflow_id: i64, status: &str, started_at: &str) -> CreateExecution {
    CreateExecution {
        execution_id: format!("ext-{workflow_id}-{started_at}"),
        workflow_id,
        status: status.to_string(),
        started_at: ts(started_at),
        finished_at: None,
        duration_ms: None,
        data: None,
        error: None,
    }
}

fn ts(value: &str) -> Timestamp {
    value.parse().unwrap()
}

// ---------------------------------------------------------------------------
// Instances
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn create_applies_defaults(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();

    assert_eq!(instance.auth_type, "API_KEY");
    assert_eq!(instance.status, "active");

    let fetched = InstanceRepo::find_by_id(&pool, instance.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.name, "main");
}

#[sqlx::test]
async fn duplicate_name_violates_unique_constraint(pool: PgPool) {
    InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();

    let err = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_instances_name"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

#[sqlx::test]
async fn name_exists_respects_exclusion(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();

    assert!(InstanceRepo::name_exists(&pool, "main", None).await.unwrap());
    assert!(
        !InstanceRepo::name_exists(&pool, "main", Some(instance.id))
            .await
            .unwrap()
    );
    assert!(!InstanceRepo::name_exists(&pool, "other", None).await.unwrap());
}

#[sqlx::test]
async fn update_is_partial(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();

    let updated = InstanceRepo::update(
        &pool,
        instance.id,
        &UpdateInstance {
            name: None,
            api_base_url: None,
            api_key: None,
            auth_type: None,
            status: Some("inactive".to_string()),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.status, "inactive");
    assert_eq!(updated.name, "main");
    assert!(updated.updated_at >= instance.updated_at);
}

#[sqlx::test]
async fn credentials_are_loaded_separately(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();

    let credentials = InstanceRepo::find_credentials(&pool, instance.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(credentials.api_key, "secret");
    assert_eq!(credentials.api_base_url, "https://n8n.example.com");
}

// ---------------------------------------------------------------------------
// Workflows
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn duplicate_pair_violates_unique_constraint(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();
    WorkflowRepo::create(&pool, &new_workflow(instance.id, "wf-1"))
        .await
        .unwrap();

    let err = WorkflowRepo::create(&pool, &new_workflow(instance.id, "wf-1"))
        .await
        .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.constraint(), Some("uq_workflows_instance_external"));
        }
        other => panic!("expected database error, got {other:?}"),
    }

    // Same external id under another instance is allowed.
    let other = InstanceRepo::create(&pool, &new_instance("other"))
        .await
        .unwrap();
    WorkflowRepo::create(&pool, &new_workflow(other.id, "wf-1"))
        .await
        .unwrap();
}

#[sqlx::test]
async fn workflow_missing_instance_violates_foreign_key(pool: PgPool) {
    let err = WorkflowRepo::create(&pool, &new_workflow(424242, "wf-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(_)));
}

#[sqlx::test]
async fn list_filter_predicates_compose(pool: PgPool) {
    let alpha = InstanceRepo::create(&pool, &new_instance("alpha"))
        .await
        .unwrap();
    let beta = InstanceRepo::create(&pool, &new_instance("beta"))
        .await
        .unwrap();

    WorkflowRepo::create(&pool, &new_workflow(alpha.id, "wf-1"))
        .await
        .unwrap();
    let mut inactive = new_workflow(alpha.id, "wf-2");
    inactive.active = Some(false);
    inactive.project = Some("ops".to_string());
    WorkflowRepo::create(&pool, &inactive).await.unwrap();
    WorkflowRepo::create(&pool, &new_workflow(beta.id, "wf-3"))
        .await
        .unwrap();

    let all = WorkflowRepo::list(&pool, &WorkflowFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let alpha_active = WorkflowRepo::list(
        &pool,
        &WorkflowFilter {
            instance_id: Some(alpha.id),
            active: Some(true),
            project: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(alpha_active.len(), 1);
    assert_eq!(alpha_active[0].external_workflow_id, "wf-1");

    let ops = WorkflowRepo::list(
        &pool,
        &WorkflowFilter {
            instance_id: None,
            active: None,
            project: Some("ops".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0].external_workflow_id, "wf-2");
}

#[sqlx::test]
async fn update_leaves_identity_fields_alone(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();
    let workflow = WorkflowRepo::create(&pool, &new_workflow(instance.id, "wf-1"))
        .await
        .unwrap();

    let updated = WorkflowRepo::update(
        &pool,
        workflow.id,
        &UpdateWorkflow {
            name: Some("renamed".to_string()),
            active: Some(false),
            tags: None,
            project: None,
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.name, "renamed");
    assert!(!updated.active);
    assert_eq!(updated.external_workflow_id, "wf-1");
    assert_eq!(updated.instance_id, instance.id);
}

// ---------------------------------------------------------------------------
// Cascade
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn deleting_an_instance_cascades_through_workflows(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();
    let workflow = WorkflowRepo::create(&pool, &new_workflow(instance.id, "wf-1"))
        .await
        .unwrap();
    ExecutionRepo::create(&pool, &new_execution(workflow.id, "success", "2026-08-01T10:00:00Z"))
        .await
        .unwrap();
    ExecutionRepo::create(&pool, &new_execution(workflow.id, "error", "2026-08-01T11:00:00Z"))
        .await
        .unwrap();

    assert!(InstanceRepo::delete(&pool, instance.id).await.unwrap());

    assert_eq!(WorkflowRepo::count_all(&pool).await.unwrap(), 0);
    let page = ExecutionRepo::page(&pool, &Default::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(page.total, 0);
}

#[sqlx::test]
async fn deleting_a_workflow_cascades_to_executions(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();
    let workflow = WorkflowRepo::create(&pool, &new_workflow(instance.id, "wf-1"))
        .await
        .unwrap();
    ExecutionRepo::create(&pool, &new_execution(workflow.id, "success", "2026-08-01T10:00:00Z"))
        .await
        .unwrap();

    assert!(WorkflowRepo::delete(&pool, workflow.id).await.unwrap());

    let page = ExecutionRepo::page(&pool, &Default::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(page.total, 0);
    // The instance survives.
    assert_eq!(InstanceRepo::count_all(&pool).await.unwrap(), 1);
}

// ---------------------------------------------------------------------------
// Executions
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn execution_status_is_check_constrained(pool: PgPool) {
    let instance = InstanceRepo::create(&pool, &new_instance("main"))
        .await
        .unwrap();
    let workflow = WorkflowRepo::create(&pool, &new_workflow(instance.id, "wf-1"))
        .await
        .unwrap();

    let err = ExecutionRepo::create(
        &pool,
        &new_execution(workflow.id, "exploded", "2026-08-01T10:00:00Z"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, sqlx::Error::Database(_)));
}
