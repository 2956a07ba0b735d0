//! Repository for the `workflows` table.

use flowdeck_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::execution::ExecutionSummary;
use crate::models::instance::InstanceSummary;
use crate::models::workflow::{
    CreateWorkflow, UpdateWorkflow, Workflow, WorkflowDetail, WorkflowFilter, WorkflowListItem,
};

/// Column list for plain `workflows` reads.
const COLUMNS: &str =
    "id, instance_id, external_workflow_id, name, active, tags, project, created_at, updated_at";

/// Flat row for the list join; mapped to [`WorkflowListItem`].
#[derive(Debug, sqlx::FromRow)]
struct WorkflowJoinRow {
    id: DbId,
    instance_id: DbId,
    external_workflow_id: String,
    name: String,
    active: bool,
    tags: Option<String>,
    project: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
    instance_name: String,
    instance_api_base_url: String,
    execution_count: i64,
}

impl WorkflowJoinRow {
    fn into_item(self) -> WorkflowListItem {
        WorkflowListItem {
            id: self.id,
            instance_id: self.instance_id,
            external_workflow_id: self.external_workflow_id,
            name: self.name,
            active: self.active,
            tags: self.tags,
            project: self.project,
            created_at: self.created_at,
            updated_at: self.updated_at,
            instance: InstanceSummary {
                id: self.instance_id,
                name: self.instance_name,
                api_base_url: self.instance_api_base_url,
            },
            execution_count: self.execution_count,
        }
    }
}

/// Provides CRUD operations for mirrored workflows.
pub struct WorkflowRepo;

impl WorkflowRepo {
    /// List workflows with their owning instance and execution count,
    /// most recently updated first. Each present filter field adds one
    /// predicate.
    pub async fn list(
        pool: &PgPool,
        filter: &WorkflowFilter,
    ) -> Result<Vec<WorkflowListItem>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if filter.instance_id.is_some() {
            conditions.push(format!("w.instance_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.active.is_some() {
            conditions.push(format!("w.active = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.project.is_some() {
            conditions.push(format!("w.project = ${bind_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT w.id, w.instance_id, w.external_workflow_id, w.name, w.active,
                    w.tags, w.project, w.created_at, w.updated_at,
                    i.name AS instance_name,
                    i.api_base_url AS instance_api_base_url,
                    (SELECT COUNT(*) FROM executions e WHERE e.workflow_id = w.id) AS execution_count
             FROM workflows w
             JOIN instances i ON i.id = w.instance_id
             {where_clause}
             ORDER BY w.updated_at DESC, w.id DESC"
        );

        let mut q = sqlx::query_as::<_, WorkflowJoinRow>(&query);
        if let Some(instance_id) = filter.instance_id {
            q = q.bind(instance_id);
        }
        if let Some(active) = filter.active {
            q = q.bind(active);
        }
        if let Some(ref project) = filter.project {
            q = q.bind(project);
        }

        let rows = q.fetch_all(pool).await?;
        Ok(rows.into_iter().map(WorkflowJoinRow::into_item).collect())
    }

    /// Find a workflow row by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workflow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workflows WHERE id = $1");
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load a workflow with its instance summary and the ten most recent
    /// executions (newest first by creation time).
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkflowDetail>, sqlx::Error> {
        let row = sqlx::query_as::<_, WorkflowJoinRow>(
            "SELECT w.id, w.instance_id, w.external_workflow_id, w.name, w.active,
                    w.tags, w.project, w.created_at, w.updated_at,
                    i.name AS instance_name,
                    i.api_base_url AS instance_api_base_url,
                    (SELECT COUNT(*) FROM executions e WHERE e.workflow_id = w.id) AS execution_count
             FROM workflows w
             JOIN instances i ON i.id = w.instance_id
             WHERE w.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let recent_executions = sqlx::query_as::<_, ExecutionSummary>(
            "SELECT id, execution_id, status, started_at, finished_at, duration_ms, created_at
             FROM executions
             WHERE workflow_id = $1
             ORDER BY created_at DESC
             LIMIT 10",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let item = row.into_item();
        Ok(Some(WorkflowDetail {
            id: item.id,
            instance_id: item.instance_id,
            external_workflow_id: item.external_workflow_id,
            name: item.name,
            active: item.active,
            tags: item.tags,
            project: item.project,
            created_at: item.created_at,
            updated_at: item.updated_at,
            instance: item.instance,
            recent_executions,
        }))
    }

    /// Check whether the instance already mirrors this external workflow.
    pub async fn exists_for_instance(
        pool: &PgPool,
        instance_id: DbId,
        external_workflow_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM workflows WHERE instance_id = $1 AND external_workflow_id = $2)",
        )
        .bind(instance_id)
        .bind(external_workflow_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new workflow, returning the created row.
    ///
    /// If `active` is `None`, defaults to `false`.
    pub async fn create(pool: &PgPool, input: &CreateWorkflow) -> Result<Workflow, sqlx::Error> {
        let query = format!(
            "INSERT INTO workflows (instance_id, external_workflow_id, name, active, tags, project)
             VALUES ($1, $2, $3, COALESCE($4, false), $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(input.instance_id)
            .bind(&input.external_workflow_id)
            .bind(&input.name)
            .bind(input.active)
            .bind(&input.tags)
            .bind(&input.project)
            .fetch_one(pool)
            .await
    }

    /// Update mutable workflow fields. Only non-`None` fields in `input`
    /// are applied. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkflow,
    ) -> Result<Option<Workflow>, sqlx::Error> {
        let query = format!(
            "UPDATE workflows SET
                name = COALESCE($2, name),
                active = COALESCE($3, active),
                tags = COALESCE($4, tags),
                project = COALESCE($5, project),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workflow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.active)
            .bind(&input.tags)
            .bind(&input.project)
            .fetch_optional(pool)
            .await
    }

    /// Delete a workflow by ID. Its executions go with it via the declared
    /// cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workflows WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of mirrored workflows.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workflows")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Number of workflows flagged active in the remote system.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM workflows WHERE active")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
