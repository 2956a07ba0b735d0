//! Repository for the `executions` table.
//!
//! List-shaped reads join each execution with its workflow and that
//! workflow's instance, since the console always displays executions in
//! context.

use flowdeck_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::execution::{
    CreateExecution, Execution, ExecutionFilter, ExecutionPage, ExecutionWithContext,
};
use crate::models::instance::InstanceSummary;
use crate::models::workflow::WorkflowSummary;

/// Column list for plain `executions` reads.
const COLUMNS: &str = "id, execution_id, workflow_id, status, started_at, finished_at, \
    duration_ms, data, error, created_at, updated_at";

/// Shared SELECT head for context-joined reads.
const JOINED_SELECT: &str = "SELECT e.id, e.execution_id, e.workflow_id, e.status, \
        e.started_at, e.finished_at, e.duration_ms, e.data, e.error, \
        e.created_at, e.updated_at, \
        w.name AS workflow_name, \
        w.external_workflow_id, \
        i.id AS instance_id, \
        i.name AS instance_name, \
        i.api_base_url AS instance_api_base_url \
     FROM executions e \
     JOIN workflows w ON w.id = e.workflow_id \
     JOIN instances i ON i.id = w.instance_id";

/// Flat row for the context join; mapped to [`ExecutionWithContext`].
#[derive(Debug, sqlx::FromRow)]
struct ExecutionJoinRow {
    id: DbId,
    execution_id: String,
    workflow_id: DbId,
    status: String,
    started_at: Timestamp,
    finished_at: Option<Timestamp>,
    duration_ms: Option<i64>,
    data: Option<serde_json::Value>,
    error: Option<String>,
    created_at: Timestamp,
    updated_at: Timestamp,
    workflow_name: String,
    external_workflow_id: String,
    instance_id: DbId,
    instance_name: String,
    instance_api_base_url: String,
}

impl ExecutionJoinRow {
    fn into_item(self) -> ExecutionWithContext {
        ExecutionWithContext {
            id: self.id,
            execution_id: self.execution_id,
            workflow_id: self.workflow_id,
            status: self.status,
            started_at: self.started_at,
            finished_at: self.finished_at,
            duration_ms: self.duration_ms,
            data: self.data,
            error: self.error,
            created_at: self.created_at,
            updated_at: self.updated_at,
            workflow: WorkflowSummary {
                id: self.workflow_id,
                name: self.workflow_name,
                external_workflow_id: self.external_workflow_id,
                instance: InstanceSummary {
                    id: self.instance_id,
                    name: self.instance_name,
                    api_base_url: self.instance_api_base_url,
                },
            },
        }
    }
}

/// Build the WHERE clause for an [`ExecutionFilter`].
///
/// Bind order is fixed: workflow_id, instance_id, status, start_date,
/// end_date. Callers must apply binds in exactly that order, starting at
/// `$first_idx`.
fn filter_clause(filter: &ExecutionFilter, first_idx: u32) -> (String, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = first_idx;

    if filter.workflow_id.is_some() {
        conditions.push(format!("e.workflow_id = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.instance_id.is_some() {
        conditions.push(format!("w.instance_id = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.status.is_some() {
        conditions.push(format!("e.status = ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.start_date.is_some() {
        conditions.push(format!("e.started_at >= ${bind_idx}"));
        bind_idx += 1;
    }
    if filter.end_date.is_some() {
        conditions.push(format!("e.started_at <= ${bind_idx}"));
        bind_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, bind_idx)
}

/// Provides query and mutation operations for mirrored executions.
pub struct ExecutionRepo;

impl ExecutionRepo {
    /// One page of executions matching `filter`, newest start first, plus
    /// the unpaginated match count.
    pub async fn page(
        pool: &PgPool,
        filter: &ExecutionFilter,
        page: i64,
        limit: i64,
    ) -> Result<ExecutionPage, sqlx::Error> {
        let (where_clause, next_idx) = filter_clause(filter, 1);
        let offset = (page - 1) * limit;

        let query = format!(
            "{JOINED_SELECT} {where_clause} ORDER BY e.started_at DESC, e.id DESC \
             LIMIT ${next_idx} OFFSET ${}",
            next_idx + 1
        );

        let mut q = sqlx::query_as::<_, ExecutionJoinRow>(&query);
        if let Some(workflow_id) = filter.workflow_id {
            q = q.bind(workflow_id);
        }
        if let Some(instance_id) = filter.instance_id {
            q = q.bind(instance_id);
        }
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        if let Some(start_date) = filter.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            q = q.bind(end_date);
        }
        let rows = q.bind(limit).bind(offset).fetch_all(pool).await?;

        let total = Self::count(pool, filter).await?;

        Ok(ExecutionPage {
            items: rows.into_iter().map(ExecutionJoinRow::into_item).collect(),
            total,
        })
    }

    /// All executions matching `filter`, newest start first (used by the
    /// export endpoint).
    pub async fn list(
        pool: &PgPool,
        filter: &ExecutionFilter,
    ) -> Result<Vec<ExecutionWithContext>, sqlx::Error> {
        let (where_clause, _) = filter_clause(filter, 1);
        let query = format!("{JOINED_SELECT} {where_clause} ORDER BY e.started_at DESC, e.id DESC");

        let mut q = sqlx::query_as::<_, ExecutionJoinRow>(&query);
        if let Some(workflow_id) = filter.workflow_id {
            q = q.bind(workflow_id);
        }
        if let Some(instance_id) = filter.instance_id {
            q = q.bind(instance_id);
        }
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        if let Some(start_date) = filter.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            q = q.bind(end_date);
        }

        let rows = q.fetch_all(pool).await?;
        Ok(rows.into_iter().map(ExecutionJoinRow::into_item).collect())
    }

    /// Number of executions matching `filter`.
    pub async fn count(pool: &PgPool, filter: &ExecutionFilter) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = filter_clause(filter, 1);
        let query = format!(
            "SELECT COUNT(*) FROM executions e \
             JOIN workflows w ON w.id = e.workflow_id \
             {where_clause}"
        );

        let mut q = sqlx::query_as::<_, (i64,)>(&query);
        if let Some(workflow_id) = filter.workflow_id {
            q = q.bind(workflow_id);
        }
        if let Some(instance_id) = filter.instance_id {
            q = q.bind(instance_id);
        }
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        if let Some(start_date) = filter.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            q = q.bind(end_date);
        }

        let (count,) = q.fetch_one(pool).await?;
        Ok(count)
    }

    /// Find an execution with its workflow/instance context.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ExecutionWithContext>, sqlx::Error> {
        let query = format!("{JOINED_SELECT} WHERE e.id = $1");
        let row = sqlx::query_as::<_, ExecutionJoinRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(ExecutionJoinRow::into_item))
    }

    /// Insert a mirrored execution record, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateExecution) -> Result<Execution, sqlx::Error> {
        let query = format!(
            "INSERT INTO executions
                (execution_id, workflow_id, status, started_at, finished_at,
                 duration_ms, data, error)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Execution>(&query)
            .bind(&input.execution_id)
            .bind(input.workflow_id)
            .bind(&input.status)
            .bind(input.started_at)
            .bind(input.finished_at)
            .bind(input.duration_ms)
            .bind(&input.data)
            .bind(&input.error)
            .fetch_one(pool)
            .await
    }

    /// Delete one execution by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM executions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every execution matching `filter`, returning the removed row
    /// count.
    pub async fn delete_by_filter(
        pool: &PgPool,
        filter: &ExecutionFilter,
    ) -> Result<u64, sqlx::Error> {
        let (where_clause, _) = filter_clause(filter, 1);
        let query = format!(
            "DELETE FROM executions WHERE id IN (
                SELECT e.id FROM executions e
                JOIN workflows w ON w.id = e.workflow_id
                {where_clause})"
        );

        let mut q = sqlx::query(&query);
        if let Some(workflow_id) = filter.workflow_id {
            q = q.bind(workflow_id);
        }
        if let Some(instance_id) = filter.instance_id {
            q = q.bind(instance_id);
        }
        if let Some(ref status) = filter.status {
            q = q.bind(status);
        }
        if let Some(start_date) = filter.start_date {
            q = q.bind(start_date);
        }
        if let Some(end_date) = filter.end_date {
            q = q.bind(end_date);
        }

        let result = q.execute(pool).await?;
        Ok(result.rows_affected())
    }

    /// Count executions started in `[from, to)`, optionally restricted to
    /// one status.
    pub async fn count_started_between(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM executions \
             WHERE started_at >= $1 AND started_at < $2 \
               AND ($3::text IS NULL OR status = $3)",
        )
        .bind(from)
        .bind(to)
        .bind(status)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// `(started_at, status)` pairs for every execution started at or
    /// after `from`, oldest first. Feeds the daily-breakdown bucketing.
    pub async fn started_since(
        pool: &PgPool,
        from: Timestamp,
    ) -> Result<Vec<(Timestamp, String)>, sqlx::Error> {
        sqlx::query_as::<_, (Timestamp, String)>(
            "SELECT started_at, status FROM executions \
             WHERE started_at >= $1 ORDER BY started_at ASC",
        )
        .bind(from)
        .fetch_all(pool)
        .await
    }

    /// The most recently started executions with context.
    pub async fn recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ExecutionWithContext>, sqlx::Error> {
        let query = format!("{JOINED_SELECT} ORDER BY e.started_at DESC, e.id DESC LIMIT $1");
        let rows = sqlx::query_as::<_, ExecutionJoinRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(ExecutionJoinRow::into_item).collect())
    }
}
