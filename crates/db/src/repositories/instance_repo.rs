//! Repository for the `instances` table.

use flowdeck_core::types::DbId;
use sqlx::PgPool;

use crate::models::instance::{
    CreateInstance, Instance, InstanceCredentials, StatusCount, UpdateInstance,
};

/// Column list for client-facing reads. `api_key` is deliberately absent:
/// no serialized response may carry the secret.
const COLUMNS: &str = "id, name, api_base_url, auth_type, status, created_at, updated_at";

/// Provides CRUD operations for registered instances.
pub struct InstanceRepo;

impl InstanceRepo {
    /// List all instances, most recently registered first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Instance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instances ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Instance>(&query).fetch_all(pool).await
    }

    /// Find an instance by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Instance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instances WHERE id = $1");
        sqlx::query_as::<_, Instance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load the credentials needed for an outbound connectivity check.
    pub async fn find_credentials(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InstanceCredentials>, sqlx::Error> {
        sqlx::query_as::<_, InstanceCredentials>(
            "SELECT id, api_base_url, api_key, auth_type FROM instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Check whether a name is already taken, optionally excluding one row
    /// (for update-time uniqueness checks).
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM instances WHERE name = $1 AND ($2::bigint IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(exists)
    }

    /// Insert a new instance, returning the created row.
    ///
    /// If `auth_type` is `None`, defaults to `API_KEY`. Status starts as
    /// `active`.
    pub async fn create(pool: &PgPool, input: &CreateInstance) -> Result<Instance, sqlx::Error> {
        let query = format!(
            "INSERT INTO instances (name, api_base_url, api_key, auth_type)
             VALUES ($1, $2, $3, COALESCE($4, 'API_KEY'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Instance>(&query)
            .bind(&input.name)
            .bind(&input.api_base_url)
            .bind(&input.api_key)
            .bind(&input.auth_type)
            .fetch_one(pool)
            .await
    }

    /// Update an instance. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInstance,
    ) -> Result<Option<Instance>, sqlx::Error> {
        let query = format!(
            "UPDATE instances SET
                name = COALESCE($2, name),
                api_base_url = COALESCE($3, api_base_url),
                api_key = COALESCE($4, api_key),
                auth_type = COALESCE($5, auth_type),
                status = COALESCE($6, status),
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Instance>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.api_base_url)
            .bind(&input.api_key)
            .bind(&input.auth_type)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Delete an instance by ID. Owned workflows and their executions go
    /// with it via the declared cascade. Returns `true` if a row was
    /// removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM instances WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of registered instances.
    pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM instances")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Number of instances currently marked `active`.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM instances WHERE status = 'active'")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Instance counts grouped by registration status.
    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<StatusCount>, sqlx::Error> {
        sqlx::query_as::<_, StatusCount>(
            "SELECT status, COUNT(*) AS count FROM instances GROUP BY status ORDER BY status",
        )
        .fetch_all(pool)
        .await
    }
}
