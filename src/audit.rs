use sea_orm::ActiveEnum;
use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult, middleware::auth::AuthUser};

pub async fn log_audit(
    pool: &DbPool,
    actor: Option<&AuthUser>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, actor_id, actor_role, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(actor.map(|a| a.user_id))
    .bind(actor.map(|a| a.role.to_value()))
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Records an audit entry without letting a failure reach the caller.
pub async fn record(
    pool: &DbPool,
    actor: Option<&AuthUser>,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(pool, actor, action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
