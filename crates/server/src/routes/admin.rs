//! Moderation endpoints. Mounted behind `admin_middleware`.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use devhub_types::{
    AccountStatus, CommentStatus, Profile, ProjectSummary, Report, ReportStatus, ResolveReport,
    StatusUpdate,
};

use crate::{
    db::{self, queries},
    error::{AppError, Result},
    middleware::auth::AuthUser,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id/status", put(set_user_status))
        .route("/reports", get(list_reports))
        .route("/reports/:id/resolve", post(resolve_report))
        .route("/comments/:id/delete", post(delete_comment))
        .route("/projects", get(list_projects))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<Profile>>> {
    let users = sqlx::query_as::<_, Profile>(&format!(
        "{} ORDER BY p.created_at DESC, p.rowid DESC",
        queries::PROFILE_SELECT
    ))
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(users))
}

async fn set_user_status(
    State(state): State<AppState>,
    admin: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Profile>> {
    if id == admin.id && body.status == AccountStatus::Suspended {
        return Err(AppError::Validation(
            "Admins cannot suspend themselves".to_string(),
        ));
    }

    let updated = sqlx::query("UPDATE profiles SET estado = ?, updated_at = ? WHERE id = ?")
        .bind(body.status)
        .bind(db::now())
        .bind(&id)
        .execute(&state.db.pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %id, status = ?body.status, "account status changed");

    Ok(Json(queries::fetch_profile(&state.db.pool, &id).await?))
}

async fn list_reports(State(state): State<AppState>) -> Result<Json<Vec<Report>>> {
    let reports = sqlx::query_as::<_, Report>(&format!(
        "{} ORDER BY rc.fecha DESC, rc.rowid DESC",
        queries::REPORT_SELECT
    ))
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(reports))
}

async fn soft_delete_comment<'e, E>(executor: E, comment_id: &str) -> Result<u64>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let updated = sqlx::query("UPDATE comentarios SET estado = ? WHERE id = ?")
        .bind(CommentStatus::Deleted)
        .bind(comment_id)
        .execute(executor)
        .await?
        .rows_affected();

    Ok(updated)
}

/// Marks one report resolved. With `delete_comment` the reported comment
/// is soft-deleted in the same transaction.
async fn resolve_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ResolveReport>>,
) -> Result<Json<Report>> {
    let options = body.map(|Json(options)| options).unwrap_or_default();

    let mut tx = state.db.pool.begin().await?;

    let comment_id = sqlx::query_scalar::<_, String>(
        "SELECT comentario_id FROM reporte_comentario WHERE id = ?",
    )
    .bind(&id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

    sqlx::query("UPDATE reporte_comentario SET estado = ? WHERE id = ?")
        .bind(ReportStatus::Resolved)
        .bind(&id)
        .execute(&mut *tx)
        .await?;

    if options.delete_comment {
        soft_delete_comment(&mut *tx, &comment_id).await?;
    }

    tx.commit().await?;

    tracing::info!(report_id = %id, deleted_comment = options.delete_comment, "report resolved");

    let report = sqlx::query_as::<_, Report>(&format!("{} WHERE rc.id = ?", queries::REPORT_SELECT))
        .bind(&id)
        .fetch_one(&state.db.pool)
        .await?;

    Ok(Json(report))
}

async fn delete_comment(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<()>> {
    if soft_delete_comment(&state.db.pool, &id).await? == 0 {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }

    tracing::info!(comment_id = %id, "comment soft-deleted");

    Ok(Json(()))
}

/// Audit list: every project regardless of status.
async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<ProjectSummary>>> {
    let projects = sqlx::query_as::<_, ProjectSummary>(&format!(
        "{} ORDER BY pr.created_at DESC, pr.rowid DESC",
        queries::PROJECT_SELECT
    ))
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(projects))
}
