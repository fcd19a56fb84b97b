use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use devhub_types::{
    Comment, CommentStatus, NewComment, NewReport, NotificationKind, Report, ReportStatus,
};
use uuid::Uuid;

use crate::{
    db::{self, queries},
    error::{AppError, Result},
    middleware::auth::AuthUser,
    services::notifications,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/:id/reports", post(report_comment))
}

async fn fetch_comment(pool: &sqlx::SqlitePool, comment_id: &str) -> Result<Comment> {
    sqlx::query_as::<_, Comment>(&format!("{} WHERE c.id = ?", queries::COMMENT_SELECT))
        .bind(comment_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
}

/// Active comments on a project, newest first.
pub async fn list_active(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Comment>>> {
    queries::fetch_visible_project(&state.db.pool, &project_id, &user.id, user.is_admin).await?;

    let comments = sqlx::query_as::<_, Comment>(&format!(
        "{} WHERE c.proyecto_id = ? AND c.estado = ? ORDER BY c.fecha DESC, c.rowid DESC",
        queries::COMMENT_SELECT
    ))
    .bind(&project_id)
    .bind(CommentStatus::Active)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(comments))
}

pub async fn create_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
    Json(body): Json<NewComment>,
) -> Result<Json<Comment>> {
    let project =
        queries::fetch_visible_project(&state.db.pool, &project_id, &user.id, user.is_admin)
            .await?;

    let content = body.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation(
            "Comment content is required".to_string(),
        ));
    }

    let comment_id = Uuid::new_v4().to_string();

    // The comment and the owner's notification commit together
    let mut tx = state.db.pool.begin().await?;

    sqlx::query(
        "INSERT INTO comentarios (id, proyecto_id, usuario_id, contenido, fecha, estado) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&comment_id)
    .bind(&project_id)
    .bind(&user.id)
    .bind(content)
    .bind(db::now())
    .bind(CommentStatus::Active)
    .execute(&mut *tx)
    .await?;

    if project.owner_id != user.id {
        notifications::notify(
            &mut *tx,
            &project.owner_id,
            NotificationKind::Comment,
            &format!("{} commented on \"{}\"", user.name, project.title),
        )
        .await?;
    }

    tx.commit().await?;

    Ok(Json(fetch_comment(&state.db.pool, &comment_id).await?))
}

async fn report_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(comment_id): Path<String>,
    Json(body): Json<NewReport>,
) -> Result<Json<Report>> {
    let comment = fetch_comment(&state.db.pool, &comment_id).await?;
    if comment.status == CommentStatus::Deleted {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }
    queries::fetch_visible_project(&state.db.pool, &comment.project_id, &user.id, user.is_admin)
        .await?;

    if comment.author_id == user.id {
        return Err(AppError::Validation(
            "You cannot report your own comment".to_string(),
        ));
    }

    let reason = body.reason.trim();
    if reason.is_empty() {
        return Err(AppError::Validation("A reason is required".to_string()));
    }

    let report_id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO reporte_comentario (id, comentario_id, usuario_id, motivo, estado, fecha) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&report_id)
    .bind(&comment_id)
    .bind(&user.id)
    .bind(reason)
    .bind(ReportStatus::Pending)
    .bind(db::now())
    .execute(&state.db.pool)
    .await?;

    tracing::info!(report_id = %report_id, comment_id = %comment_id, "comment reported");

    let report = sqlx::query_as::<_, Report>(&format!("{} WHERE rc.id = ?", queries::REPORT_SELECT))
        .bind(&report_id)
        .fetch_one(&state.db.pool)
        .await?;

    Ok(Json(report))
}
