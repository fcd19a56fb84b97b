use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use devhub_types::Notification;

use crate::{
    error::{AppError, Result},
    middleware::auth::AuthUser,
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/:id/read", post(mark_read))
}

async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Notification>>> {
    let notifications = sqlx::query_as::<_, Notification>(
        r#"
        SELECT id, usuario_id AS user_id, tipo AS kind, contenido AS content,
               fecha_envio AS sent_at, leido AS read
        FROM notificaciones
        WHERE usuario_id = ?
        ORDER BY fecha_envio DESC, rowid DESC
        "#,
    )
    .bind(&user.id)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(notifications))
}

async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<()>> {
    let updated = sqlx::query("UPDATE notificaciones SET leido = 1 WHERE id = ? AND usuario_id = ?")
        .bind(&id)
        .bind(&user.id)
        .execute(&state.db.pool)
        .await?
        .rows_affected();

    if updated == 0 {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }

    Ok(Json(()))
}
