use axum::{
    extract::{Path, State},
    Json,
};
use devhub_types::{LikeSummary, NotificationKind, LIKE_KIND};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    db::{self, queries},
    error::Result,
    middleware::auth::AuthUser,
    services::notifications,
    AppState,
};

async fn load_summary(pool: &SqlitePool, project_id: &str, user_id: &str) -> Result<LikeSummary> {
    let (count, liked) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT COUNT(*), COALESCE(SUM(usuario_id = ?), 0)
        FROM valoraciones
        WHERE proyecto_id = ? AND tipo = ?
        "#,
    )
    .bind(user_id)
    .bind(project_id)
    .bind(LIKE_KIND)
    .fetch_one(pool)
    .await?;

    Ok(LikeSummary {
        count,
        liked: liked > 0,
    })
}

pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<LikeSummary>> {
    queries::fetch_visible_project(&state.db.pool, &project_id, &user.id, user.is_admin).await?;
    Ok(Json(load_summary(&state.db.pool, &project_id, &user.id).await?))
}

/// Idempotent: liking twice leaves a single row. The like and the owner's
/// notification commit together.
pub async fn like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<LikeSummary>> {
    let project =
        queries::fetch_visible_project(&state.db.pool, &project_id, &user.id, user.is_admin)
            .await?;

    let mut tx = state.db.pool.begin().await?;

    let inserted = sqlx::query(
        r#"
        INSERT INTO valoraciones (id, proyecto_id, usuario_id, tipo, fecha)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT (proyecto_id, usuario_id, tipo) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&project_id)
    .bind(&user.id)
    .bind(LIKE_KIND)
    .bind(db::now())
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted > 0 && project.owner_id != user.id {
        notifications::notify(
            &mut *tx,
            &project.owner_id,
            NotificationKind::Like,
            &format!("{} liked your project \"{}\"", user.name, project.title),
        )
        .await?;
    }

    tx.commit().await?;

    Ok(Json(load_summary(&state.db.pool, &project_id, &user.id).await?))
}

pub async fn unlike(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<String>,
) -> Result<Json<LikeSummary>> {
    queries::fetch_visible_project(&state.db.pool, &project_id, &user.id, user.is_admin).await?;

    sqlx::query("DELETE FROM valoraciones WHERE proyecto_id = ? AND usuario_id = ? AND tipo = ?")
        .bind(&project_id)
        .bind(&user.id)
        .bind(LIKE_KIND)
        .execute(&state.db.pool)
        .await?;

    Ok(Json(load_summary(&state.db.pool, &project_id, &user.id).await?))
}
