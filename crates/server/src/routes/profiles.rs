use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use devhub_types::{Profile, ProfileUpdate};

use crate::{
    db::{self, queries},
    error::{AppError, Result},
    middleware::auth::AuthUser,
    AppState,
};

/// Mounted at `/profile`: the caller's own record.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_own).put(update_own))
}

/// Mounted at `/profiles`: other members' records.
pub fn directory_router() -> Router<AppState> {
    Router::new().route("/:id", get(get_profile))
}

async fn get_own(State(state): State<AppState>, user: AuthUser) -> Result<Json<Profile>> {
    Ok(Json(queries::fetch_profile(&state.db.pool, &user.id).await?))
}

async fn get_profile(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Profile>> {
    Ok(Json(queries::fetch_profile(&state.db.pool, &id).await?))
}

/// Blank optional fields are stored as NULL.
fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn update_own(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<Profile>> {
    if body.first_name.trim().is_empty() || body.last_name.trim().is_empty() {
        return Err(AppError::Validation(
            "First and last name are required".to_string(),
        ));
    }

    sqlx::query(
        r#"
        UPDATE profiles
        SET nombres = ?, apellidos = ?, habilidades = ?, intereses_tecnologicos = ?,
            enlaces_repositorios = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(body.first_name.trim())
    .bind(body.last_name.trim())
    .bind(optional_text(body.skills))
    .bind(optional_text(body.interests))
    .bind(optional_text(body.repository_links))
    .bind(db::now())
    .bind(&user.id)
    .execute(&state.db.pool)
    .await?;

    Ok(Json(queries::fetch_profile(&state.db.pool, &user.id).await?))
}
