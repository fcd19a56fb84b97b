use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use devhub_types::{
    Category, NewProject, NewRepositoryLink, ProjectStatus, ProjectSummary, ProjectUpdate,
    RepositoryLink,
};
use uuid::Uuid;

use crate::{
    db::{self, queries},
    error::{is_foreign_key_violation, AppError, Result},
    middleware::auth::AuthUser,
    routes::{comments, likes},
    AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_published).post(create_project))
        .route("/mine", get(list_mine))
        .route("/:id", get(get_project).put(update_project))
        .route(
            "/:id/likes",
            get(likes::summary).post(likes::like).delete(likes::unlike),
        )
        .route(
            "/:id/comments",
            get(comments::list_active).post(comments::create_comment),
        )
        .route("/:id/repository", get(get_repository))
}

pub fn categories_router() -> Router<AppState> {
    Router::new().route("/", get(list_categories))
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, nombre AS name, descripcion AS description FROM categoria_proyecto ORDER BY nombre ASC",
    )
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(categories))
}

async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<ProjectSummary>>> {
    let projects = sqlx::query_as::<_, ProjectSummary>(&format!(
        "{} WHERE pr.estado = ? ORDER BY pr.created_at DESC, pr.rowid DESC",
        queries::PROJECT_SELECT
    ))
    .bind(ProjectStatus::Published)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(projects))
}

async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ProjectSummary>>> {
    let projects = sqlx::query_as::<_, ProjectSummary>(&format!(
        "{} WHERE pr.usuario_id = ? ORDER BY pr.created_at DESC, pr.rowid DESC",
        queries::PROJECT_SELECT
    ))
    .bind(&user.id)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(projects))
}

fn validate_fields(title: &str, description: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(AppError::Validation("Project title is required".to_string()));
    }
    if description.trim().is_empty() {
        return Err(AppError::Validation(
            "Project description is required".to_string(),
        ));
    }
    Ok(())
}

fn validate_repository(link: &NewRepositoryLink) -> Result<()> {
    let url = link.url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(AppError::Validation(
            "Repository URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}

fn unknown_category(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        AppError::Validation("Unknown category".to_string())
    } else {
        AppError::Database(err)
    }
}

/// Blank form values mean "no category".
fn normalize_category(category_id: Option<String>) -> Option<String> {
    category_id.filter(|id| !id.trim().is_empty())
}

async fn create_project(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<NewProject>,
) -> Result<Json<ProjectSummary>> {
    validate_fields(&body.title, &body.description)?;
    let repository = body
        .repository
        .filter(|link| !link.url.trim().is_empty());
    if let Some(link) = &repository {
        validate_repository(link)?;
    }

    let project_id = Uuid::new_v4().to_string();
    let now = db::now();

    // The project and its repository link land together
    let mut tx = state.db.pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO proyectos (id, usuario_id, titulo, descripcion, categoria_id, fecha_creacion, estado, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&project_id)
    .bind(&user.id)
    .bind(body.title.trim())
    .bind(body.description.trim())
    .bind(normalize_category(body.category_id))
    .bind(&now)
    .bind(body.status)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await
    .map_err(unknown_category)?;

    if let Some(link) = &repository {
        sqlx::query(
            "INSERT INTO integracion_repositorio (id, proyecto_id, tipo, url_repositorio, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&project_id)
        .bind(link.kind)
        .bind(link.url.trim())
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!(project_id = %project_id, owner_id = %user.id, "created project");

    Ok(Json(queries::fetch_project(&state.db.pool, &project_id).await?))
}

async fn get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectSummary>> {
    let project =
        queries::fetch_visible_project(&state.db.pool, &id, &user.id, user.is_admin).await?;
    Ok(Json(project))
}

async fn update_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<ProjectUpdate>,
) -> Result<Json<ProjectSummary>> {
    let project =
        queries::fetch_visible_project(&state.db.pool, &id, &user.id, user.is_admin).await?;
    if project.owner_id != user.id {
        return Err(AppError::Forbidden(
            "Only the owner can edit this project".to_string(),
        ));
    }

    validate_fields(&body.title, &body.description)?;

    sqlx::query(
        r#"
        UPDATE proyectos
        SET titulo = ?, descripcion = ?, categoria_id = ?, estado = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(body.title.trim())
    .bind(body.description.trim())
    .bind(normalize_category(body.category_id))
    .bind(body.status)
    .bind(db::now())
    .bind(&id)
    .execute(&state.db.pool)
    .await
    .map_err(unknown_category)?;

    Ok(Json(queries::fetch_project(&state.db.pool, &id).await?))
}

async fn get_repository(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Option<RepositoryLink>>> {
    queries::fetch_visible_project(&state.db.pool, &id, &user.id, user.is_admin).await?;

    let link = sqlx::query_as::<_, RepositoryLink>(
        r#"
        SELECT id, proyecto_id AS project_id, tipo AS kind, url_repositorio AS url
        FROM integracion_repositorio
        WHERE proyecto_id = ?
        ORDER BY created_at ASC
        LIMIT 1
        "#,
    )
    .bind(&id)
    .fetch_optional(&state.db.pool)
    .await?;

    Ok(Json(link))
}
