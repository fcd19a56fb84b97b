//! SELECT prefixes shared by several routes. Each aliases the stored
//! columns onto the field names of the matching `devhub_types` row.

use devhub_types::{Profile, ProjectStatus, ProjectSummary};
use sqlx::SqlitePool;

use crate::error::{AppError, Result};

pub const PROFILE_SELECT: &str = r#"
    SELECT p.id, p.nombres AS first_name, p.apellidos AS last_name, p.correo AS email,
           r.nombre AS role, p.estado AS status, p.foto_perfil AS avatar_url,
           p.habilidades AS skills, p.intereses_tecnologicos AS interests,
           p.enlaces_repositorios AS repository_links, p.created_at, p.updated_at
    FROM profiles p
    LEFT JOIN roles r ON r.id = p.rol_id
"#;

pub const PROJECT_SELECT: &str = r#"
    SELECT pr.id, pr.usuario_id AS owner_id, pf.nombres AS owner_first_name,
           pf.apellidos AS owner_last_name, pr.titulo AS title, pr.descripcion AS description,
           pr.categoria_id AS category_id, c.nombre AS category_name, pr.estado AS status,
           pr.created_at, pr.updated_at
    FROM proyectos pr
    JOIN profiles pf ON pf.id = pr.usuario_id
    LEFT JOIN categoria_proyecto c ON c.id = pr.categoria_id
"#;

pub const COMMENT_SELECT: &str = r#"
    SELECT c.id, c.proyecto_id AS project_id, c.usuario_id AS author_id,
           p.nombres AS author_first_name, p.apellidos AS author_last_name,
           c.contenido AS content, c.estado AS status, c.fecha AS created_at
    FROM comentarios c
    JOIN profiles p ON p.id = c.usuario_id
"#;

pub const REPORT_SELECT: &str = r#"
    SELECT rc.id, rc.comentario_id AS comment_id, c.contenido AS comment_content,
           pr.titulo AS project_title, rc.usuario_id AS reporter_id,
           p.nombres AS reporter_first_name, p.apellidos AS reporter_last_name,
           rc.motivo AS reason, rc.estado AS status, rc.fecha AS created_at
    FROM reporte_comentario rc
    JOIN comentarios c ON c.id = rc.comentario_id
    JOIN proyectos pr ON pr.id = c.proyecto_id
    JOIN profiles p ON p.id = rc.usuario_id
"#;

pub const MESSAGE_SELECT: &str = r#"
    SELECT m.id, m.chat_id, m.usuario_id AS sender_id, p.nombres AS sender_first_name,
           p.apellidos AS sender_last_name, m.contenido AS content, m.fecha_envio AS sent_at
    FROM mensajes m
    JOIN profiles p ON p.id = m.usuario_id
"#;

pub async fn fetch_profile(pool: &SqlitePool, user_id: &str) -> Result<Profile> {
    sqlx::query_as::<_, Profile>(&format!("{PROFILE_SELECT} WHERE p.id = ?"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

pub async fn fetch_project(pool: &SqlitePool, project_id: &str) -> Result<ProjectSummary> {
    sqlx::query_as::<_, ProjectSummary>(&format!("{PROJECT_SELECT} WHERE pr.id = ?"))
        .bind(project_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))
}

/// Loads a project the caller may see: published ones, their own drafts,
/// or anything when the caller is an admin. Hidden drafts read as missing.
pub async fn fetch_visible_project(
    pool: &SqlitePool,
    project_id: &str,
    user_id: &str,
    is_admin: bool,
) -> Result<ProjectSummary> {
    let project = fetch_project(pool, project_id).await?;
    if project.status == ProjectStatus::Published || project.owner_id == user_id || is_admin {
        Ok(project)
    } else {
        Err(AppError::NotFound("Project not found".to_string()))
    }
}
