use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use devhub_types::{AccountStatus, ADMIN_ROLE};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::{
    db::models::Account,
    error::{AppError, Result},
    routes::auth::Claims,
    AppState,
};

#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::Unauthorized)?;

    let token_data = decode::<Claims>(
        bearer.token(),
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;

    // Status and role are re-read on every request so a suspension or
    // promotion applies to tokens already issued.
    let account = sqlx::query_as::<_, Account>(
        r#"
        SELECT p.id, p.correo AS email, p.nombres AS first_name, p.apellidos AS last_name,
               p.estado AS status, r.nombre AS role
        FROM profiles p
        LEFT JOIN roles r ON r.id = p.rol_id
        WHERE p.id = ?
        "#,
    )
    .bind(&token_data.claims.sub)
    .fetch_optional(&state.db.pool)
    .await?
    .ok_or(AppError::Unauthorized)?;

    if account.status == AccountStatus::Suspended {
        return Err(AppError::Forbidden("Account suspended".to_string()));
    }

    let user = AuthUser {
        is_admin: account.role.as_deref() == Some(ADMIN_ROLE),
        name: format!("{} {}", account.first_name, account.last_name),
        id: account.id,
        email: account.email,
    };

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Runs after `auth_middleware`; rejects callers without the admin role.
pub async fn admin_middleware(user: AuthUser, request: Request, next: Next) -> Result<Response> {
    if !user.is_admin {
        tracing::warn!(user_id = %user.id, "non-admin attempted an admin route");
        return Err(AppError::Forbidden("Admin role required".to_string()));
    }
    Ok(next.run(request).await)
}

// Extractor for getting the authenticated user from request extensions
#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
