use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use devhub_types::{
    AccountStatus, AuthResponse, SignInRequest, SignUpRequest, ADMIN_ROLE, DEFAULT_ROLE,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::{self, models::Credential, queries},
    error::{is_unique_violation, AppError, Result},
    AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // profile id
    pub email: String,
    pub exp: usize,
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| AppError::Internal("Failed to hash password".to_string()))
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn create_token(user_id: &str, email: &str, secret: &str, ttl_days: i64) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(chrono::Duration::days(ttl_days))
        .ok_or_else(|| AppError::Internal("Token expiry out of range".to_string()))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|_| AppError::Internal("Failed to create token".to_string()))
}

fn validate_sign_up(body: &SignUpRequest) -> Result<()> {
    if body.email.trim().is_empty() || !body.email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if body.first_name.trim().is_empty() || body.last_name.trim().is_empty() {
        return Err(AppError::Validation(
            "First and last name are required".to_string(),
        ));
    }
    if body.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<SignUpRequest>,
) -> Result<Json<AuthResponse>> {
    validate_sign_up(&body)?;
    let email = body.email.trim().to_lowercase();

    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM identities WHERE email = ?")
        .bind(&email)
        .fetch_one(&state.db.pool)
        .await?;

    if existing > 0 {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&body.password)?;
    let role = if state.config.is_admin_email(&email) {
        ADMIN_ROLE
    } else {
        DEFAULT_ROLE
    };

    let user_id = Uuid::new_v4().to_string();
    let now = db::now();

    // Identity and profile are created together or not at all
    let mut tx = state.db.pool.begin().await?;

    sqlx::query("INSERT INTO identities (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
        .bind(&user_id)
        .bind(&email)
        .bind(&password_hash)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                AppError::Conflict("Email already registered".to_string())
            } else {
                AppError::Database(err)
            }
        })?;

    sqlx::query(
        r#"
        INSERT INTO profiles (id, nombres, apellidos, correo, rol_id, estado, created_at, updated_at)
        VALUES (?, ?, ?, ?, (SELECT id FROM roles WHERE nombre = ?), ?, ?, ?)
        "#,
    )
    .bind(&user_id)
    .bind(body.first_name.trim())
    .bind(body.last_name.trim())
    .bind(&email)
    .bind(role)
    .bind(AccountStatus::Active)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = %user_id, role, "registered new account");

    let token = create_token(
        &user_id,
        &email,
        &state.config.jwt_secret,
        state.config.token_ttl_days,
    )?;
    let profile = queries::fetch_profile(&state.db.pool, &user_id).await?;

    Ok(Json(AuthResponse { token, profile }))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<AuthResponse>> {
    let email = body.email.trim().to_lowercase();

    let credential = sqlx::query_as::<_, Credential>(
        r#"
        SELECT i.id, i.email, i.password_hash, p.nombres AS first_name, p.apellidos AS last_name,
               p.estado AS status, r.nombre AS role
        FROM identities i
        JOIN profiles p ON p.id = i.id
        LEFT JOIN roles r ON r.id = p.rol_id
        WHERE i.email = ?
        "#,
    )
    .bind(&email)
    .fetch_optional(&state.db.pool)
    .await?
    .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &credential.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    if credential.status == AccountStatus::Suspended {
        tracing::info!(user_id = %credential.id, "suspended account refused sign-in");
        return Err(AppError::Forbidden("Account suspended".to_string()));
    }

    let token = create_token(
        &credential.id,
        &credential.email,
        &state.config.jwt_secret,
        state.config.token_ttl_days,
    )?;
    let profile = queries::fetch_profile(&state.db.pool, &credential.id).await?;

    Ok(Json(AuthResponse { token, profile }))
}
