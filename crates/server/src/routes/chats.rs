use std::convert::Infallible;

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::header,
    response::Response,
    routing::get,
    Json, Router,
};
use devhub_types::{Chat, ChatEvent, ChatKind, Message, NewChat, NewMessage};
use sqlx::SqlitePool;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    StreamExt,
};
use uuid::Uuid;

use crate::{
    db::{self, queries},
    error::{is_foreign_key_violation, AppError, Result},
    middleware::auth::AuthUser,
    AppState,
};

const CHAT_SELECT: &str = "SELECT c.id, c.tipo AS kind, c.nombre AS name, c.fecha_creacion AS created_at FROM chats c";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_chats).post(create_chat))
        .route("/:id/messages", get(list_messages).post(send_message))
        .route("/:id/subscribe", get(subscribe))
}

async fn ensure_participant(pool: &SqlitePool, chat_id: &str, user_id: &str) -> Result<()> {
    let member = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM chat_participantes WHERE chat_id = ? AND usuario_id = ?",
    )
    .bind(chat_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    // Outsiders cannot tell a private chat from a missing one
    if member == 0 {
        return Err(AppError::NotFound("Chat not found".to_string()));
    }
    Ok(())
}

async fn list_chats(State(state): State<AppState>, user: AuthUser) -> Result<Json<Vec<Chat>>> {
    let chats = sqlx::query_as::<_, Chat>(&format!(
        r#"{CHAT_SELECT}
        JOIN chat_participantes cp ON cp.chat_id = c.id
        WHERE cp.usuario_id = ?
        ORDER BY c.fecha_creacion DESC"#
    ))
    .bind(&user.id)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(chats))
}

/// Distinct, non-blank participant ids other than the creator.
fn other_participants(creator_id: &str, ids: Vec<String>) -> Vec<String> {
    let mut others: Vec<String> = ids
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty() && id != creator_id)
        .collect();
    others.sort();
    others.dedup();
    others
}

async fn find_direct_chat(pool: &SqlitePool, user_a: &str, user_b: &str) -> Result<Option<Chat>> {
    let chat = sqlx::query_as::<_, Chat>(&format!(
        r#"{CHAT_SELECT}
        JOIN chat_participantes a ON a.chat_id = c.id AND a.usuario_id = ?
        JOIN chat_participantes b ON b.chat_id = c.id AND b.usuario_id = ?
        WHERE c.tipo = ?
        LIMIT 1"#
    ))
    .bind(user_a)
    .bind(user_b)
    .bind(ChatKind::Direct)
    .fetch_optional(pool)
    .await?;

    Ok(chat)
}

async fn create_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<NewChat>,
) -> Result<Json<Chat>> {
    let others = other_participants(&user.id, body.participant_ids);
    let name = body
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    match body.kind {
        ChatKind::Direct => {
            if others.len() != 1 {
                return Err(AppError::Validation(
                    "A direct chat needs exactly one other participant".to_string(),
                ));
            }
            if let Some(existing) = find_direct_chat(&state.db.pool, &user.id, &others[0]).await? {
                return Ok(Json(existing));
            }
        }
        ChatKind::Group => {
            if others.is_empty() {
                return Err(AppError::Validation(
                    "A group chat needs at least one other participant".to_string(),
                ));
            }
            if name.is_none() {
                return Err(AppError::Validation("A group chat needs a name".to_string()));
            }
        }
    }

    let chat_id = Uuid::new_v4().to_string();
    let now = db::now();

    let mut tx = state.db.pool.begin().await?;

    sqlx::query("INSERT INTO chats (id, tipo, nombre, fecha_creacion) VALUES (?, ?, ?, ?)")
        .bind(&chat_id)
        .bind(body.kind)
        .bind(&name)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

    for member in std::iter::once(&user.id).chain(others.iter()) {
        sqlx::query(
            "INSERT INTO chat_participantes (chat_id, usuario_id, fecha_union) VALUES (?, ?, ?)",
        )
        .bind(&chat_id)
        .bind(member)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            if is_foreign_key_violation(&err) {
                AppError::Validation(format!("Unknown participant {member}"))
            } else {
                AppError::Database(err)
            }
        })?;
    }

    tx.commit().await?;

    tracing::info!(chat_id = %chat_id, members = others.len() + 1, "created chat");

    let chat = sqlx::query_as::<_, Chat>(&format!("{CHAT_SELECT} WHERE c.id = ?"))
        .bind(&chat_id)
        .fetch_one(&state.db.pool)
        .await?;

    Ok(Json(chat))
}

async fn list_messages(
    State(state): State<AppState>,
    user: AuthUser,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<Message>>> {
    ensure_participant(&state.db.pool, &chat_id, &user.id).await?;

    let messages = sqlx::query_as::<_, Message>(&format!(
        "{} WHERE m.chat_id = ? ORDER BY m.fecha_envio ASC, m.rowid ASC",
        queries::MESSAGE_SELECT
    ))
    .bind(&chat_id)
    .fetch_all(&state.db.pool)
    .await?;

    Ok(Json(messages))
}

async fn send_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(chat_id): Path<String>,
    Json(body): Json<NewMessage>,
) -> Result<Json<Message>> {
    ensure_participant(&state.db.pool, &chat_id, &user.id).await?;

    let content = body.content.trim();
    if content.is_empty() {
        return Err(AppError::Validation(
            "Message content is required".to_string(),
        ));
    }

    let message_id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO mensajes (id, chat_id, usuario_id, contenido, fecha_envio) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&message_id)
    .bind(&chat_id)
    .bind(&user.id)
    .bind(content)
    .bind(db::now())
    .execute(&state.db.pool)
    .await?;

    let message = sqlx::query_as::<_, Message>(&format!(
        "{} WHERE m.id = ?",
        queries::MESSAGE_SELECT
    ))
    .bind(&message_id)
    .fetch_one(&state.db.pool)
    .await?;

    let delivered = state
        .channels
        .publish(ChatEvent::MessageInserted {
            chat_id: chat_id.clone(),
            message_id,
        })
        .await;
    tracing::debug!(chat_id = %chat_id, delivered, "message inserted");

    Ok(Json(message))
}

fn encode_line(event: &ChatEvent) -> Option<std::result::Result<Bytes, Infallible>> {
    match serde_json::to_vec(event) {
        Ok(mut line) => {
            line.push(b'\n');
            Some(Ok(Bytes::from(line)))
        }
        Err(err) => {
            tracing::error!("failed to encode chat event: {err}");
            None
        }
    }
}

/// Streams newline-delimited `ChatEvent`s for one chat. The first line is
/// always a `resync` so the subscriber loads whatever it missed before
/// the stream was open.
async fn subscribe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(chat_id): Path<String>,
) -> Result<Response> {
    ensure_participant(&state.db.pool, &chat_id, &user.id).await?;

    let (receiver, lease) = state.channels.subscribe(&chat_id).await;
    tracing::debug!(chat_id = %chat_id, user_id = %user.id, "chat subscription opened");

    let lag_chat_id = chat_id.clone();
    let updates = BroadcastStream::new(receiver).map(move |item| match item {
        Ok(event) => event,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(chat_id = %lag_chat_id, skipped, "chat subscriber lagged");
            ChatEvent::Resync {
                chat_id: lag_chat_id.clone(),
            }
        }
    });

    let stream = tokio_stream::once(ChatEvent::Resync { chat_id })
        .chain(updates)
        .filter_map(move |event| {
            // Dropped with the response body; prunes the channel on disconnect
            let _lease = &lease;
            encode_line(&event)
        });

    Response::builder()
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .header(header::CACHE_CONTROL, "no-cache")
        .body(Body::from_stream(stream))
        .map_err(|err| AppError::Internal(format!("Failed to build stream response: {err}")))
}
