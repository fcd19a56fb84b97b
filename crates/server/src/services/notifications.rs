use devhub_types::NotificationKind;
use sqlx::SqliteExecutor;
use uuid::Uuid;

use crate::{db, error::Result};

/// Writes one inbox entry for `user_id`.
pub async fn notify<'e, E>(
    executor: E,
    user_id: &str,
    kind: NotificationKind,
    content: &str,
) -> Result<()>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO notificaciones (id, usuario_id, tipo, contenido, fecha_envio, leido) VALUES (?, ?, ?, ?, ?, 0)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(kind)
    .bind(content)
    .bind(db::now())
    .execute(executor)
    .await?;

    Ok(())
}
