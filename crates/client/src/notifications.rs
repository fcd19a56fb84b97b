use devhub_types::Notification;

use crate::{backend::SharedBackend, error::ClientError};

pub struct NotificationsView {
    backend: SharedBackend,
    items: Vec<Notification>,
}

impl NotificationsView {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        match self.backend.notifications().await {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load notifications: {}", e);
                Err(e)
            }
        }
    }

    pub async fn mark_read(&mut self, notification_id: &str) -> Result<(), ClientError> {
        self.backend.mark_notification_read(notification_id).await?;
        if let Some(item) = self.items.iter_mut().find(|n| n.id == notification_id) {
            item.read = true;
        }
        Ok(())
    }
}
