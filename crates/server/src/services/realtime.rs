// Per-chat fan-out of insert notifications

use std::collections::HashMap;
use std::sync::Arc;

use devhub_types::ChatEvent;
use tokio::sync::{broadcast, RwLock};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Clone, Default)]
pub struct ChannelRegistry {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<ChatEvent>>>>,
}

/// Held alongside a receiver; dropping it prunes the chat's channel once
/// no receivers remain.
pub struct SubscriptionLease {
    registry: ChannelRegistry,
    chat_id: String,
}

impl Drop for SubscriptionLease {
    fn drop(&mut self) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let registry = self.registry.clone();
        let chat_id = std::mem::take(&mut self.chat_id);
        runtime.spawn(async move {
            registry.prune(&chat_id).await;
        });
    }
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn subscribe(
        &self,
        chat_id: &str,
    ) -> (broadcast::Receiver<ChatEvent>, SubscriptionLease) {
        let lease = SubscriptionLease {
            registry: self.clone(),
            chat_id: chat_id.to_string(),
        };

        {
            let channels = self.channels.read().await;
            if let Some(sender) = channels.get(chat_id) {
                return (sender.subscribe(), lease);
            }
        }

        let mut channels = self.channels.write().await;
        channels.retain(|_, sender| sender.receiver_count() > 0);
        let receiver = channels
            .entry(chat_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe();
        (receiver, lease)
    }

    /// Delivers `event` to the chat's subscribers. Returns how many received
    /// it; a channel nobody listens to any more is dropped.
    pub async fn publish(&self, event: ChatEvent) -> usize {
        let chat_id = event.chat_id().to_string();

        let delivered = {
            let channels = self.channels.read().await;
            match channels.get(&chat_id) {
                Some(sender) => sender.send(event).unwrap_or(0),
                None => return 0,
            }
        };

        if delivered == 0 {
            self.prune(&chat_id).await;
        }

        delivered
    }

    /// Removes the chat's channel if it has no receivers left.
    pub async fn prune(&self, chat_id: &str) -> bool {
        let mut channels = self.channels.write().await;
        let idle = channels
            .get(chat_id)
            .is_some_and(|sender| sender.receiver_count() == 0);
        if idle {
            channels.remove(chat_id);
            tracing::debug!(chat_id = %chat_id, "dropped idle chat channel");
        }
        idle
    }

    pub async fn channel_count(&self) -> usize {
        self.channels.read().await.len()
    }
}
