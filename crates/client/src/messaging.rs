use std::sync::Arc;

use devhub_types::{Chat, ChatKind, Message, NewChat};
use tokio::{sync::RwLock, task::JoinHandle};

use crate::{backend::SharedBackend, error::ClientError};

/// Messages of the selected chat, tagged with that chat's id.
#[derive(Debug, Default)]
struct Thread {
    chat_id: Option<String>,
    messages: Vec<Message>,
}

type SharedThread = Arc<RwLock<Thread>>;

/// Refetches a chat's messages and stores them unless another chat has
/// been selected meanwhile.
async fn refresh_thread(backend: &SharedBackend, thread: &SharedThread, chat_id: &str) {
    let messages = match backend.messages(chat_id).await {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!("Failed to load messages for chat {}: {}", chat_id, e);
            return;
        }
    };
    let mut thread = thread.write().await;
    if thread.chat_id.as_deref() == Some(chat_id) {
        thread.messages = messages;
    } else {
        tracing::debug!("Discarding stale messages for chat {}", chat_id);
    }
}

pub struct MessagingView {
    backend: SharedBackend,
    chats: Vec<Chat>,
    selected: Option<Chat>,
    thread: SharedThread,
    listener: Option<JoinHandle<()>>,
}

impl MessagingView {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            chats: Vec::new(),
            selected: None,
            thread: Arc::new(RwLock::new(Thread::default())),
            listener: None,
        }
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn selected(&self) -> Option<&Chat> {
        self.selected.as_ref()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.thread.read().await.messages.clone()
    }

    pub async fn load_chats(&mut self) -> Result<(), ClientError> {
        match self.backend.chats().await {
            Ok(chats) => {
                self.chats = chats;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to load chats: {}", e);
                Err(e)
            }
        }
    }

    /// Makes `chat` the active chat: stops the previous listener, loads the
    /// messages and starts a listener that refetches on every push event.
    pub async fn select_chat(&mut self, chat: Chat) {
        self.stop_listener();
        {
            let mut thread = self.thread.write().await;
            thread.chat_id = Some(chat.id.clone());
            thread.messages.clear();
        }
        let chat_id = chat.id.clone();
        self.selected = Some(chat);

        let subscription = match self.backend.subscribe(&chat_id).await {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                tracing::warn!("Failed to subscribe to chat {}: {}", chat_id, e);
                None
            }
        };
        refresh_thread(&self.backend, &self.thread, &chat_id).await;

        if let Some(mut subscription) = subscription {
            let backend = self.backend.clone();
            let thread = self.thread.clone();
            self.listener = Some(tokio::spawn(async move {
                while let Some(event) = subscription.next().await {
                    tracing::debug!("Chat event: {:?}", event);
                    refresh_thread(&backend, &thread, &chat_id).await;
                }
                tracing::debug!("Subscription for chat {} closed", chat_id);
            }));
        }
    }

    /// Sends `content` to the selected chat. Returns `false` without
    /// contacting the service when no chat is selected or the text is blank.
    /// The message shows up through the push-triggered refetch.
    pub async fn send(&self, content: &str) -> Result<bool, ClientError> {
        let Some(chat) = &self.selected else {
            return Ok(false);
        };
        let content = content.trim();
        if content.is_empty() {
            return Ok(false);
        }
        self.backend.send_message(&chat.id, content).await?;
        Ok(true)
    }

    pub async fn create_chat(
        &mut self,
        kind: ChatKind,
        name: Option<String>,
        participant_ids: Vec<String>,
    ) -> Result<Chat, ClientError> {
        let request = NewChat {
            kind,
            name,
            participant_ids,
        };
        let chat = self.backend.create_chat(&request).await?;
        let _ = self.load_chats().await;
        Ok(chat)
    }

    fn stop_listener(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

impl Drop for MessagingView {
    fn drop(&mut self) {
        self.stop_listener();
    }
}
