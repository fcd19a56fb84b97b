use std::sync::Arc;

use async_trait::async_trait;
use devhub_types::{
    AccountStatus, Category, Chat, ChatEvent, Comment, LikeSummary, Message, NewChat, NewProject,
    Notification, Profile, ProfileUpdate, ProjectSummary, ProjectUpdate, Report, RepositoryLink,
    SignInRequest, SignUpRequest,
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::error::ClientError;

pub type Result<T> = std::result::Result<T, ClientError>;

pub type SharedBackend = Arc<dyn Backend>;

/// Everything the views ask of the hosted service. Implementations own
/// the credential obtained at sign-in and attach it to later calls.
#[async_trait]
pub trait Backend: Send + Sync {
    // Session
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Profile>;
    async fn sign_in(&self, request: &SignInRequest) -> Result<Profile>;
    /// Forgets the local credential. No network call.
    fn sign_out(&self);
    async fn current_profile(&self) -> Result<Profile>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile>;

    // Projects
    async fn categories(&self) -> Result<Vec<Category>>;
    async fn published_projects(&self) -> Result<Vec<ProjectSummary>>;
    async fn my_projects(&self) -> Result<Vec<ProjectSummary>>;
    async fn project(&self, project_id: &str) -> Result<ProjectSummary>;
    async fn create_project(&self, project: &NewProject) -> Result<ProjectSummary>;
    async fn update_project(&self, project_id: &str, update: &ProjectUpdate)
        -> Result<ProjectSummary>;
    async fn like_summary(&self, project_id: &str) -> Result<LikeSummary>;
    async fn like(&self, project_id: &str) -> Result<LikeSummary>;
    async fn unlike(&self, project_id: &str) -> Result<LikeSummary>;
    async fn active_comments(&self, project_id: &str) -> Result<Vec<Comment>>;
    async fn add_comment(&self, project_id: &str, content: &str) -> Result<Comment>;
    async fn report_comment(&self, comment_id: &str, reason: &str) -> Result<Report>;
    async fn repository(&self, project_id: &str) -> Result<Option<RepositoryLink>>;

    // Messaging
    async fn chats(&self) -> Result<Vec<Chat>>;
    async fn create_chat(&self, chat: &NewChat) -> Result<Chat>;
    async fn messages(&self, chat_id: &str) -> Result<Vec<Message>>;
    async fn send_message(&self, chat_id: &str, content: &str) -> Result<Message>;
    async fn subscribe(&self, chat_id: &str) -> Result<Subscription>;

    // Notifications
    async fn notifications(&self) -> Result<Vec<Notification>>;
    async fn mark_notification_read(&self, notification_id: &str) -> Result<()>;

    // Moderation
    async fn admin_users(&self) -> Result<Vec<Profile>>;
    async fn set_user_status(&self, user_id: &str, status: AccountStatus) -> Result<Profile>;
    async fn admin_reports(&self) -> Result<Vec<Report>>;
    async fn resolve_report(&self, report_id: &str, delete_comment: bool) -> Result<Report>;
    async fn delete_comment(&self, comment_id: &str) -> Result<()>;
    async fn admin_projects(&self) -> Result<Vec<ProjectSummary>>;
}

/// Live feed of one chat's events. Dropping it closes the feed.
pub struct Subscription {
    events: mpsc::Receiver<ChatEvent>,
    reader: Option<JoinHandle<()>>,
}

impl Subscription {
    /// `reader` is the task filling `events`; it is aborted on drop.
    pub fn new(events: mpsc::Receiver<ChatEvent>, reader: Option<JoinHandle<()>>) -> Self {
        Self { events, reader }
    }

    pub async fn next(&mut self) -> Option<ChatEvent> {
        self.events.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}
