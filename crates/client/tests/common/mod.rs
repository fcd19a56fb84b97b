#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use devhub_client::{Backend, ClientError, SharedBackend, Subscription};
use devhub_types::{
    AccountStatus, Category, Chat, ChatEvent, Comment, CommentStatus, LikeSummary, Message,
    NewChat, NewProject, Notification, Profile, ProfileUpdate, ProjectStatus, ProjectSummary,
    ProjectUpdate, Report, ReportStatus, RepositoryLink, SignInRequest, SignUpRequest,
};
use tokio::sync::mpsc;

type Result<T> = std::result::Result<T, ClientError>;

pub const USER_ID: &str = "user-1";

#[derive(Default)]
pub struct State {
    pub calls: Vec<String>,
    pub signed_in: bool,
    /// Status and message returned by the next sign-up.
    pub sign_up_failure: Option<(u16, String)>,
    pub profiles: Vec<Profile>,
    pub categories: Vec<Category>,
    pub projects: Vec<ProjectSummary>,
    pub likes: HashSet<(String, String)>,
    pub comments: Vec<Comment>,
    pub reports: Vec<Report>,
    pub chats: Vec<Chat>,
    pub messages: Vec<Message>,
    pub notifications: Vec<Notification>,
    pub subscribers: Vec<(String, mpsc::Sender<ChatEvent>)>,
    /// Artificial latency of `messages`, per chat id.
    pub slow_chat: Option<String>,
}

/// In-memory service that records every call by name.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<State>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        let backend = Self::default();
        {
            let mut state = backend.state();
            state.profiles.push(profile(USER_ID, "ada@devhub.io", None));
            state.categories.push(Category {
                id: "cat-web".to_string(),
                name: "Web".to_string(),
                description: None,
            });
        }
        Arc::new(backend)
    }

    pub fn shared(self: &Arc<Self>) -> SharedBackend {
        self.clone()
    }

    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn called(&self, name: &str) -> bool {
        self.state().calls.iter().any(|c| c == name)
    }

    fn record(&self, name: &str) -> MutexGuard<'_, State> {
        let mut state = self.state();
        state.calls.push(name.to_string());
        state
    }

    pub fn add_project(&self, id: &str, title: &str, description: &str, category: Option<&str>) {
        let now = Utc::now();
        self.state().projects.push(ProjectSummary {
            id: id.to_string(),
            owner_id: "owner-1".to_string(),
            owner_first_name: "Grace".to_string(),
            owner_last_name: "Hopper".to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category_id: category.map(str::to_string),
            category_name: None,
            status: ProjectStatus::Published,
            created_at: now,
            updated_at: now,
        });
    }

    pub fn add_report(&self, id: &str, comment_id: &str) {
        self.state().reports.push(Report {
            id: id.to_string(),
            comment_id: comment_id.to_string(),
            comment_content: "spam".to_string(),
            project_title: "Demo".to_string(),
            reporter_id: USER_ID.to_string(),
            reporter_first_name: "Ada".to_string(),
            reporter_last_name: "Lovelace".to_string(),
            reason: "spam".to_string(),
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        });
    }

    pub fn add_chat(&self, id: &str) -> Chat {
        let chat = Chat {
            id: id.to_string(),
            kind: devhub_types::ChatKind::Direct,
            name: None,
            created_at: Utc::now(),
        };
        self.state().chats.push(chat.clone());
        chat
    }

    /// Inserts a message as another participant would and pushes the event.
    pub fn deliver(&self, chat_id: &str, content: &str) {
        let mut state = self.state();
        let message = message(state.messages.len(), chat_id, "user-2", content);
        state.messages.push(message.clone());
        notify_subscribers(&mut state, chat_id, &message.id);
    }
}

pub fn profile(id: &str, email: &str, role: Option<&str>) -> Profile {
    let now = Utc::now();
    Profile {
        id: id.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: email.to_string(),
        role: role.map(str::to_string),
        status: AccountStatus::Active,
        avatar_url: None,
        skills: None,
        interests: None,
        repository_links: None,
        created_at: now,
        updated_at: now,
    }
}

fn message(seq: usize, chat_id: &str, sender_id: &str, content: &str) -> Message {
    Message {
        id: format!("msg-{seq}"),
        chat_id: chat_id.to_string(),
        sender_id: sender_id.to_string(),
        sender_first_name: "Ada".to_string(),
        sender_last_name: "Lovelace".to_string(),
        content: content.to_string(),
        sent_at: Utc::now(),
    }
}

fn notify_subscribers(state: &mut State, chat_id: &str, message_id: &str) {
    state.subscribers.retain(|(id, tx)| {
        if id != chat_id {
            return !tx.is_closed();
        }
        tx.try_send(ChatEvent::MessageInserted {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
        })
        .is_ok()
    });
}

fn not_found() -> ClientError {
    ClientError::Api {
        status: 404,
        message: "Not found".to_string(),
    }
}

fn like_summary(state: &State, project_id: &str) -> LikeSummary {
    LikeSummary {
        count: state.likes.iter().filter(|(p, _)| p == project_id).count() as i64,
        liked: state
            .likes
            .contains(&(project_id.to_string(), USER_ID.to_string())),
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Profile> {
        let mut state = self.record("sign_up");
        if let Some((status, message)) = state.sign_up_failure.take() {
            return Err(ClientError::Api { status, message });
        }
        state.signed_in = true;
        let mut created = profile(USER_ID, &request.email, None);
        created.first_name = request.first_name.clone();
        created.last_name = request.last_name.clone();
        Ok(created)
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<Profile> {
        let mut state = self.record("sign_in");
        let found = state
            .profiles
            .iter()
            .find(|p| p.email == request.email)
            .cloned();
        match found {
            Some(p) if p.status == AccountStatus::Suspended => Err(ClientError::Api {
                status: 403,
                message: "Account suspended".to_string(),
            }),
            Some(p) => {
                state.signed_in = true;
                Ok(p)
            }
            None => Err(ClientError::Api {
                status: 401,
                message: "Invalid credentials".to_string(),
            }),
        }
    }

    fn sign_out(&self) {
        self.record("sign_out").signed_in = false;
    }

    async fn current_profile(&self) -> Result<Profile> {
        let state = self.record("current_profile");
        state.profiles.first().cloned().ok_or_else(not_found)
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        let mut state = self.record("update_profile");
        let profile = state.profiles.first_mut().ok_or_else(not_found)?;
        profile.first_name = update.first_name.clone();
        profile.last_name = update.last_name.clone();
        profile.skills = update.skills.clone();
        profile.interests = update.interests.clone();
        profile.repository_links = update.repository_links.clone();
        Ok(profile.clone())
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.record("categories").categories.clone())
    }

    async fn published_projects(&self) -> Result<Vec<ProjectSummary>> {
        let state = self.record("published_projects");
        Ok(state
            .projects
            .iter()
            .filter(|p| p.status == ProjectStatus::Published)
            .cloned()
            .collect())
    }

    async fn my_projects(&self) -> Result<Vec<ProjectSummary>> {
        let state = self.record("my_projects");
        Ok(state
            .projects
            .iter()
            .filter(|p| p.owner_id == USER_ID)
            .cloned()
            .collect())
    }

    async fn project(&self, project_id: &str) -> Result<ProjectSummary> {
        let state = self.record("project");
        state
            .projects
            .iter()
            .find(|p| p.id == project_id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_project(&self, project: &NewProject) -> Result<ProjectSummary> {
        let mut state = self.record("create_project");
        let now = Utc::now();
        let created = ProjectSummary {
            id: format!("proj-{}", state.projects.len()),
            owner_id: USER_ID.to_string(),
            owner_first_name: "Ada".to_string(),
            owner_last_name: "Lovelace".to_string(),
            title: project.title.clone(),
            description: project.description.clone(),
            category_id: project.category_id.clone(),
            category_name: None,
            status: project.status,
            created_at: now,
            updated_at: now,
        };
        state.projects.push(created.clone());
        Ok(created)
    }

    async fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<ProjectSummary> {
        let mut state = self.record("update_project");
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(not_found)?;
        project.title = update.title.clone();
        project.description = update.description.clone();
        project.category_id = update.category_id.clone();
        project.status = update.status;
        Ok(project.clone())
    }

    async fn like_summary(&self, project_id: &str) -> Result<LikeSummary> {
        let state = self.record("like_summary");
        Ok(like_summary(&state, project_id))
    }

    async fn like(&self, project_id: &str) -> Result<LikeSummary> {
        let mut state = self.record("like");
        state
            .likes
            .insert((project_id.to_string(), USER_ID.to_string()));
        Ok(like_summary(&state, project_id))
    }

    async fn unlike(&self, project_id: &str) -> Result<LikeSummary> {
        let mut state = self.record("unlike");
        state
            .likes
            .remove(&(project_id.to_string(), USER_ID.to_string()));
        Ok(like_summary(&state, project_id))
    }

    async fn active_comments(&self, project_id: &str) -> Result<Vec<Comment>> {
        let state = self.record("active_comments");
        Ok(state
            .comments
            .iter()
            .rev()
            .filter(|c| c.project_id == project_id && c.status == CommentStatus::Active)
            .cloned()
            .collect())
    }

    async fn add_comment(&self, project_id: &str, content: &str) -> Result<Comment> {
        let mut state = self.record("add_comment");
        let comment = Comment {
            id: format!("comment-{}", state.comments.len()),
            project_id: project_id.to_string(),
            author_id: USER_ID.to_string(),
            author_first_name: "Ada".to_string(),
            author_last_name: "Lovelace".to_string(),
            content: content.to_string(),
            status: CommentStatus::Active,
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn report_comment(&self, comment_id: &str, _reason: &str) -> Result<Report> {
        drop(self.record("report_comment"));
        let id = format!("report-{comment_id}");
        self.add_report(&id, comment_id);
        let state = self.state();
        state
            .reports
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn repository(&self, _project_id: &str) -> Result<Option<RepositoryLink>> {
        drop(self.record("repository"));
        Ok(None)
    }

    async fn chats(&self) -> Result<Vec<Chat>> {
        Ok(self.record("chats").chats.clone())
    }

    async fn create_chat(&self, chat: &NewChat) -> Result<Chat> {
        let mut state = self.record("create_chat");
        let created = Chat {
            id: format!("chat-{}", state.chats.len()),
            kind: chat.kind,
            name: chat.name.clone(),
            created_at: Utc::now(),
        };
        state.chats.push(created.clone());
        Ok(created)
    }

    async fn messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        let slow = {
            let state = self.record("messages");
            state.slow_chat.as_deref() == Some(chat_id)
        };
        if slow {
            tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        }
        let state = self.state();
        Ok(state
            .messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect())
    }

    async fn send_message(&self, chat_id: &str, content: &str) -> Result<Message> {
        let mut state = self.record("send_message");
        let message = message(state.messages.len(), chat_id, USER_ID, content);
        state.messages.push(message.clone());
        notify_subscribers(&mut state, chat_id, &message.id);
        Ok(message)
    }

    async fn subscribe(&self, chat_id: &str) -> Result<Subscription> {
        let mut state = self.record("subscribe");
        let (tx, rx) = mpsc::channel(16);
        state.subscribers.push((chat_id.to_string(), tx));
        Ok(Subscription::new(rx, None))
    }

    async fn notifications(&self) -> Result<Vec<Notification>> {
        Ok(self.record("notifications").notifications.clone())
    }

    async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        let mut state = self.record("mark_notification_read");
        let item = state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or_else(not_found)?;
        item.read = true;
        Ok(())
    }

    async fn admin_users(&self) -> Result<Vec<Profile>> {
        Ok(self.record("admin_users").profiles.clone())
    }

    async fn set_user_status(&self, user_id: &str, status: AccountStatus) -> Result<Profile> {
        let mut state = self.record("set_user_status");
        let profile = state
            .profiles
            .iter_mut()
            .find(|p| p.id == user_id)
            .ok_or_else(not_found)?;
        profile.status = status;
        Ok(profile.clone())
    }

    async fn admin_reports(&self) -> Result<Vec<Report>> {
        Ok(self.record("admin_reports").reports.clone())
    }

    async fn resolve_report(&self, report_id: &str, delete_comment: bool) -> Result<Report> {
        let mut state = self.record("resolve_report");
        let report = state
            .reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or_else(not_found)?;
        report.status = ReportStatus::Resolved;
        let report = report.clone();
        if delete_comment {
            if let Some(comment) = state.comments.iter_mut().find(|c| c.id == report.comment_id) {
                comment.status = CommentStatus::Deleted;
            }
        }
        Ok(report)
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        let mut state = self.record("delete_comment");
        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(not_found)?;
        comment.status = CommentStatus::Deleted;
        Ok(())
    }

    async fn admin_projects(&self) -> Result<Vec<ProjectSummary>> {
        Ok(self.record("admin_projects").projects.clone())
    }
}
