use std::sync::RwLock;

use async_trait::async_trait;
use devhub_types::{
    AccountStatus, AuthResponse, Category, Chat, ChatEvent, Comment, ErrorBody, LikeSummary,
    Message, NewChat, NewComment, NewMessage, NewProject, NewReport, Notification, Profile,
    ProfileUpdate, ProjectSummary, ProjectUpdate, Report, RepositoryLink, ResolveReport,
    SignInRequest, SignUpRequest, StatusUpdate,
};
use futures::StreamExt;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::mpsc;

use crate::{
    backend::{Backend, Result, Subscription},
    config::ClientConfig,
    error::ClientError,
};

const EVENT_BUFFER: usize = 32;

/// [`Backend`] over the server's JSON API.
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
    token: RwLock<Option<String>>,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.config.api_url, path)
    }

    fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_token(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = self.token().ok_or(ClientError::Unauthenticated)?;
        Ok(self
            .client
            .request(method, self.url(path))
            .bearer_auth(token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.timeout(self.config.request_timeout).send().await?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.authorized(Method::GET, path)?).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(self.authorized(Method::POST, path)?.json(body))
            .await
    }

    async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        self.send(self.authorized(Method::PUT, path)?.json(body))
            .await
    }

    async fn authenticate<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<Profile> {
        let request = self.client.post(self.url(path)).json(body);
        let auth: AuthResponse = self.send(request).await?;
        self.set_token(Some(auth.token));
        Ok(auth.profile)
    }
}

/// Turns a non-success response into [`ClientError::Api`], keeping the
/// server's error message when the body carries one.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Splits complete lines off the front of `buffer`.
fn drain_lines(buffer: &mut Vec<u8>) -> Vec<Vec<u8>> {
    let mut lines = Vec::new();
    while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
        let mut line: Vec<u8> = buffer.drain(..=pos).collect();
        line.pop();
        if !line.iter().all(u8::is_ascii_whitespace) {
            lines.push(line);
        }
    }
    lines
}

#[async_trait]
impl Backend for HttpBackend {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Profile> {
        self.authenticate("/auth/register", request).await
    }

    async fn sign_in(&self, request: &SignInRequest) -> Result<Profile> {
        self.authenticate("/auth/login", request).await
    }

    fn sign_out(&self) {
        self.set_token(None);
    }

    async fn current_profile(&self) -> Result<Profile> {
        self.get("/profile").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile> {
        self.put("/profile", update).await
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        self.get("/categories").await
    }

    async fn published_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.get("/projects").await
    }

    async fn my_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.get("/projects/mine").await
    }

    async fn project(&self, project_id: &str) -> Result<ProjectSummary> {
        self.get(&format!("/projects/{project_id}")).await
    }

    async fn create_project(&self, project: &NewProject) -> Result<ProjectSummary> {
        self.post("/projects", project).await
    }

    async fn update_project(
        &self,
        project_id: &str,
        update: &ProjectUpdate,
    ) -> Result<ProjectSummary> {
        self.put(&format!("/projects/{project_id}"), update).await
    }

    async fn like_summary(&self, project_id: &str) -> Result<LikeSummary> {
        self.get(&format!("/projects/{project_id}/likes")).await
    }

    async fn like(&self, project_id: &str) -> Result<LikeSummary> {
        self.send(self.authorized(Method::POST, &format!("/projects/{project_id}/likes"))?)
            .await
    }

    async fn unlike(&self, project_id: &str) -> Result<LikeSummary> {
        self.send(self.authorized(Method::DELETE, &format!("/projects/{project_id}/likes"))?)
            .await
    }

    async fn active_comments(&self, project_id: &str) -> Result<Vec<Comment>> {
        self.get(&format!("/projects/{project_id}/comments")).await
    }

    async fn add_comment(&self, project_id: &str, content: &str) -> Result<Comment> {
        let body = NewComment {
            content: content.to_string(),
        };
        self.post(&format!("/projects/{project_id}/comments"), &body)
            .await
    }

    async fn report_comment(&self, comment_id: &str, reason: &str) -> Result<Report> {
        let body = NewReport {
            reason: reason.to_string(),
        };
        self.post(&format!("/comments/{comment_id}/reports"), &body)
            .await
    }

    async fn repository(&self, project_id: &str) -> Result<Option<RepositoryLink>> {
        self.get(&format!("/projects/{project_id}/repository")).await
    }

    async fn chats(&self) -> Result<Vec<Chat>> {
        self.get("/chats").await
    }

    async fn create_chat(&self, chat: &NewChat) -> Result<Chat> {
        self.post("/chats", chat).await
    }

    async fn messages(&self, chat_id: &str) -> Result<Vec<Message>> {
        self.get(&format!("/chats/{chat_id}/messages")).await
    }

    async fn send_message(&self, chat_id: &str, content: &str) -> Result<Message> {
        let body = NewMessage {
            content: content.to_string(),
        };
        self.post(&format!("/chats/{chat_id}/messages"), &body)
            .await
    }

    async fn subscribe(&self, chat_id: &str) -> Result<Subscription> {
        let response = self
            .authorized(Method::GET, &format!("/chats/{chat_id}/subscribe"))?
            .send()
            .await?;
        let response = check_status(response).await?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let chat_id = chat_id.to_string();
        let reader = tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = Vec::new();
            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        tracing::warn!("Push stream for chat {} failed: {}", chat_id, e);
                        break;
                    }
                };
                buffer.extend_from_slice(&chunk);
                for line in drain_lines(&mut buffer) {
                    match serde_json::from_slice::<ChatEvent>(&line) {
                        Ok(event) => {
                            if tx.send(event).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => tracing::debug!("Skipping malformed push line: {}", e),
                    }
                }
            }
            tracing::debug!("Push stream for chat {} ended", chat_id);
        });

        Ok(Subscription::new(rx, Some(reader)))
    }

    async fn notifications(&self) -> Result<Vec<Notification>> {
        self.get("/notifications").await
    }

    async fn mark_notification_read(&self, notification_id: &str) -> Result<()> {
        self.send(self.authorized(
            Method::POST,
            &format!("/notifications/{notification_id}/read"),
        )?)
        .await
    }

    async fn admin_users(&self) -> Result<Vec<Profile>> {
        self.get("/admin/users").await
    }

    async fn set_user_status(&self, user_id: &str, status: AccountStatus) -> Result<Profile> {
        self.put(
            &format!("/admin/users/{user_id}/status"),
            &StatusUpdate { status },
        )
        .await
    }

    async fn admin_reports(&self) -> Result<Vec<Report>> {
        self.get("/admin/reports").await
    }

    async fn resolve_report(&self, report_id: &str, delete_comment: bool) -> Result<Report> {
        self.post(
            &format!("/admin/reports/{report_id}/resolve"),
            &ResolveReport { delete_comment },
        )
        .await
    }

    async fn delete_comment(&self, comment_id: &str) -> Result<()> {
        self.send(self.authorized(
            Method::POST,
            &format!("/admin/comments/{comment_id}/delete"),
        )?)
        .await
    }

    async fn admin_projects(&self) -> Result<Vec<ProjectSummary>> {
        self.get("/admin/projects").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_are_split_on_newlines_and_partial_tail_is_kept() {
        let mut buffer = b"{\"a\":1}\n\n{\"b\":2}\n{\"c\"".to_vec();
        let lines = drain_lines(&mut buffer);
        assert_eq!(lines, vec![b"{\"a\":1}".to_vec(), b"{\"b\":2}".to_vec()]);
        assert_eq!(buffer, b"{\"c\"".to_vec());
    }

    #[test]
    fn calls_without_a_token_fail_locally() {
        let backend = HttpBackend::new(ClientConfig::new("http://localhost:1")).unwrap();
        let err = backend.authorized(Method::GET, "/profile").unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated));
    }

    #[test]
    fn urls_carry_the_api_prefix() {
        let backend = HttpBackend::new(ClientConfig::new("http://example.test/")).unwrap();
        assert_eq!(backend.url("/projects"), "http://example.test/api/projects");
    }
}
