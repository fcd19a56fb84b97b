use devhub_types::{Comment, LikeSummary, ProjectSummary, ProjectUpdate, Report, RepositoryLink};

use crate::{
    backend::SharedBackend,
    error::{ClientError, FormError},
};

pub struct ProjectDetail {
    backend: SharedBackend,
    project: ProjectSummary,
    likes: LikeSummary,
    comments: Vec<Comment>,
    repository: Option<RepositoryLink>,
}

impl ProjectDetail {
    /// Loads the project, then its likes, comments and repository link
    /// concurrently. A failed secondary load leaves that part empty.
    pub async fn open(backend: SharedBackend, project_id: &str) -> Result<Self, ClientError> {
        let project = backend.project(project_id).await?;
        let mut detail = Self {
            backend,
            project,
            likes: LikeSummary {
                count: 0,
                liked: false,
            },
            comments: Vec::new(),
            repository: None,
        };
        detail.reload().await;
        Ok(detail)
    }

    pub async fn reload(&mut self) {
        let id = self.project.id.as_str();
        let (likes, comments, repository) = tokio::join!(
            self.backend.like_summary(id),
            self.backend.active_comments(id),
            self.backend.repository(id),
        );
        match likes {
            Ok(likes) => self.likes = likes,
            Err(e) => tracing::warn!("Failed to load likes for {}: {}", id, e),
        }
        match comments {
            Ok(comments) => self.comments = comments,
            Err(e) => tracing::warn!("Failed to load comments for {}: {}", id, e),
        }
        match repository {
            Ok(repository) => self.repository = repository,
            Err(e) => tracing::warn!("Failed to load repository for {}: {}", id, e),
        }
    }

    pub fn project(&self) -> &ProjectSummary {
        &self.project
    }

    pub fn likes(&self) -> LikeSummary {
        self.likes
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn repository(&self) -> Option<&RepositoryLink> {
        self.repository.as_ref()
    }

    /// Likes or unlikes depending on the current membership and adopts the
    /// count and membership the server reports back.
    pub async fn toggle_like(&mut self) -> Result<LikeSummary, ClientError> {
        let id = self.project.id.as_str();
        let summary = if self.likes.liked {
            self.backend.unlike(id).await?
        } else {
            self.backend.like(id).await?
        };
        self.likes = summary;
        Ok(summary)
    }

    /// Posts a comment and reloads the list. Blank text does nothing and
    /// returns `None`.
    pub async fn add_comment(&mut self, text: &str) -> Result<Option<Comment>, FormError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let comment = self
            .backend
            .add_comment(&self.project.id, text)
            .await
            .map_err(FormError::rejected("Error adding comment"))?;

        match self.backend.active_comments(&self.project.id).await {
            Ok(comments) => self.comments = comments,
            Err(e) => tracing::warn!("Failed to reload comments: {}", e),
        }
        Ok(Some(comment))
    }

    pub async fn report_comment(
        &self,
        comment_id: &str,
        reason: &str,
    ) -> Result<Report, FormError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(FormError::Invalid("A reason is required".to_string()));
        }
        self.backend
            .report_comment(comment_id, reason)
            .await
            .map_err(FormError::rejected("Error reporting comment"))
    }

    /// Owner-only full update.
    pub async fn update(&mut self, update: &ProjectUpdate) -> Result<&ProjectSummary, FormError> {
        let project = self
            .backend
            .update_project(&self.project.id, update)
            .await
            .map_err(FormError::rejected("Error updating project"))?;
        self.project = project;
        Ok(&self.project)
    }
}
