use devhub_types::{AccountStatus, Profile, ProjectSummary, Report};

use crate::{backend::SharedBackend, error::ClientError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Users,
    Reports,
    Projects,
}

/// Moderation screen. Each tab reloads its own list after a mutation.
pub struct AdminPanel {
    backend: SharedBackend,
    tab: AdminTab,
    users: Vec<Profile>,
    reports: Vec<Report>,
    projects: Vec<ProjectSummary>,
}

impl AdminPanel {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            backend,
            tab: AdminTab::default(),
            users: Vec::new(),
            reports: Vec::new(),
            projects: Vec::new(),
        }
    }

    pub fn tab(&self) -> AdminTab {
        self.tab
    }

    pub fn users(&self) -> &[Profile] {
        &self.users
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn projects(&self) -> &[ProjectSummary] {
        &self.projects
    }

    pub async fn select_tab(&mut self, tab: AdminTab) -> Result<(), ClientError> {
        self.tab = tab;
        self.load().await
    }

    /// Reloads the list of the active tab, keeping the old list on error.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let loaded = match self.tab {
            AdminTab::Users => self.backend.admin_users().await.map(|u| self.users = u),
            AdminTab::Reports => self.backend.admin_reports().await.map(|r| self.reports = r),
            AdminTab::Projects => self
                .backend
                .admin_projects()
                .await
                .map(|p| self.projects = p),
        };
        if let Err(e) = &loaded {
            tracing::warn!("Failed to load admin tab {:?}: {}", self.tab, e);
        }
        loaded
    }

    pub async fn set_user_status(
        &mut self,
        user_id: &str,
        status: AccountStatus,
    ) -> Result<Profile, ClientError> {
        let profile = self.backend.set_user_status(user_id, status).await?;
        tracing::info!("User {} is now {:?}", user_id, status);
        if let Ok(users) = self.backend.admin_users().await {
            self.users = users;
        }
        Ok(profile)
    }

    /// Marks a report resolved, optionally soft-deleting its comment.
    pub async fn resolve_report(
        &mut self,
        report_id: &str,
        delete_comment: bool,
    ) -> Result<Report, ClientError> {
        let report = self.backend.resolve_report(report_id, delete_comment).await?;
        if let Ok(reports) = self.backend.admin_reports().await {
            self.reports = reports;
        }
        Ok(report)
    }

    pub async fn delete_comment(&mut self, comment_id: &str) -> Result<(), ClientError> {
        self.backend.delete_comment(comment_id).await?;
        if let Ok(reports) = self.backend.admin_reports().await {
            self.reports = reports;
        }
        Ok(())
    }
}
