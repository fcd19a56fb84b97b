use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum AccountStatus {
    #[serde(rename = "activo")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "activo"))]
    Active,
    #[serde(rename = "suspendido")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "suspendido"))]
    Suspended,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum ProjectStatus {
    #[serde(rename = "borrador")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "borrador"))]
    Draft,
    #[default]
    #[serde(rename = "publicado")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "publicado"))]
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum CommentStatus {
    #[serde(rename = "activo")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "activo"))]
    Active,
    #[serde(rename = "eliminado")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "eliminado"))]
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum ReportStatus {
    #[serde(rename = "pendiente")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "pendiente"))]
    Pending,
    #[serde(rename = "resuelto")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "resuelto"))]
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum ChatKind {
    #[serde(rename = "directo")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "directo"))]
    Direct,
    #[serde(rename = "grupo")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "grupo"))]
    Group,
}

/// Hosting service behind a repository link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum RepositoryKind {
    #[default]
    Github,
    Gitlab,
    Bitbucket,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum NotificationKind {
    Like,
    Comment,
}

/// Application-level user record. The credential lives server-side only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Option<String>,
    pub status: AccountStatus,
    pub avatar_url: Option<String>,
    pub skills: Option<String>,
    pub interests: Option<String>,
    pub repository_links: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(crate::ADMIN_ROLE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// A project row joined with its owner's name and category name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProjectSummary {
    pub id: String,
    pub owner_id: String,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProjectSummary {
    pub fn owner_name(&self) -> String {
        format!("{} {}", self.owner_first_name, self.owner_last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeSummary {
    pub count: i64,
    pub liked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Comment {
    pub id: String,
    pub project_id: String,
    pub author_id: String,
    pub author_first_name: String,
    pub author_last_name: String,
    pub content: String,
    pub status: CommentStatus,
    pub created_at: DateTime<Utc>,
}

/// A comment report joined with what the moderation tab displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Report {
    pub id: String,
    pub comment_id: String,
    pub comment_content: String,
    pub project_title: String,
    pub reporter_id: String,
    pub reporter_first_name: String,
    pub reporter_last_name: String,
    pub reason: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RepositoryLink {
    pub id: String,
    pub project_id: String,
    pub kind: RepositoryKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Chat {
    pub id: String,
    pub kind: ChatKind,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_first_name: String,
    pub sender_last_name: String,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    pub read: bool,
}
