//! Request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

use crate::models::{AccountStatus, ChatKind, Profile, ProjectStatus, RepositoryKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub profile: Profile,
}

/// Fields a user may change on their own profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub skills: Option<String>,
    pub interests: Option<String>,
    pub repository_links: Option<String>,
}

impl From<&Profile> for ProfileUpdate {
    fn from(profile: &Profile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            skills: profile.skills.clone(),
            interests: profile.interests.clone(),
            repository_links: profile.repository_links.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRepositoryLink {
    #[serde(default)]
    pub kind: RepositoryKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub repository: Option<NewRepositoryLink>,
}

/// Full-record replacement of a project's editable fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub title: String,
    pub description: String,
    pub category_id: Option<String>,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComment {
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChat {
    pub kind: ChatKind,
    pub name: Option<String>,
    /// Other members; the creator is always added.
    pub participant_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: AccountStatus,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResolveReport {
    /// Also soft-delete the reported comment.
    #[serde(default)]
    pub delete_comment: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
