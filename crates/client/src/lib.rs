//! Session context and view controllers for DevHub.
//!
//! Every controller talks to the service through the [`Backend`] trait and
//! keeps the result as plain view state. [`HttpBackend`] is the production
//! implementation.

pub mod admin;
pub mod backend;
pub mod config;
pub mod detail;
pub mod error;
pub mod http;
pub mod messaging;
pub mod notifications;
pub mod profile;
pub mod projects;
pub mod session;

pub use admin::{AdminPanel, AdminTab};
pub use backend::{Backend, SharedBackend, Subscription};
pub use config::ClientConfig;
pub use detail::ProjectDetail;
pub use error::{ClientError, FormError, SignInError, SignUpError};
pub use http::HttpBackend;
pub use messaging::MessagingView;
pub use notifications::NotificationsView;
pub use profile::ProfileView;
pub use projects::{CategoryFilter, ProjectForm, ProjectsView};
pub use session::{Session, SignUpForm};
