pub mod admin;
pub mod auth;
pub mod chats;
pub mod comments;
pub mod likes;
pub mod notifications;
pub mod profiles;
pub mod projects;
