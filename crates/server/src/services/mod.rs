pub mod notifications;
pub mod realtime;
