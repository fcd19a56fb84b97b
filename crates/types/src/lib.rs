//! Row and wire types shared by the DevHub server and client.
//!
//! Status strings are persisted and serialized exactly as the database
//! stores them (`activo`, `publicado`, ...), so a row read by the server
//! deserializes unchanged on the client.

pub mod api;
pub mod events;
pub mod models;

pub use api::*;
pub use events::ChatEvent;
pub use models::*;

/// The only `valoraciones.tipo` the application writes.
pub const LIKE_KIND: &str = "like";

/// Role name that unlocks the admin panel.
pub const ADMIN_ROLE: &str = "admin";

/// Role assigned at sign-up.
pub const DEFAULT_ROLE: &str = "usuario";
