use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    #[error("not signed in")]
    Unauthenticated,

    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Outcome of the registration form.
#[derive(Error, Debug)]
pub enum SignUpError {
    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("This email is already registered")]
    AlreadyRegistered,

    #[error("Error creating account")]
    Failed(#[source] ClientError),
}

impl From<ClientError> for SignUpError {
    fn from(err: ClientError) -> Self {
        if err.status() == Some(409) {
            SignUpError::AlreadyRegistered
        } else {
            SignUpError::Failed(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum SignInError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("This account has been suspended")]
    Suspended,

    #[error("Error signing in")]
    Failed(#[source] ClientError),
}

impl From<ClientError> for SignInError {
    fn from(err: ClientError) -> Self {
        match err.status() {
            Some(401) => SignInError::InvalidCredentials,
            Some(403) => SignInError::Suspended,
            _ => SignInError::Failed(err),
        }
    }
}

/// Error of a data-entry form: rejected locally, or rejected by the
/// service and reported with the form's generic message.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("{0}")]
    Invalid(String),

    #[error("{message}")]
    Rejected {
        message: &'static str,
        #[source]
        source: ClientError,
    },
}

impl FormError {
    pub fn rejected(message: &'static str) -> impl FnOnce(ClientError) -> FormError {
        move |source| FormError::Rejected { message, source }
    }
}
