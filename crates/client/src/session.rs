use devhub_types::{Profile, SignInRequest, SignUpRequest};
use tokio::sync::watch;

use crate::{
    backend::SharedBackend,
    error::{ClientError, SignInError, SignUpError},
};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
}

impl SignUpForm {
    fn validate(&self) -> Result<(), SignUpError> {
        if self.password != self.confirm_password {
            return Err(SignUpError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(SignUpError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        Ok(())
    }
}

/// The signed-in user, shared by every view.
///
/// Views observe changes through [`Session::watch`]; `None` means signed out.
pub struct Session {
    backend: SharedBackend,
    state: watch::Sender<Option<Profile>>,
}

impl Session {
    pub fn new(backend: SharedBackend) -> Self {
        let (state, _) = watch::channel(None);
        Self { backend, state }
    }

    pub fn backend(&self) -> SharedBackend {
        self.backend.clone()
    }

    pub fn watch(&self) -> watch::Receiver<Option<Profile>> {
        self.state.subscribe()
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.borrow().clone()
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|p| p.id.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.state
            .borrow()
            .as_ref()
            .map(Profile::is_admin)
            .unwrap_or(false)
    }

    /// Registers and signs in. Password checks run before any call goes out.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<Profile, SignUpError> {
        form.validate()?;
        let request = SignUpRequest {
            email: form.email.trim().to_string(),
            password: form.password.clone(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
        };
        let profile = self.backend.sign_up(&request).await.map_err(|e| {
            tracing::warn!("Sign-up failed: {}", e);
            SignUpError::from(e)
        })?;
        tracing::info!("Signed up as {}", profile.email);
        self.replace_profile(profile.clone());
        Ok(profile)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, SignInError> {
        let request = SignInRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let profile = self.backend.sign_in(&request).await.map_err(|e| {
            tracing::warn!("Sign-in failed: {}", e);
            SignInError::from(e)
        })?;
        tracing::info!("Signed in as {}", profile.email);
        self.replace_profile(profile.clone());
        Ok(profile)
    }

    pub fn sign_out(&self) {
        self.backend.sign_out();
        self.state.send_replace(None);
    }

    /// Re-reads the profile row, picking up role or status changes.
    pub async fn refresh_profile(&self) -> Result<Profile, ClientError> {
        let profile = self.backend.current_profile().await?;
        self.replace_profile(profile.clone());
        Ok(profile)
    }

    pub(crate) fn replace_profile(&self, profile: Profile) {
        self.state.send_replace(Some(profile));
    }
}
