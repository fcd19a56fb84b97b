use std::sync::Arc;

use devhub_types::{Profile, ProfileUpdate};

use crate::{error::FormError, session::Session};

/// Edit form for the signed-in user's profile.
pub struct ProfileView {
    session: Arc<Session>,
    pub form: ProfileUpdate,
    editing: bool,
}

impl ProfileView {
    pub fn new(session: Arc<Session>) -> Self {
        let form = session
            .profile()
            .as_ref()
            .map(ProfileUpdate::from)
            .unwrap_or_default();
        Self {
            session,
            form,
            editing: false,
        }
    }

    pub fn profile(&self) -> Option<Profile> {
        self.session.profile()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn edit(&mut self) {
        self.reset();
        self.editing = true;
    }

    /// Drops unsaved changes.
    pub fn cancel(&mut self) {
        self.reset();
        self.editing = false;
    }

    fn reset(&mut self) {
        if let Some(profile) = self.session.profile() {
            self.form = ProfileUpdate::from(&profile);
        }
    }

    pub async fn save(&mut self) -> Result<Profile, FormError> {
        if self.form.first_name.trim().is_empty() || self.form.last_name.trim().is_empty() {
            return Err(FormError::Invalid(
                "First and last name are required".to_string(),
            ));
        }
        let profile = self
            .session
            .backend()
            .update_profile(&self.form)
            .await
            .map_err(|e| {
                tracing::warn!("Profile update failed: {}", e);
                FormError::rejected("Error updating profile")(e)
            })?;
        self.session.replace_profile(profile.clone());
        self.form = ProfileUpdate::from(&profile);
        self.editing = false;
        Ok(profile)
    }
}
