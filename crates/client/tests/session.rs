mod common;

use std::sync::Arc;

use common::{MockBackend, USER_ID};
use devhub_client::{FormError, ProfileView, Session, SignInError, SignUpError, SignUpForm};
use devhub_types::AccountStatus;

fn form(password: &str, confirm: &str) -> SignUpForm {
    SignUpForm {
        email: "ada@devhub.io".to_string(),
        password: password.to_string(),
        confirm_password: confirm.to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    }
}

#[tokio::test]
async fn password_mismatch_never_reaches_the_service() {
    let backend = MockBackend::new();
    let session = Session::new(backend.shared());

    let err = session
        .sign_up(&form("s3cret-pass", "s3cret-pazz"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignUpError::PasswordMismatch));
    assert!(!backend.called("sign_up"));
    assert!(!session.is_signed_in());
}

#[tokio::test]
async fn short_passwords_are_rejected_locally() {
    let backend = MockBackend::new();
    let session = Session::new(backend.shared());

    let err = session.sign_up(&form("abc", "abc")).await.unwrap_err();

    assert!(matches!(err, SignUpError::PasswordTooShort { min: 6 }));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn duplicate_email_gets_its_own_message() {
    let backend = MockBackend::new();
    backend.state().sign_up_failure = Some((409, "Email already registered".to_string()));
    let session = Session::new(backend.shared());

    let err = session
        .sign_up(&form("s3cret-pass", "s3cret-pass"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignUpError::AlreadyRegistered));
    assert_eq!(err.to_string(), "This email is already registered");
}

#[tokio::test]
async fn other_failures_get_the_generic_message() {
    let backend = MockBackend::new();
    backend.state().sign_up_failure = Some((500, "Internal server error".to_string()));
    let session = Session::new(backend.shared());

    let err = session
        .sign_up(&form("s3cret-pass", "s3cret-pass"))
        .await
        .unwrap_err();

    assert!(matches!(err, SignUpError::Failed(_)));
    assert_eq!(err.to_string(), "Error creating account");
    assert!(!session.is_signed_in());
}

#[tokio::test]
async fn sign_up_and_sign_out_are_observable() {
    let backend = MockBackend::new();
    let session = Session::new(backend.shared());
    let mut watcher = session.watch();

    let profile = session
        .sign_up(&form("s3cret-pass", "s3cret-pass"))
        .await
        .unwrap();
    assert_eq!(profile.email, "ada@devhub.io");
    assert!(watcher.has_changed().unwrap());
    assert_eq!(
        watcher.borrow_and_update().as_ref().map(|p| p.id.clone()),
        Some(USER_ID.to_string())
    );
    assert_eq!(session.user_id().as_deref(), Some(USER_ID));
    assert!(!session.is_admin());

    session.sign_out();
    assert!(watcher.borrow_and_update().is_none());
    assert!(backend.called("sign_out"));
}

#[tokio::test]
async fn suspended_accounts_cannot_sign_in() {
    let backend = MockBackend::new();
    backend.state().profiles[0].status = AccountStatus::Suspended;
    let session = Session::new(backend.shared());

    let err = session
        .sign_in("ada@devhub.io", "s3cret-pass")
        .await
        .unwrap_err();
    assert!(matches!(err, SignInError::Suspended));

    let err = session
        .sign_in("nobody@devhub.io", "s3cret-pass")
        .await
        .unwrap_err();
    assert!(matches!(err, SignInError::InvalidCredentials));
    assert!(!session.is_signed_in());
}

#[tokio::test]
async fn refresh_picks_up_a_role_change() {
    let backend = MockBackend::new();
    let session = Session::new(backend.shared());
    session.sign_in("ada@devhub.io", "s3cret-pass").await.unwrap();
    assert!(!session.is_admin());

    backend.state().profiles[0].role = Some("admin".to_string());
    session.refresh_profile().await.unwrap();

    assert!(session.is_admin());
}

#[tokio::test]
async fn saving_the_profile_updates_the_session() {
    let backend = MockBackend::new();
    let session = Arc::new(Session::new(backend.shared()));
    session.sign_in("ada@devhub.io", "s3cret-pass").await.unwrap();

    let mut view = ProfileView::new(session.clone());
    view.edit();
    view.form.skills = Some("Rust, SQL".to_string());
    view.form.first_name = "Augusta".to_string();
    let saved = view.save().await.unwrap();

    assert_eq!(saved.skills.as_deref(), Some("Rust, SQL"));
    assert!(!view.is_editing());
    assert_eq!(
        session.profile().map(|p| p.first_name),
        Some("Augusta".to_string())
    );
}

#[tokio::test]
async fn profile_requires_a_name() {
    let backend = MockBackend::new();
    let session = Arc::new(Session::new(backend.shared()));
    session.sign_in("ada@devhub.io", "s3cret-pass").await.unwrap();

    let mut view = ProfileView::new(session);
    view.form.last_name = "  ".to_string();

    let err = view.save().await.unwrap_err();
    assert!(matches!(err, FormError::Invalid(_)));
    assert!(!backend.called("update_profile"));
}
