use std::sync::Arc;

use login_panel::{
    AuthError, DataStoreKind, RegistrationAction, RegistrationForm, SessionStore, UserRepository,
    UserStore, UserUpdate, ValidationError, connect_data_store,
};

use crate::common::{CountingRepository, FailingRepository, panel, panel_with, registration_form};

/// Test that a malformed email is rejected before the repository is touched
#[tokio::test]
async fn test_bad_email_has_no_repository_side_effect() {
    let repo = Arc::new(CountingRepository::default());
    let panel = panel_with(repo.clone(), Arc::new(SessionStore::new(3600)));

    let result = panel
        .submit_registration(RegistrationAction::Register, &registration_form("bad"))
        .await;

    assert_eq!(result, Err(ValidationError::InvalidEmailFormat.into()));
    assert_eq!(repo.calls(), 0);

    let login = panel.workflow().login("bad", "secret").await;
    assert_eq!(login, Err(ValidationError::InvalidEmailFormat.into()));
    assert_eq!(repo.calls(), 0);
}

/// Test that a missing name is reported before an invalid authorization code
#[tokio::test]
async fn test_missing_name_wins_over_bad_authorization_code() {
    let panel = panel();
    let form = RegistrationForm {
        name: String::new(),
        authorization_code: "NOT-ON-THE-LIST".to_string(),
        ..registration_form("new@b.com")
    };

    let result = panel
        .submit_registration(RegistrationAction::Register, &form)
        .await;

    assert_eq!(result, Err(ValidationError::MissingName.into()));
}

/// Test that a registration rejected by validation stores nothing
#[tokio::test]
async fn test_rejected_registration_stores_nothing() {
    let repo = Arc::new(CountingRepository::default());
    let panel = panel_with(repo.clone(), Arc::new(SessionStore::new(3600)));
    let form = RegistrationForm {
        confirm_password: "different".to_string(),
        ..registration_form("a@b.com")
    };

    let result = panel
        .submit_registration(RegistrationAction::Register, &form)
        .await;

    assert_eq!(result, Err(ValidationError::PasswordMismatch.into()));
    assert_eq!(repo.find_by_email("a@b.com").await.unwrap(), None);
}

/// Test the full register, update, login, delete cycle
#[tokio::test]
async fn test_user_lifecycle() {
    let panel = panel();
    let email = "lifecycle@b.com";

    assert_eq!(
        panel
            .submit_registration(RegistrationAction::Register, &registration_form(email))
            .await,
        Ok("User registered successfully!")
    );

    panel
        .update_user(
            email,
            UserUpdate {
                permission: Some("viewer".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let session = panel.session(login_panel::SessionToken::generate());
    panel
        .login_session(session.token(), email, "secret")
        .await
        .unwrap();
    assert_eq!(session.permission().await.as_deref(), Some("viewer"));

    panel.delete_user(email).await.unwrap();
    assert_eq!(
        panel.workflow().login(email, "secret").await,
        Err(AuthError::InvalidCredentials)
    );
}

/// Test that racing registrations for one email produce exactly one account
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_has_one_winner() {
    let panel = panel();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let panel = panel.clone();
            tokio::spawn(async move {
                panel
                    .submit_registration(
                        RegistrationAction::Register,
                        &registration_form("race@b.com"),
                    )
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(err) => assert_eq!(err, ValidationError::AlreadyRegistered.into()),
        }
    }
    assert_eq!(winners, 1);
}

/// Test that repository failures surface without internal detail
#[tokio::test]
async fn test_storage_failure_is_generic_to_the_user() {
    let panel = panel_with(Arc::new(FailingRepository), Arc::new(SessionStore::new(3600)));

    let err = panel
        .submit_registration(RegistrationAction::Register, &registration_form("a@b.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Storage(_)));
    assert!(!err.user_message().contains("db.internal"));

    let err = panel.workflow().login("a@b.com", "secret").await.unwrap_err();
    assert!(matches!(err, AuthError::Storage(_)));
}

/// Test the workflow against the sqlite-backed repository
#[tokio::test]
async fn test_workflow_on_sqlite() {
    let data_store = connect_data_store(DataStoreKind::Sqlite, "sqlite::memory:")
        .unwrap()
        .unwrap();
    let repo = Arc::new(UserStore::new(data_store).await.unwrap());
    let panel = panel_with(repo.clone(), Arc::new(SessionStore::new(3600)));

    panel
        .submit_registration(RegistrationAction::Register, &registration_form("sql@b.com"))
        .await
        .unwrap();
    assert_eq!(
        panel
            .submit_registration(RegistrationAction::Register, &registration_form("sql@b.com"))
            .await,
        Err(ValidationError::AlreadyRegistered.into())
    );

    let user = panel.workflow().login("sql@b.com", "secret").await.unwrap();
    assert_eq!(user.enterprise, "ACME");
    assert!(user.sequence_number.is_some());

    let delete = RegistrationForm {
        email: "sql@b.com".to_string(),
        authorization_code: registration_form("sql@b.com").authorization_code,
        ..Default::default()
    };
    panel
        .submit_registration(RegistrationAction::Delete, &delete)
        .await
        .unwrap();
    assert_eq!(repo.find_by_email("sql@b.com").await.unwrap(), None);
}
