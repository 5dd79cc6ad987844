use chrono::NaiveDate;
use mockall::predicate;
use mockall::Sequence;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use volly_api::services::accounts::AccountService;
use volly_core::errors::VollyError;
use volly_core::models::user::{
    CreateUserRequest, CreateVolunteerRequest, Role, UpdateUserRequest,
};
use volly_db::models::{DbSignup, DbUser, DbVolunteer};
use volly_db::store::{MockUserStore, UserUpdate, VolunteerRecord};
use volly_directory::{IdentityRecord, MockIdentityDirectory};

fn sample_user(id: i32, auth_id: &str) -> DbUser {
    DbUser {
        id,
        auth_id: auth_id.to_string(),
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        role: "volunteer".to_string(),
        phone_number: None,
    }
}

fn sample_identity(id: &str, email: &str) -> IdentityRecord {
    IdentityRecord {
        id: id.to_string(),
        email: email.to_string(),
    }
}

fn sample_volunteer_record(user_id: i32, auth_id: &str) -> VolunteerRecord {
    VolunteerRecord {
        user: sample_user(user_id, auth_id),
        profile: DbVolunteer {
            user_id,
            hire_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            date_of_birth: None,
            pronouns: None,
        },
        skill_ids: vec![1],
        branch_ids: vec![2],
        signups: vec![DbSignup {
            shift_id: 4,
            user_id,
            num_volunteers: 1,
            note: None,
            status: "CONFIRMED".to_string(),
        }],
    }
}

fn create_user_request() -> CreateUserRequest {
    CreateUserRequest {
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        email: "dana@example.org".to_string(),
        password: Some("hunter2hunter2".to_string()),
        auth_id: None,
        role: Role::Volunteer,
        phone_number: None,
    }
}

fn service(store: MockUserStore, directory: MockIdentityDirectory) -> AccountService {
    AccountService::new(Arc::new(store), Arc::new(directory))
}

#[tokio::test]
async fn test_create_user_mints_identity_then_writes_row() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    directory
        .expect_create_identity()
        .withf(|email, password| email == "dana@example.org" && password == "hunter2hunter2")
        .times(1)
        .returning(|_, _| Ok(sample_identity("dir_1", "dana@example.org")));
    store
        .expect_create_user()
        .withf(|new_user| new_user.auth_id == "dir_1" && new_user.role == "volunteer")
        .times(1)
        .returning(|_| Ok(sample_user(10, "dir_1")));

    let response = service(store, directory)
        .create_user(create_user_request())
        .await
        .unwrap();

    assert_eq!(response.id, 10);
    assert_eq!(response.auth_id, "dir_1");
    assert_eq!(response.email, "dana@example.org");
    assert_eq!(response.role, Role::Volunteer);
}

#[tokio::test]
async fn test_create_user_rejects_blank_name_before_any_write() {
    // No expectations registered: any store or directory call would panic.
    let store = MockUserStore::new();
    let directory = MockIdentityDirectory::new();

    let mut request = create_user_request();
    request.first_name = "   ".to_string();

    let err = service(store, directory).create_user(request).await.unwrap_err();
    assert!(matches!(err, VollyError::Validation(_)));
}

#[tokio::test]
async fn test_create_user_requires_password_or_auth_id() {
    let store = MockUserStore::new();
    let directory = MockIdentityDirectory::new();

    let mut request = create_user_request();
    request.password = None;

    let err = service(store, directory).create_user(request).await.unwrap_err();
    assert!(matches!(err, VollyError::Validation(_)));
}

#[tokio::test]
async fn test_create_user_deletes_minted_identity_when_row_write_fails() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    directory
        .expect_create_identity()
        .times(1)
        .returning(|_, _| Ok(sample_identity("dir_1", "dana@example.org")));
    store
        .expect_create_user()
        .times(1)
        .returning(|_| Err(eyre::eyre!("unique violation")));
    directory
        .expect_delete_identity()
        .withf(|id| id == "dir_1")
        .times(1)
        .returning(|_| Ok(()));

    let err = service(store, directory)
        .create_user(create_user_request())
        .await
        .unwrap_err();

    // The original store error comes back, not the compensation outcome.
    assert!(err.to_string().contains("unique violation"));
}

#[tokio::test]
async fn test_create_user_keeps_preexisting_identity_when_row_write_fails() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    // Provider-originated signup: the identity already exists, so the
    // compensation must not delete it. No delete_identity expectation.
    directory
        .expect_get_identity()
        .withf(|id| id == "dir_ext")
        .times(1)
        .returning(|_| Ok(sample_identity("dir_ext", "dana@example.org")));
    store
        .expect_create_user()
        .times(1)
        .returning(|_| Err(eyre::eyre!("row write failed")));

    let mut request = create_user_request();
    request.password = None;
    request.auth_id = Some("dir_ext".to_string());

    let err = service(store, directory).create_user(request).await.unwrap_err();
    assert!(err.to_string().contains("row write failed"));
}

#[tokio::test]
async fn test_create_user_propagates_original_error_when_compensation_fails() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    directory
        .expect_create_identity()
        .times(1)
        .returning(|_, _| Ok(sample_identity("dir_1", "dana@example.org")));
    store
        .expect_create_user()
        .times(1)
        .returning(|_| Err(eyre::eyre!("original failure")));
    directory
        .expect_delete_identity()
        .times(1)
        .returning(|_| Err(VollyError::Directory("delete also failed".to_string())));

    let err = service(store, directory)
        .create_user(create_user_request())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("original failure"));
}

#[tokio::test]
async fn test_get_user_merges_directory_email() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    store
        .expect_get_user()
        .with(predicate::eq(10))
        .times(1)
        .returning(|_| Ok(Some(sample_user(10, "dir_1"))));
    directory
        .expect_get_identity()
        .withf(|id| id == "dir_1")
        .times(1)
        .returning(|_| Ok(sample_identity("dir_1", "current@example.org")));

    let response = service(store, directory).get_user(10).await.unwrap();
    assert_eq!(response.email, "current@example.org");
}

#[tokio::test]
async fn test_get_user_not_found() {
    let mut store = MockUserStore::new();
    let directory = MockIdentityDirectory::new();

    store.expect_get_user().times(1).returning(|_| Ok(None));

    let err = service(store, directory).get_user(99).await.unwrap_err();
    assert!(matches!(err, VollyError::NotFound(_)));
}

#[tokio::test]
async fn test_list_users_resolves_each_email() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    store.expect_list_users().times(1).returning(|| {
        Ok(vec![sample_user(1, "dir_a"), sample_user(2, "dir_b")])
    });
    directory
        .expect_get_identity()
        .withf(|id| id == "dir_a")
        .times(1)
        .returning(|_| Ok(sample_identity("dir_a", "a@example.org")));
    directory
        .expect_get_identity()
        .withf(|id| id == "dir_b")
        .times(1)
        .returning(|_| Ok(sample_identity("dir_b", "b@example.org")));

    let responses = service(store, directory).list_users().await.unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].email, "a@example.org");
    assert_eq!(responses[1].email, "b@example.org");
}

#[tokio::test]
async fn test_update_user_restores_snapshot_when_directory_fails() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();
    let mut seq = Sequence::new();

    let current = sample_user(10, "dir_1");
    let snapshot = UserUpdate::snapshot_of(&current);

    store
        .expect_get_user()
        .times(1)
        .in_sequence(&mut seq)
        .returning(move |_| Ok(Some(sample_user(10, "dir_1"))));
    store
        .expect_update_user()
        .withf(|_, update| update.first_name == "Maya")
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| {
            let mut user = sample_user(10, "dir_1");
            user.first_name = "Maya".to_string();
            Ok(user)
        });
    directory
        .expect_update_identity_email()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(VollyError::Directory("email taken".to_string())));
    store
        .expect_update_user()
        .with(predicate::eq(10), predicate::eq(snapshot))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(sample_user(10, "dir_1")));

    let request = UpdateUserRequest {
        first_name: "Maya".to_string(),
        last_name: "Reyes".to_string(),
        email: "maya@example.org".to_string(),
        role: Role::Volunteer,
        phone_number: None,
    };

    let err = service(store, directory)
        .update_user_by_id(10, request)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("email taken"));
}

#[tokio::test]
async fn test_update_user_propagates_directory_error_when_restore_fails() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();
    let mut seq = Sequence::new();

    store
        .expect_get_user()
        .times(1)
        .returning(|_| Ok(Some(sample_user(10, "dir_1"))));
    store
        .expect_update_user()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Ok(sample_user(10, "dir_1")));
    directory
        .expect_update_identity_email()
        .times(1)
        .returning(|_, _| Err(VollyError::Directory("email taken".to_string())));
    store
        .expect_update_user()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|_, _| Err(eyre::eyre!("restore failed")));

    let request = UpdateUserRequest {
        first_name: "Maya".to_string(),
        last_name: "Reyes".to_string(),
        email: "maya@example.org".to_string(),
        role: Role::Volunteer,
        phone_number: None,
    };

    let err = service(store, directory)
        .update_user_by_id(10, request)
        .await
        .unwrap_err();

    // Still the directory error, never the rollback error.
    assert!(err.to_string().contains("email taken"));
}

#[tokio::test]
async fn test_delete_user_restores_row_when_directory_delete_fails() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    store
        .expect_get_user()
        .times(1)
        .returning(|_| Ok(Some(sample_user(10, "dir_1"))));
    store.expect_delete_user().times(1).returning(|_| Ok(()));
    directory
        .expect_delete_identity()
        .withf(|id| id == "dir_1")
        .times(1)
        .returning(|_| Err(VollyError::Directory("directory unavailable".to_string())));
    store
        .expect_restore_user()
        .withf(|user| user.id == 10 && user.auth_id == "dir_1")
        .times(1)
        .returning(|_| Ok(()));

    let err = service(store, directory).delete_user_by_id(10).await.unwrap_err();
    assert!(err.to_string().contains("directory unavailable"));
}

#[tokio::test]
async fn test_delete_user_succeeds_when_both_systems_commit() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    store
        .expect_get_user()
        .times(1)
        .returning(|_| Ok(Some(sample_user(10, "dir_1"))));
    store.expect_delete_user().times(1).returning(|_| Ok(()));
    directory
        .expect_delete_identity()
        .times(1)
        .returning(|_| Ok(()));

    let deleted = service(store, directory).delete_user_by_id(10).await.unwrap();
    assert_eq!(deleted, 10);
}

#[tokio::test]
async fn test_delete_volunteer_restores_full_record_on_directory_failure() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    store
        .expect_get_volunteer()
        .with(predicate::eq(10))
        .times(1)
        .returning(|_| Ok(Some(sample_volunteer_record(10, "dir_1"))));
    store
        .expect_delete_volunteer()
        .times(1)
        .returning(|_| Ok(()));
    directory
        .expect_delete_identity()
        .times(1)
        .returning(|_| Err(VollyError::Directory("timeout".to_string())));
    store
        .expect_restore_volunteer()
        .withf(|record| {
            record.user.id == 10 && record.skill_ids == vec![1] && record.signups.len() == 1
        })
        .times(1)
        .returning(|_| Ok(()));

    let err = service(store, directory)
        .delete_volunteer_by_id(10)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("timeout"));
}

#[tokio::test]
async fn test_delete_user_by_email_resolves_through_directory() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    directory
        .expect_get_identity_by_email()
        .withf(|email| email == "dana@example.org")
        .times(1)
        .returning(|_| Ok(sample_identity("dir_1", "dana@example.org")));
    store
        .expect_get_user_by_auth_id()
        .withf(|auth_id| auth_id == "dir_1")
        .times(1)
        .returning(|_| Ok(Some(sample_user(10, "dir_1"))));
    store
        .expect_get_user()
        .with(predicate::eq(10))
        .times(1)
        .returning(|_| Ok(Some(sample_user(10, "dir_1"))));
    store.expect_delete_user().times(1).returning(|_| Ok(()));
    directory
        .expect_delete_identity()
        .times(1)
        .returning(|_| Ok(()));

    let deleted = service(store, directory)
        .delete_user_by_email("dana@example.org")
        .await
        .unwrap();
    assert_eq!(deleted, 10);
}

#[tokio::test]
async fn test_create_volunteer_rolls_back_identity_on_store_failure() {
    let mut store = MockUserStore::new();
    let mut directory = MockIdentityDirectory::new();

    directory
        .expect_create_identity()
        .times(1)
        .returning(|_, _| Ok(sample_identity("dir_9", "vol@example.org")));
    store
        .expect_create_volunteer()
        .times(1)
        .returning(|_, _| Err(eyre::eyre!("missing branch")));
    directory
        .expect_delete_identity()
        .withf(|id| id == "dir_9")
        .times(1)
        .returning(|_| Ok(()));

    let request = CreateVolunteerRequest {
        first_name: "Dana".to_string(),
        last_name: "Reyes".to_string(),
        email: "vol@example.org".to_string(),
        password: Some("hunter2hunter2".to_string()),
        auth_id: None,
        phone_number: None,
        hire_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        date_of_birth: None,
        pronouns: None,
        skill_ids: vec![],
        branch_ids: vec![999],
    };

    let err = service(store, directory)
        .create_volunteer(request)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing branch"));
}
