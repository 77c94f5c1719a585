use assert_matches::assert_matches;
use pretty_assertions::assert_eq;

use hashem_trainer::auth::{AppError, Role};
use hashem_trainer::models::{NewAccount, PaymentStatus, PaymentUpdate};
use hashem_trainer::services::{run_payment_reset, AccountStore};

use crate::common::{MemorySnapshot, TEST_HASH_COST};

const THREE_STUDENTS: &str = r#"{
  "ana@example.com": {
    "identifier": "ana@example.com", "name": "Ana", "password_hash": "x",
    "role": "student", "enrolled_on": "2024-01-10", "payment_status": "Paid"
  },
  "bia@example.com": {
    "identifier": "bia@example.com", "name": "Bia", "password_hash": "x",
    "role": "aluno", "enrolled_on": "2024-02-11", "payment_status": "Pago",
    "payment_type": "Pix"
  },
  "caio@example.com": {
    "identifier": "caio@example.com", "name": "Caio", "password_hash": "x",
    "role": "student", "enrolled_on": "2024-03-12", "payment_status": "Pending"
  },
  "55511112222": {
    "identifier": "55511112222", "name": "Coach", "password_hash": "x",
    "role": "professor", "enrolled_on": "2024-01-01", "payment_status": "N/A"
  }
}"#;

fn new_account(identifier: &str, role: Role) -> NewAccount {
    NewAccount {
        identifier: identifier.to_string(),
        name: "Test".to_string(),
        password: "pw".to_string(),
        role,
    }
}

#[tokio::test]
async fn test_monthly_reset_persists_exactly_once() {
    let snapshot = MemorySnapshot::with_contents(THREE_STUDENTS);
    let store = AccountStore::open(Box::new(snapshot.clone()), TEST_HASH_COST).unwrap();

    assert_eq!(run_payment_reset(&store).await, 2);
    assert_eq!(snapshot.writes(), 1);

    let persisted = snapshot.json();
    for student in ["ana@example.com", "bia@example.com", "caio@example.com"] {
        assert_eq!(persisted[student]["payment_status"], "Pending");
    }
    assert_eq!(persisted["55511112222"]["payment_status"], "N/A");

    // Nothing left to change: no second write
    assert_eq!(store.reset_monthly_payments().await.unwrap(), 0);
    assert_eq!(snapshot.writes(), 1);
}

#[tokio::test]
async fn test_legacy_role_names_load() {
    let store = AccountStore::open(
        Box::new(MemorySnapshot::with_contents(THREE_STUDENTS)),
        TEST_HASH_COST,
    )
    .unwrap();

    assert_eq!(store.students().await.len(), 3);
    let coach = store.get("55511112222").await.unwrap();
    assert_eq!(coach.role, Role::Instructor);
    assert_eq!(coach.payment_status, PaymentStatus::NotApplicable);
}

#[tokio::test]
async fn test_duplicate_registration_leaves_store_unchanged() {
    let snapshot = MemorySnapshot::default();
    let store = AccountStore::open(Box::new(snapshot.clone()), TEST_HASH_COST).unwrap();

    store
        .register(new_account("jane@example.com", Role::Student))
        .await
        .unwrap();
    let before = snapshot.json();

    assert_matches!(
        store.register(new_account(" JANE@example.com ", Role::Instructor)).await,
        Err(AppError::DuplicateIdentifier(id)) if id == "jane@example.com"
    );

    assert_eq!(snapshot.writes(), 1);
    assert_eq!(snapshot.json(), before);
    assert_eq!(store.list().await.len(), 1);
    assert_eq!(
        store.get("jane@example.com").await.unwrap().role,
        Role::Student
    );
}

#[tokio::test]
async fn test_admin_account_is_protected() {
    let store = AccountStore::open(Box::new(MemorySnapshot::default()), TEST_HASH_COST).unwrap();
    assert!(store
        .seed_admin("admin@hashem.local", "Administrator", "admin")
        .await
        .unwrap());

    assert_matches!(
        store.remove("admin@hashem.local").await,
        Err(AppError::Forbidden(_))
    );
    assert_matches!(
        store
            .set_payment_status(
                "admin@hashem.local",
                PaymentUpdate {
                    status: PaymentStatus::Paid,
                    payment_type: None,
                    reason: None,
                },
            )
            .await,
        Err(AppError::Forbidden(_))
    );

    let admin = store.get("admin@hashem.local").await.unwrap();
    assert_eq!(admin.payment_status, PaymentStatus::NotApplicable);
}

#[tokio::test]
async fn test_payment_status_is_for_students_only() {
    let snapshot = MemorySnapshot::with_contents(THREE_STUDENTS);
    let store = AccountStore::open(Box::new(snapshot.clone()), TEST_HASH_COST).unwrap();
    let paid = || PaymentUpdate {
        status: PaymentStatus::Paid,
        payment_type: Some("Pix".to_string()),
        reason: None,
    };

    assert_matches!(
        store.set_payment_status("55511112222", paid()).await,
        Err(AppError::NotFound(_))
    );
    assert_eq!(snapshot.writes(), 0);
    assert_eq!(
        store.get("55511112222").await.unwrap().payment_status,
        PaymentStatus::NotApplicable
    );

    let caio = store.set_payment_status("caio@example.com", paid()).await.unwrap();
    assert_eq!(caio.payment_status, PaymentStatus::Paid);
    assert_eq!(snapshot.writes(), 1);
}

#[tokio::test]
async fn test_registration_authenticates_with_bcrypt() {
    let store = AccountStore::open(Box::new(MemorySnapshot::default()), TEST_HASH_COST).unwrap();
    let account = store
        .register(new_account("55511112222", Role::Instructor))
        .await
        .unwrap();

    assert_ne!(account.password_hash, "pw");
    assert!(account.password_hash.starts_with("$2"));
    assert!(store.authenticate("55511112222", "pw").await.unwrap().is_some());
    assert!(store.authenticate("55511112222", "wp").await.unwrap().is_none());
    assert!(store.authenticate("nobody@example.com", "pw").await.unwrap().is_none());
}
