use lodge_access::domain::types::Notification;
use lodge_access::error::AccessServiceError;
use lodge_access::usecase::account::{
    AuthenticateUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
    UpdateSelfInput, UpdateSelfUseCase,
};
use lodge_auth_types::token::{issue_token_with_exp, validate_access_token};
use lodge_domain::account::AccountStatus;
use lodge_domain::level::Level;
use lodge_testing::auth::MockBearer;

use crate::helpers::{
    JWT_SECRET, MockAccountRepo, MockHasher, MockNotifier, account, member,
};

fn register_input(email: &str, level: i64) -> RegisterInput {
    RegisterInput {
        email: email.to_owned(),
        password: "s3cret".to_owned(),
        full_name: "Alice Example".to_owned(),
        level,
    }
}

// ── Register ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_as_pending_and_notify_reviewers() {
    let accounts = MockAccountRepo::empty();
    let notifier = MockNotifier::default();
    let usecase = RegisterUseCase {
        accounts: accounts.clone(),
        hasher: MockHasher,
        notifier: notifier.clone(),
    };

    let created = usecase
        .execute(register_input("alice@example.com", 2))
        .await
        .unwrap();

    assert_eq!(created.status, AccountStatus::Pending);
    assert_eq!(created.level, Level::Companheiro);
    assert!(created.role.is_none());
    let stored = accounts.get_by_email("alice@example.com").unwrap();
    assert_eq!(stored.password_hash, "hashed:s3cret");
    assert_eq!(
        notifier.sent(),
        vec![Notification::NewRegistration {
            full_name: "Alice Example".to_owned(),
            email: "alice@example.com".to_owned(),
            level: Level::Companheiro,
        }]
    );
}

#[tokio::test]
async fn should_reject_duplicate_email() {
    let accounts = MockAccountRepo::new(vec![member("alice@example.com", Level::Aprendiz)]);
    let usecase = RegisterUseCase {
        accounts: accounts.clone(),
        hasher: MockHasher,
        notifier: MockNotifier::default(),
    };

    let err = usecase
        .execute(register_input("alice@example.com", 1))
        .await
        .unwrap_err();

    assert!(matches!(err, AccessServiceError::EmailAlreadyRegistered));
    assert_eq!(accounts.accounts.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_out_of_range_level() {
    for level in [0, 4, -1] {
        let accounts = MockAccountRepo::empty();
        let usecase = RegisterUseCase {
            accounts: accounts.clone(),
            hasher: MockHasher,
            notifier: MockNotifier::default(),
        };
        let err = usecase
            .execute(register_input("alice@example.com", level))
            .await
            .unwrap_err();
        assert!(matches!(err, AccessServiceError::InvalidLevel), "level {level}");
        assert!(accounts.get_by_email("alice@example.com").is_none());
    }
}

#[tokio::test]
async fn should_register_even_when_notice_fails() {
    let accounts = MockAccountRepo::empty();
    let usecase = RegisterUseCase {
        accounts: accounts.clone(),
        hasher: MockHasher,
        notifier: MockNotifier::failing(),
    };

    usecase
        .execute(register_input("alice@example.com", 1))
        .await
        .unwrap();

    assert!(accounts.get_by_email("alice@example.com").is_some());
}

// ── Login ────────────────────────────────────────────────────────────────────

fn login(accounts: MockAccountRepo) -> LoginUseCase<MockAccountRepo, MockHasher> {
    LoginUseCase {
        accounts,
        hasher: MockHasher,
        jwt_secret: JWT_SECRET.to_owned(),
    }
}

fn credentials(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_owned(),
        password: password.to_owned(),
    }
}

#[tokio::test]
async fn should_issue_token_naming_email_for_approved_account() {
    let accounts = MockAccountRepo::new(vec![member("alice@example.com", Level::Mestre)]);

    let out = login(accounts)
        .execute(credentials("alice@example.com", "password"))
        .await
        .unwrap();

    let info = validate_access_token(&out.access_token, JWT_SECRET).unwrap();
    assert_eq!(info.email, "alice@example.com");
    assert_eq!(info.access_token_exp, out.access_token_exp);
    assert_eq!(out.account.level, Level::Mestre);
}

#[tokio::test]
async fn should_not_distinguish_unknown_email_from_wrong_password() {
    let accounts = MockAccountRepo::new(vec![member("alice@example.com", Level::Aprendiz)]);

    let unknown = login(accounts.clone())
        .execute(credentials("bob@example.com", "password"))
        .await
        .unwrap_err();
    let wrong = login(accounts)
        .execute(credentials("alice@example.com", "nope"))
        .await
        .unwrap_err();

    assert!(matches!(unknown, AccessServiceError::InvalidCredentials));
    assert!(matches!(wrong, AccessServiceError::InvalidCredentials));
}

#[tokio::test]
async fn should_refuse_login_until_approved() {
    let accounts = MockAccountRepo::new(vec![
        account("pending@example.com", Level::Aprendiz, AccountStatus::Pending),
        account("rejected@example.com", Level::Aprendiz, AccountStatus::Rejected),
    ]);

    let pending = login(accounts.clone())
        .execute(credentials("pending@example.com", "password"))
        .await
        .unwrap_err();
    let rejected = login(accounts)
        .execute(credentials("rejected@example.com", "password"))
        .await
        .unwrap_err();

    assert!(matches!(pending, AccessServiceError::AccountPending));
    assert!(matches!(rejected, AccessServiceError::AccountRejected));
}

#[tokio::test]
async fn should_check_password_before_status() {
    let accounts = MockAccountRepo::new(vec![account(
        "pending@example.com",
        Level::Aprendiz,
        AccountStatus::Pending,
    )]);

    let err = login(accounts)
        .execute(credentials("pending@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(err, AccessServiceError::InvalidCredentials));
}

#[tokio::test]
async fn should_refuse_login_for_unverifiable_stored_hash() {
    let mut legacy = member("legacy@example.com", Level::Aprendiz);
    legacy.password_hash = "$2b$12$R9h/cIPz0gi.URNNX3kh2OPST9/PgBkqquzi.Ss7KIUgO2t0jWMUW".to_owned();
    let accounts = MockAccountRepo::new(vec![legacy]);

    let err = login(accounts)
        .execute(credentials("legacy@example.com", "password"))
        .await
        .unwrap_err();

    assert!(matches!(err, AccessServiceError::InvalidCredentials));
}

// ── Authenticate ─────────────────────────────────────────────────────────────

fn authenticate(accounts: MockAccountRepo) -> AuthenticateUseCase<MockAccountRepo> {
    AuthenticateUseCase {
        accounts,
        jwt_secret: JWT_SECRET.to_owned(),
    }
}

#[tokio::test]
async fn should_resolve_current_account_from_token() {
    let alice = member("alice@example.com", Level::Companheiro);
    let accounts = MockAccountRepo::new(vec![alice.clone()]);
    let bearer = MockBearer::new("alice@example.com", JWT_SECRET);

    let resolved = authenticate(accounts).execute(&bearer.token()).await.unwrap();

    assert_eq!(resolved.id, alice.id);
}

#[tokio::test]
async fn should_reject_expired_or_foreign_tokens() {
    let accounts = MockAccountRepo::new(vec![member("alice@example.com", Level::Aprendiz)]);
    let expired = MockBearer::new("alice@example.com", JWT_SECRET).expired_token();
    let foreign = MockBearer::new("alice@example.com", "other-secret").token();
    let (past, _) = issue_token_with_exp("alice@example.com", JWT_SECRET, 1).unwrap();

    for token in [expired, foreign, past, "garbage".to_owned()] {
        let err = authenticate(accounts.clone())
            .execute(&token)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessServiceError::InvalidToken));
    }
}

#[tokio::test]
async fn should_reject_token_of_deleted_or_demoted_account() {
    let accounts = MockAccountRepo::new(vec![account(
        "bob@example.com",
        Level::Aprendiz,
        AccountStatus::Rejected,
    )]);
    let gone = MockBearer::new("ghost@example.com", JWT_SECRET).token();
    let rejected = MockBearer::new("bob@example.com", JWT_SECRET).token();

    for token in [gone, rejected] {
        let err = authenticate(accounts.clone())
            .execute(&token)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessServiceError::InvalidToken));
    }
}

// ── UpdateSelf ───────────────────────────────────────────────────────────────

fn update_self(accounts: MockAccountRepo) -> UpdateSelfUseCase<MockAccountRepo, MockHasher> {
    UpdateSelfUseCase {
        accounts,
        hasher: MockHasher,
    }
}

#[tokio::test]
async fn should_update_name_only() {
    let alice = member("alice@example.com", Level::Aprendiz);
    let accounts = MockAccountRepo::new(vec![alice.clone()]);

    update_self(accounts.clone())
        .execute(UpdateSelfInput {
            actor: alice.clone(),
            full_name: Some("Alice Renamed".to_owned()),
            current_password: None,
            new_password: None,
        })
        .await
        .unwrap();

    let stored = accounts.get(alice.id).unwrap();
    assert_eq!(stored.full_name, "Alice Renamed");
    assert_eq!(stored.password_hash, alice.password_hash);
}

#[tokio::test]
async fn should_change_password_with_correct_current_password() {
    let alice = member("alice@example.com", Level::Aprendiz);
    let accounts = MockAccountRepo::new(vec![alice.clone()]);

    update_self(accounts.clone())
        .execute(UpdateSelfInput {
            actor: alice.clone(),
            full_name: None,
            current_password: Some("password".to_owned()),
            new_password: Some("fresh".to_owned()),
        })
        .await
        .unwrap();

    assert_eq!(accounts.get(alice.id).unwrap().password_hash, "hashed:fresh");
}

#[tokio::test]
async fn should_reject_wrong_current_password_without_changes() {
    let alice = member("alice@example.com", Level::Aprendiz);
    let accounts = MockAccountRepo::new(vec![alice.clone()]);

    let err = update_self(accounts.clone())
        .execute(UpdateSelfInput {
            actor: alice.clone(),
            full_name: Some("Renamed".to_owned()),
            current_password: Some("wrong".to_owned()),
            new_password: Some("fresh".to_owned()),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AccessServiceError::IncorrectPassword));
    let stored = accounts.get(alice.id).unwrap();
    assert_eq!(stored.full_name, alice.full_name);
    assert_eq!(stored.password_hash, alice.password_hash);
}

#[tokio::test]
async fn should_require_some_field() {
    let alice = member("alice@example.com", Level::Aprendiz);
    let accounts = MockAccountRepo::new(vec![alice.clone()]);

    for (full_name, current, new) in [
        (None, None, None),
        (Some(String::new()), None, None),
        (None, Some("password".to_owned()), None),
        (None, None, Some("fresh".to_owned())),
    ] {
        let err = update_self(accounts.clone())
            .execute(UpdateSelfInput {
                actor: alice.clone(),
                full_name,
                current_password: current,
                new_password: new,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccessServiceError::MissingData));
    }
}
