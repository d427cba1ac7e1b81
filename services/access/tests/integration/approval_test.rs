use uuid::Uuid;

use lodge_access::error::AccessServiceError;
use lodge_access::usecase::account::{LoginInput, LoginUseCase};
use lodge_access::usecase::approval::{
    ApproveAccountUseCase, DecisionInput, ListPendingUseCase, RejectAccountUseCase,
};
use lodge_domain::account::{AccountStatus, OverrideRole};
use lodge_domain::level::Level;

use crate::helpers::{JWT_SECRET, MockAccountRepo, MockHasher, account, member, with_role};

#[tokio::test]
async fn should_list_only_pending_accounts_for_admins() {
    let admin = with_role(member("admin@example.com", Level::Aprendiz), OverrideRole::Admin);
    let pending = account("new@example.com", Level::Companheiro, AccountStatus::Pending);
    let accounts = MockAccountRepo::new(vec![
        admin.clone(),
        pending.clone(),
        account("old@example.com", Level::Aprendiz, AccountStatus::Rejected),
    ]);

    let listed = ListPendingUseCase { accounts }.execute(&admin).await.unwrap();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, pending.id);
}

#[tokio::test]
async fn should_not_let_master_without_role_list_pending() {
    let master = member("master@example.com", Level::Mestre);
    let accounts = MockAccountRepo::new(vec![master.clone()]);

    let err = ListPendingUseCase { accounts }
        .execute(&master)
        .await
        .unwrap_err();

    assert!(matches!(err, AccessServiceError::AdminRequired));
}

#[tokio::test]
async fn should_approve_and_unlock_login() {
    let admin = with_role(member("admin@example.com", Level::Aprendiz), OverrideRole::Admin);
    let pending = account("new@example.com", Level::Companheiro, AccountStatus::Pending);
    let accounts = MockAccountRepo::new(vec![admin.clone(), pending.clone()]);

    ApproveAccountUseCase {
        accounts: accounts.clone(),
    }
    .execute(DecisionInput {
        actor: admin.clone(),
        account_id: pending.id,
    })
    .await
    .unwrap();

    let stored = accounts.get(pending.id).unwrap();
    assert_eq!(stored.status, AccountStatus::Approved);
    assert_eq!(stored.approved_by.as_deref(), Some("admin@example.com"));
    assert!(stored.approved_at.is_some());

    let login = LoginUseCase {
        accounts,
        hasher: MockHasher,
        jwt_secret: JWT_SECRET.to_owned(),
    };
    login
        .execute(LoginInput {
            email: "new@example.com".to_owned(),
            password: "password".to_owned(),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn should_allow_approving_twice() {
    let admin = with_role(member("admin@example.com", Level::Aprendiz), OverrideRole::Admin);
    let pending = account("new@example.com", Level::Aprendiz, AccountStatus::Pending);
    let accounts = MockAccountRepo::new(vec![admin.clone(), pending.clone()]);
    let usecase = ApproveAccountUseCase {
        accounts: accounts.clone(),
    };

    for _ in 0..2 {
        usecase
            .execute(DecisionInput {
                actor: admin.clone(),
                account_id: pending.id,
            })
            .await
            .unwrap();
    }
    assert_eq!(accounts.get(pending.id).unwrap().status, AccountStatus::Approved);
}

#[tokio::test]
async fn should_reject_and_block_login() {
    let admin = with_role(
        member("root@example.com", Level::Mestre),
        OverrideRole::SuperAdmin,
    );
    let pending = account("new@example.com", Level::Aprendiz, AccountStatus::Pending);
    let accounts = MockAccountRepo::new(vec![admin.clone(), pending.clone()]);

    RejectAccountUseCase {
        accounts: accounts.clone(),
    }
    .execute(DecisionInput {
        actor: admin,
        account_id: pending.id,
    })
    .await
    .unwrap();

    let login = LoginUseCase {
        accounts,
        hasher: MockHasher,
        jwt_secret: JWT_SECRET.to_owned(),
    };
    let err = login
        .execute(LoginInput {
            email: "new@example.com".to_owned(),
            password: "password".to_owned(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AccessServiceError::AccountRejected));
}

#[tokio::test]
async fn should_report_unknown_id_as_not_found() {
    let admin = with_role(member("admin@example.com", Level::Aprendiz), OverrideRole::Admin);
    let accounts = MockAccountRepo::new(vec![admin.clone()]);

    let approve = ApproveAccountUseCase {
        accounts: accounts.clone(),
    }
    .execute(DecisionInput {
        actor: admin.clone(),
        account_id: Uuid::now_v7(),
    })
    .await
    .unwrap_err();
    let reject = RejectAccountUseCase { accounts }
        .execute(DecisionInput {
            actor: admin,
            account_id: Uuid::now_v7(),
        })
        .await
        .unwrap_err();

    assert!(matches!(approve, AccessServiceError::AccountNotFound));
    assert!(matches!(reject, AccessServiceError::AccountNotFound));
}

#[tokio::test]
async fn should_check_role_before_existence() {
    let plain = member("plain@example.com", Level::Mestre);
    let accounts = MockAccountRepo::new(vec![plain.clone()]);

    let err = ApproveAccountUseCase { accounts }
        .execute(DecisionInput {
            actor: plain,
            account_id: Uuid::now_v7(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AccessServiceError::AdminRequired));
}
