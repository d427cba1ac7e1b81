#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use lodge_access::domain::repository::{
    AccountRepository, BlobStorage, DocumentRepository, Notifier, PasswordHasher,
    ResetTokenRepository,
};
use lodge_access::domain::types::{Account, Document, Notification, ResetToken};
use lodge_access::error::AccessServiceError;
use lodge_domain::account::{AccountStatus, OverrideRole};
use lodge_domain::level::Level;
use lodge_domain::pagination::PageRequest;

pub const JWT_SECRET: &str = "integration-test-secret";

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn account(email: &str, level: Level, status: AccountStatus) -> Account {
    Account {
        id: Uuid::now_v7(),
        email: email.to_owned(),
        full_name: email.split('@').next().unwrap_or(email).to_owned(),
        password_hash: MockHasher.hash("password").unwrap(),
        level,
        status,
        role: None,
        created_at: Utc::now(),
        approved_at: None,
        approved_by: None,
    }
}

pub fn member(email: &str, level: Level) -> Account {
    account(email, level, AccountStatus::Approved)
}

pub fn with_role(mut account: Account, role: OverrideRole) -> Account {
    account.role = Some(role);
    account
}

pub fn document(title: &str, level: Level, uploader: &Account) -> Document {
    Document {
        id: Uuid::now_v7(),
        title: title.to_owned(),
        filename: format!("{title}.pdf"),
        storage_ref: format!("{}.pdf", Uuid::new_v4()),
        level,
        uploaded_by: uploader.id,
        uploaded_by_name: uploader.full_name.clone(),
        uploaded_at: Utc::now(),
    }
}

// ── MockAccountRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockAccountRepo {
    pub accounts: Arc<Mutex<Vec<Account>>>,
}

impl MockAccountRepo {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == id)
            .cloned()
    }

    pub fn get_by_email(&self, email: &str) -> Option<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned()
    }

    fn modify(&self, id: Uuid, f: impl FnOnce(&mut Account)) -> bool {
        let mut accounts = self.accounts.lock().unwrap();
        match accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                f(account);
                true
            }
            None => false,
        }
    }

    fn approved_up_to(&self, max_level: Level) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.status == AccountStatus::Approved && a.level <= max_level)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| (a.created_at, a.id));
        accounts
    }
}

impl AccountRepository for MockAccountRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccessServiceError> {
        Ok(self.get_by_email(email))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, AccessServiceError> {
        Ok(self.get(id))
    }

    async fn create(&self, account: &Account) -> Result<(), AccessServiceError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(AccessServiceError::EmailAlreadyRegistered);
        }
        accounts.push(account.clone());
        Ok(())
    }

    async fn list_by_status(
        &self,
        status: AccountStatus,
    ) -> Result<Vec<Account>, AccessServiceError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.status == status)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Account>, AccessServiceError> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn approve(
        &self,
        id: Uuid,
        approved_by: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<bool, AccessServiceError> {
        Ok(self.modify(id, |a| {
            a.status = AccountStatus::Approved;
            a.approved_by = Some(approved_by.to_owned());
            a.approved_at = Some(approved_at);
        }))
    }

    async fn reject(&self, id: Uuid) -> Result<bool, AccessServiceError> {
        Ok(self.modify(id, |a| a.status = AccountStatus::Rejected))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        password_hash: Option<&str>,
    ) -> Result<bool, AccessServiceError> {
        Ok(self.modify(id, |a| {
            if let Some(name) = full_name {
                a.full_name = name.to_owned();
            }
            if let Some(hash) = password_hash {
                a.password_hash = hash.to_owned();
            }
        }))
    }

    async fn set_level(&self, id: Uuid, level: Level) -> Result<bool, AccessServiceError> {
        Ok(self.modify(id, |a| a.level = level))
    }

    async fn grant_role(&self, id: Uuid, role: OverrideRole) -> Result<bool, AccessServiceError> {
        Ok(self.modify(id, |a| a.role = Some(role)))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccessServiceError> {
        let mut accounts = self.accounts.lock().unwrap();
        let before = accounts.len();
        accounts.retain(|a| a.id != id);
        Ok(accounts.len() < before)
    }

    async fn count_approved_up_to(&self, max_level: Level) -> Result<u64, AccessServiceError> {
        Ok(self.approved_up_to(max_level).len() as u64)
    }

    async fn list_approved_up_to(
        &self,
        max_level: Level,
        page: PageRequest,
    ) -> Result<Vec<Account>, AccessServiceError> {
        Ok(self
            .approved_up_to(max_level)
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }
}

// ── MockResetTokenRepo ───────────────────────────────────────────────────────

/// Token ledger whose `consume` also writes the hash into the paired account mock.
#[derive(Clone)]
pub struct MockResetTokenRepo {
    pub tokens: Arc<Mutex<Vec<ResetToken>>>,
    pub accounts: MockAccountRepo,
}

impl MockResetTokenRepo {
    pub fn new(accounts: MockAccountRepo) -> Self {
        Self {
            tokens: Arc::new(Mutex::new(vec![])),
            accounts,
        }
    }

    pub fn insert(&self, token: ResetToken) {
        self.tokens.lock().unwrap().push(token);
    }

    pub fn all(&self) -> Vec<ResetToken> {
        self.tokens.lock().unwrap().clone()
    }
}

impl ResetTokenRepository for MockResetTokenRepo {
    async fn create(&self, token: &ResetToken) -> Result<(), AccessServiceError> {
        self.insert(token.clone());
        Ok(())
    }

    async fn find_valid(
        &self,
        email: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<ResetToken>, AccessServiceError> {
        Ok(self
            .tokens
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.email == email && t.token == token && t.is_valid_at(now))
            .cloned())
    }

    async fn consume(
        &self,
        email: &str,
        token: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AccessServiceError> {
        // Holding the ledger lock across both writes makes the pair atomic.
        let mut tokens = self.tokens.lock().unwrap();
        let Some(entry) = tokens
            .iter_mut()
            .find(|t| t.email == email && t.token == token && t.is_valid_at(now))
        else {
            return Ok(false);
        };
        let Some(account) = self.accounts.get_by_email(email) else {
            return Ok(false);
        };
        entry.used = true;
        self.accounts.modify(account.id, |a| {
            a.password_hash = password_hash.to_owned();
        });
        Ok(true)
    }
}

// ── MockDocumentRepo ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockDocumentRepo {
    pub documents: Arc<Mutex<Vec<Document>>>,
    pub fail_create: bool,
}

impl MockDocumentRepo {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(Mutex::new(documents)),
            fail_create: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }
}

impl DocumentRepository for MockDocumentRepo {
    async fn create(&self, document: &Document) -> Result<(), AccessServiceError> {
        if self.fail_create {
            return Err(anyhow::anyhow!("insert failed").into());
        }
        self.documents.lock().unwrap().push(document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AccessServiceError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn list_by_levels(
        &self,
        levels: &[Level],
    ) -> Result<Vec<Document>, AccessServiceError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| levels.contains(&d.level))
            .cloned()
            .collect())
    }

    async fn list_by_uploaders(
        &self,
        uploaders: &[Uuid],
    ) -> Result<Vec<Document>, AccessServiceError> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|d| uploaders.contains(&d.uploaded_by))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AccessServiceError> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.id != id);
        Ok(documents.len() < before)
    }
}

// ── MockBlobStorage ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockBlobStorage {
    pub blobs: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MockBlobStorage {
    pub fn put(&self, reference: &str, bytes: &'static [u8]) {
        self.blobs
            .lock()
            .unwrap()
            .insert(reference.to_owned(), Bytes::from_static(bytes));
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().unwrap().len()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(reference)
    }
}

impl BlobStorage for MockBlobStorage {
    type Reader = Cursor<Bytes>;

    async fn write(&self, extension: &str, bytes: Bytes) -> Result<String, AccessServiceError> {
        let reference = format!("{}.{extension}", Uuid::new_v4());
        self.blobs.lock().unwrap().insert(reference.clone(), bytes);
        Ok(reference)
    }

    async fn open(&self, reference: &str) -> Result<Option<Self::Reader>, AccessServiceError> {
        Ok(self
            .blobs
            .lock()
            .unwrap()
            .get(reference)
            .cloned()
            .map(Cursor::new))
    }

    async fn delete(&self, reference: &str) -> Result<(), AccessServiceError> {
        self.blobs.lock().unwrap().remove(reference);
        Ok(())
    }
}

// ── MockNotifier ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockNotifier {
    pub sent: Arc<Mutex<Vec<Notification>>>,
    pub fail: bool,
}

impl MockNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), AccessServiceError> {
        if self.fail {
            return Err(anyhow::anyhow!("smtp unavailable").into());
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

// ── MockHasher ───────────────────────────────────────────────────────────────

/// Reversible stand-in so tests stay fast; errors on a foreign hash format.
#[derive(Clone, Copy, Default)]
pub struct MockHasher;

impl PasswordHasher for MockHasher {
    fn hash(&self, password: &str) -> Result<String, AccessServiceError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AccessServiceError> {
        match hash.strip_prefix("hashed:") {
            Some(stored) => Ok(stored == password),
            None => Err(anyhow::anyhow!("unrecognised hash format").into()),
        }
    }
}
