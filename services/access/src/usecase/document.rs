use std::collections::{BTreeMap, HashMap};

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use lodge_domain::level::Level;
use lodge_domain::pagination::PageRequest;

use crate::domain::policy::{
    effective_level, require_admin_or_master, require_level, visible_levels,
};
use crate::domain::repository::{AccountRepository, BlobStorage, DocumentRepository};
use crate::domain::types::{Account, DOCUMENT_SUFFIX, Disposition, Document, FALLBACK_FILENAME};
use crate::error::AccessServiceError;

fn parse_level(raw: i64) -> Result<Level, AccessServiceError> {
    Level::from_i64(raw).map_err(|_| AccessServiceError::InvalidLevel)
}

fn has_document_suffix(filename: &str) -> bool {
    filename.len() > DOCUMENT_SUFFIX.len()
        && filename
            .get(filename.len() - DOCUMENT_SUFFIX.len()..)
            .is_some_and(|s| s.eq_ignore_ascii_case(DOCUMENT_SUFFIX))
}

/// Make an uploaded filename safe for a `Content-Disposition` header.
///
/// Drops non-ASCII, control characters, quotes and backslashes; falls back to
/// [`FALLBACK_FILENAME`] when nothing is left.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control() && *c != '"' && *c != '\\')
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_owned()
    } else {
        cleaned.to_owned()
    }
}

// ── Upload ───────────────────────────────────────────────────────────────────

pub struct UploadDocumentInput {
    pub actor: Account,
    pub level: i64,
    pub title: Option<String>,
    pub filename: String,
    pub bytes: Bytes,
}

pub struct UploadDocumentUseCase<D, S>
where
    D: DocumentRepository,
    S: BlobStorage,
{
    pub documents: D,
    pub storage: S,
}

impl<D, S> UploadDocumentUseCase<D, S>
where
    D: DocumentRepository,
    S: BlobStorage,
{
    pub async fn execute(&self, input: UploadDocumentInput) -> Result<Document, AccessServiceError> {
        let level = parse_level(input.level)?;
        require_level(&input.actor, level)?;
        if !has_document_suffix(&input.filename) {
            return Err(AccessServiceError::InvalidDocumentFormat);
        }
        let title = input
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(AccessServiceError::InvalidUpload)?;

        let size = input.bytes.len();
        let storage_ref = self
            .storage
            .write(&DOCUMENT_SUFFIX[1..], input.bytes)
            .await?;

        let document = Document {
            id: Uuid::now_v7(),
            title,
            filename: input.filename,
            storage_ref,
            level,
            uploaded_by: input.actor.id,
            uploaded_by_name: input.actor.full_name.clone(),
            uploaded_at: Utc::now(),
        };
        if let Err(e) = self.documents.create(&document).await {
            if let Err(cleanup) = self.storage.delete(&document.storage_ref).await {
                warn!(error = ?cleanup, storage_ref = %document.storage_ref, "orphaned blob after failed insert");
            }
            return Err(e);
        }
        info!(
            document_id = %document.id,
            level = level.as_u8(),
            bytes = size,
            uploaded_by = %input.actor.id,
            "document uploaded"
        );
        Ok(document)
    }
}

// ── ListByLevel ──────────────────────────────────────────────────────────────

pub struct ListByLevelUseCase<D: DocumentRepository> {
    pub documents: D,
}

impl<D: DocumentRepository> ListByLevelUseCase<D> {
    /// Documents classified at exactly `level`.
    pub async fn execute(
        &self,
        actor: &Account,
        level: i64,
    ) -> Result<Vec<Document>, AccessServiceError> {
        let level = parse_level(level)?;
        require_level(actor, level)?;
        self.documents.list_by_levels(&[level]).await
    }
}

// ── ListAccessible ───────────────────────────────────────────────────────────

pub struct ListAccessibleUseCase<D: DocumentRepository> {
    pub documents: D,
}

impl<D: DocumentRepository> ListAccessibleUseCase<D> {
    /// Every visible document grouped by level. Levels without documents are absent.
    pub async fn execute(
        &self,
        actor: &Account,
    ) -> Result<BTreeMap<Level, Vec<Document>>, AccessServiceError> {
        let levels = visible_levels(actor);
        let documents = self.documents.list_by_levels(&levels).await?;
        let mut grouped: BTreeMap<Level, Vec<Document>> = BTreeMap::new();
        for document in documents {
            grouped.entry(document.level).or_default().push(document);
        }
        Ok(grouped)
    }
}

// ── ListMembersWithDocuments ─────────────────────────────────────────────────

pub struct MemberDocuments {
    pub account: Account,
    pub documents: Vec<Document>,
}

pub struct MembersPage {
    pub members: Vec<MemberDocuments>,
    pub page: PageRequest,
    pub total: u64,
    pub total_pages: u64,
}

pub struct ListMembersWithDocumentsUseCase<R, D>
where
    R: AccountRepository,
    D: DocumentRepository,
{
    pub accounts: R,
    pub documents: D,
}

impl<R, D> ListMembersWithDocumentsUseCase<R, D>
where
    R: AccountRepository,
    D: DocumentRepository,
{
    /// Approved members at or below the actor's level, each with their uploads.
    pub async fn execute(
        &self,
        actor: &Account,
        page: PageRequest,
    ) -> Result<MembersPage, AccessServiceError> {
        let page = page.clamped();
        let max_level = effective_level(actor);

        let total = self.accounts.count_approved_up_to(max_level).await?;
        let accounts = self.accounts.list_approved_up_to(max_level, page).await?;

        let ids: Vec<Uuid> = accounts.iter().map(|a| a.id).collect();
        let mut by_uploader: HashMap<Uuid, Vec<Document>> = HashMap::new();
        if !ids.is_empty() {
            for document in self.documents.list_by_uploaders(&ids).await? {
                by_uploader
                    .entry(document.uploaded_by)
                    .or_default()
                    .push(document);
            }
        }

        let members = accounts
            .into_iter()
            .map(|account| MemberDocuments {
                documents: by_uploader.remove(&account.id).unwrap_or_default(),
                account,
            })
            .collect();

        Ok(MembersPage {
            members,
            page,
            total,
            total_pages: page.total_pages(total),
        })
    }
}

// ── Fetch ────────────────────────────────────────────────────────────────────

pub struct FetchDocumentInput {
    pub actor: Account,
    pub document_id: Uuid,
    pub disposition: Disposition,
}

pub struct FetchedDocument<R> {
    pub reader: R,
    /// Header-safe filename.
    pub filename: String,
    pub disposition: Disposition,
}

pub struct FetchDocumentUseCase<D, S>
where
    D: DocumentRepository,
    S: BlobStorage,
{
    pub documents: D,
    pub storage: S,
}

impl<D, S> FetchDocumentUseCase<D, S>
where
    D: DocumentRepository,
    S: BlobStorage,
{
    pub async fn execute(
        &self,
        input: FetchDocumentInput,
    ) -> Result<FetchedDocument<S::Reader>, AccessServiceError> {
        let document = self
            .documents
            .find_by_id(input.document_id)
            .await?
            .ok_or(AccessServiceError::DocumentNotFound)?;
        require_level(&input.actor, document.level)?;

        let reader = self
            .storage
            .open(&document.storage_ref)
            .await?
            .ok_or(AccessServiceError::FileNotFound)?;

        Ok(FetchedDocument {
            reader,
            filename: sanitize_filename(&document.filename),
            disposition: input.disposition,
        })
    }
}

// ── Delete ───────────────────────────────────────────────────────────────────

pub struct DeleteDocumentInput {
    pub actor: Account,
    pub document_id: Uuid,
}

pub struct DeleteDocumentUseCase<D, S>
where
    D: DocumentRepository,
    S: BlobStorage,
{
    pub documents: D,
    pub storage: S,
}

impl<D, S> DeleteDocumentUseCase<D, S>
where
    D: DocumentRepository,
    S: BlobStorage,
{
    /// Metadata removal is authoritative; a blob that fails to delete is only logged.
    pub async fn execute(&self, input: DeleteDocumentInput) -> Result<(), AccessServiceError> {
        require_admin_or_master(&input.actor)?;
        let document = self
            .documents
            .find_by_id(input.document_id)
            .await?
            .ok_or(AccessServiceError::DocumentNotFound)?;

        if let Err(e) = self.storage.delete(&document.storage_ref).await {
            warn!(error = ?e, document_id = %document.id, storage_ref = %document.storage_ref, "blob not deleted");
        }
        if !self.documents.delete(document.id).await? {
            return Err(AccessServiceError::DocumentNotFound);
        }
        info!(document_id = %document.id, deleted_by = %input.actor.email, "document deleted");
        Ok(())
    }
}
