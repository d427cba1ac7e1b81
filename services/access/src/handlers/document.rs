use std::collections::BTreeMap;

use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use lodge_domain::pagination::PageRequest;

use crate::domain::types::{Account, Disposition};
use crate::error::AccessServiceError;
use crate::handlers::extract::{CurrentAccount, parse_id, parse_level};
use crate::handlers::response::{DocumentResponse, MessageResponse};
use crate::state::AppState;
use crate::usecase::document::{
    DeleteDocumentInput, DeleteDocumentUseCase, FetchDocumentInput, FetchDocumentUseCase,
    ListAccessibleUseCase, ListByLevelUseCase, ListMembersWithDocumentsUseCase,
    UploadDocumentInput, UploadDocumentUseCase,
};

// ── POST /upload-work/{level} ────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct UploadParams {
    pub title: Option<String>,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub file_id: Uuid,
}

/// Multipart body: a `file` part and an optional `title` part. The title may
/// also come from `?title=`; the form part wins when both are present.
pub async fn upload_work(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(level): Path<String>,
    Query(params): Query<UploadParams>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AccessServiceError> {
    let level = parse_level(&level)?;

    let mut title = params.title;
    let mut file: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AccessServiceError::InvalidUpload)?
    {
        let name = field.name().unwrap_or("").to_owned();
        match name.as_str() {
            "title" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| AccessServiceError::InvalidUpload)?;
                title = Some(text);
            }
            "file" => {
                let filename = field.file_name().unwrap_or("").to_owned();
                let data = field
                    .bytes()
                    .await
                    .map_err(|_| AccessServiceError::InvalidUpload)?;
                file = Some((filename, data));
            }
            _ => {}
        }
    }
    let (filename, bytes) = file.ok_or(AccessServiceError::InvalidUpload)?;

    let usecase = UploadDocumentUseCase {
        documents: state.document_repo(),
        storage: state.storage.clone(),
    };
    let document = usecase
        .execute(UploadDocumentInput {
            actor,
            level,
            title,
            filename,
            bytes,
        })
        .await?;
    Ok(Json(UploadResponse {
        message: "File uploaded successfully",
        file_id: document.id,
    }))
}

// ── Listing ──────────────────────────────────────────────────────────────────

pub async fn works_by_level(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(level): Path<String>,
) -> Result<Json<Vec<DocumentResponse>>, AccessServiceError> {
    let level = parse_level(&level)?;
    let usecase = ListByLevelUseCase {
        documents: state.document_repo(),
    };
    let documents = usecase.execute(&actor, level).await?;
    Ok(Json(documents.iter().map(DocumentResponse::from).collect()))
}

/// Visible documents keyed by level name.
pub async fn accessible_works(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
) -> Result<Json<BTreeMap<&'static str, Vec<DocumentResponse>>>, AccessServiceError> {
    let usecase = ListAccessibleUseCase {
        documents: state.document_repo(),
    };
    let grouped = usecase.execute(&actor).await?;
    Ok(Json(
        grouped
            .into_iter()
            .map(|(level, docs)| (level.name(), docs.iter().map(DocumentResponse::from).collect()))
            .collect(),
    ))
}

#[derive(Serialize)]
pub struct MemberWithWorks {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub level: u8,
    pub level_name: &'static str,
    pub works_count: usize,
    pub works: Vec<DocumentResponse>,
}

#[derive(Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_users: u64,
    pub limit: u32,
}

#[derive(Serialize)]
pub struct MembersWithWorksResponse {
    pub users: Vec<MemberWithWorks>,
    pub pagination: Pagination,
}

pub async fn users_with_works(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Query(page): Query<PageRequest>,
) -> Result<Json<MembersWithWorksResponse>, AccessServiceError> {
    let usecase = ListMembersWithDocumentsUseCase {
        accounts: state.account_repo(),
        documents: state.document_repo(),
    };
    let result = usecase.execute(&actor, page).await?;
    let users = result
        .members
        .into_iter()
        .map(|m| MemberWithWorks {
            id: m.account.id,
            level: m.account.level.as_u8(),
            level_name: m.account.level.name(),
            works_count: m.documents.len(),
            works: m.documents.iter().map(DocumentResponse::from).collect(),
            full_name: m.account.full_name,
            email: m.account.email,
        })
        .collect();
    Ok(Json(MembersWithWorksResponse {
        users,
        pagination: Pagination {
            current_page: result.page.page,
            total_pages: result.total_pages,
            total_users: result.total,
            limit: result.page.limit,
        },
    }))
}

// ── Streaming ────────────────────────────────────────────────────────────────

async fn stream_work(
    state: AppState,
    actor: Account,
    document_id: Uuid,
    disposition: Disposition,
) -> Result<impl IntoResponse, AccessServiceError> {
    let usecase = FetchDocumentUseCase {
        documents: state.document_repo(),
        storage: state.storage.clone(),
    };
    let fetched = usecase
        .execute(FetchDocumentInput {
            actor,
            document_id,
            disposition,
        })
        .await?;

    let content_disposition = format!(
        "{}; filename=\"{}\"",
        fetched.disposition.as_str(),
        fetched.filename
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_owned()),
            (header::CONTENT_DISPOSITION, content_disposition),
        ],
        Body::from_stream(ReaderStream::new(fetched.reader)),
    ))
}

pub async fn view_work_file(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AccessServiceError> {
    let document_id = parse_id(&id, AccessServiceError::DocumentNotFound)?;
    stream_work(state, actor, document_id, Disposition::Inline).await
}

pub async fn download_work_file(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AccessServiceError> {
    let document_id = parse_id(&id, AccessServiceError::DocumentNotFound)?;
    stream_work(state, actor, document_id, Disposition::Attachment).await
}

// ── DELETE /delete-work/{id} ─────────────────────────────────────────────────

pub async fn delete_work(
    State(state): State<AppState>,
    CurrentAccount(actor): CurrentAccount,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AccessServiceError> {
    let document_id = parse_id(&id, AccessServiceError::DocumentNotFound)?;
    let usecase = DeleteDocumentUseCase {
        documents: state.document_repo(),
        storage: state.storage.clone(),
    };
    usecase
        .execute(DeleteDocumentInput { actor, document_id })
        .await?;
    Ok(Json(MessageResponse::new("Work deleted successfully")))
}
