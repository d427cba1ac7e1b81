use axum::http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE};
use axum::response::{IntoResponse, Response};

/// Access service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AccessServiceError {
    #[error("account not found")]
    AccountNotFound,
    #[error("document not found")]
    DocumentNotFound,
    #[error("file not found in storage")]
    FileNotFound,
    #[error("email already registered")]
    EmailAlreadyRegistered,
    #[error("invalid level")]
    InvalidLevel,
    #[error("only PDF files are allowed")]
    InvalidDocumentFormat,
    #[error("invalid upload")]
    InvalidUpload,
    #[error("invalid request body")]
    InvalidRequest,
    #[error("no fields to update")]
    MissingData,
    #[error("current password is incorrect")]
    IncorrectPassword,
    #[error("invalid or expired reset token")]
    InvalidResetToken,
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("could not validate credentials")]
    InvalidToken,
    #[error("account pending approval")]
    AccountPending,
    #[error("account access denied")]
    AccountRejected,
    #[error("insufficient level")]
    InsufficientLevel,
    #[error("admin privileges required")]
    AdminRequired,
    #[error("super admin privileges required")]
    SuperAdminRequired,
    #[error("admin or master privileges required")]
    AdminOrMasterRequired,
    #[error("super admin or master privileges required")]
    SuperAdminOrMasterRequired,
    #[error("cannot change own level")]
    SelfLevelChange,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AccessServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::EmailAlreadyRegistered => "EMAIL_ALREADY_REGISTERED",
            Self::InvalidLevel => "INVALID_LEVEL",
            Self::InvalidDocumentFormat => "INVALID_DOCUMENT_FORMAT",
            Self::InvalidUpload => "INVALID_UPLOAD",
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::MissingData => "MISSING_DATA",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::InvalidResetToken => "INVALID_RESET_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::AccountPending => "ACCOUNT_PENDING",
            Self::AccountRejected => "ACCOUNT_REJECTED",
            Self::InsufficientLevel => "INSUFFICIENT_LEVEL",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::SuperAdminRequired => "SUPER_ADMIN_REQUIRED",
            Self::AdminOrMasterRequired => "ADMIN_OR_MASTER_REQUIRED",
            Self::SuperAdminOrMasterRequired => "SUPER_ADMIN_OR_MASTER_REQUIRED",
            Self::SelfLevelChange => "SELF_LEVEL_CHANGE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::AccountNotFound | Self::DocumentNotFound | Self::FileNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::EmailAlreadyRegistered
            | Self::InvalidLevel
            | Self::InvalidDocumentFormat
            | Self::InvalidUpload
            | Self::InvalidRequest
            | Self::MissingData
            | Self::IncorrectPassword
            | Self::InvalidResetToken => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::AccountPending
            | Self::AccountRejected
            | Self::InsufficientLevel
            | Self::AdminRequired
            | Self::SuperAdminRequired
            | Self::AdminOrMasterRequired
            | Self::SuperAdminOrMasterRequired
            | Self::SelfLevelChange => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AccessServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are left to the TraceLayer; only the anyhow chain of a 500 is worth a log line.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        let mut response = (status, axum::Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
