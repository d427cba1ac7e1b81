use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use lodge_core::health::healthz;
use lodge_core::middleware::{cors_layer, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    account::{get_me, login, register, update_me},
    admin::{
        all_users, all_users_with_passwords, approve_user, change_user_level, delete_user,
        pending_users, reject_user, reset_user_password,
    },
    document::{
        accessible_works, delete_work, download_work_file, upload_work, users_with_works,
        view_work_file, works_by_level,
    },
    health::readyz,
    reset::{forgot_password, reset_password, verify_reset_token},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Credentials
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(get_me).put(update_me))
        // Password reset
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/verify-reset-token/{email}/{token}", get(verify_reset_token))
        // Approval and account administration
        .route("/admin/pending-users", get(pending_users))
        .route("/admin/approve-user/{id}", post(approve_user))
        .route("/admin/reject-user/{id}", post(reject_user))
        .route("/admin/all-users", get(all_users))
        .route("/admin/change-user-level/{id}", put(change_user_level))
        .route("/admin/delete-user/{id}", delete(delete_user))
        .route(
            "/super-admin/all-users-with-passwords",
            get(all_users_with_passwords),
        )
        .route(
            "/super-admin/reset-user-password/{id}",
            put(reset_user_password),
        )
        // Documents
        .route("/upload-work/{level}", post(upload_work).layer(upload_limit))
        .route("/works", get(accessible_works))
        .route("/works/{level}", get(works_by_level))
        .route("/users-with-works", get(users_with_works))
        .route("/work-file/{id}", get(view_work_file))
        .route("/download-work/{id}", get(download_work_file))
        .route("/delete-work/{id}", delete(delete_work))
        .layer(cors)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
