//! Document listing, upload and grounding context handlers.

use crate::auth::CurrentUser;
use crate::constants::UPLOAD_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::DocumentState;
use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use regdoc_core::models::{Document, DocumentStats, UploadFile, UploadOutcome, UploadReceipt};
use regdoc_core::AppError;
use regdoc_services::{document_stats, filter_documents};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Region filter, honoured for super administrators only. `ALL` or absent lists everything.
    pub region: Option<String>,
    /// Case-insensitive search over document name and region
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FailedRegion {
    pub region: String,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<Document>,
    /// Regions whose listing failed; their documents are missing from `documents`
    pub failed_regions: Vec<FailedRegion>,
    pub stats: DocumentStats,
    pub complete: bool,
}

#[utoipa::path(
    get,
    path = "/api/v0/documents",
    tag = "documents",
    params(ListQuery),
    responses(
        (status = 200, description = "Documents visible to the caller", body = DocumentListResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_documents(
    State(docs): State<DocumentState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ListQuery>,
) -> Json<DocumentListResponse> {
    let listing = docs.lister.list_documents(&user).await;

    let documents = filter_documents(
        &listing.documents(),
        &user,
        query.region.as_deref(),
        query.q.as_deref(),
    );
    let stats = document_stats(&documents);
    let failed_regions = listing
        .failed_regions()
        .into_iter()
        .map(|(region, error)| FailedRegion {
            region: region.to_string(),
            error: error.to_string(),
        })
        .collect();

    Json(DocumentListResponse {
        documents,
        failed_regions,
        stats,
        complete: listing.is_complete(),
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<UploadReceipt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    fn stored(receipt: UploadReceipt) -> Self {
        Self {
            success: true,
            document: Some(receipt),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            document: None,
            error: Some(error),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v0/documents",
    tag = "documents",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Document stored in the caller's region", body = UploadResponse),
        (status = 400, description = "Rejected before storage", body = UploadResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 502, description = "Storage write failed", body = UploadResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_document(
    State(docs): State<DocumentState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), HttpAppError> {
    let region = user.upload_region().map(String::from).ok_or_else(|| {
        HttpAppError(AppError::BadRequest(
            "Your account has no home region to upload into".to_string(),
        ))
    })?;

    let file = read_upload_field(&mut multipart).await?;

    if let Err(error) = docs.uploader.validate(&file, &region) {
        return Ok((StatusCode::BAD_REQUEST, Json(UploadResponse::failed(error))));
    }

    match docs.uploader.upload(file, &region).await {
        UploadOutcome::Stored(receipt) => {
            Ok((StatusCode::CREATED, Json(UploadResponse::stored(receipt))))
        }
        UploadOutcome::Failed { error } => {
            Ok((StatusCode::BAD_GATEWAY, Json(UploadResponse::failed(error))))
        }
    }
}

async fn read_upload_field(multipart: &mut Multipart) -> Result<UploadFile, HttpAppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().map(String::from).ok_or_else(|| {
            HttpAppError(AppError::BadRequest(format!(
                "Multipart field '{}' has no filename",
                UPLOAD_FIELD
            )))
        })?;
        let content_type = field.content_type().map(String::from).unwrap_or_default();
        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadFile::new(filename, content_type, data.to_vec()));
    }

    Err(HttpAppError(AppError::BadRequest(format!(
        "Missing multipart field '{}'",
        UPLOAD_FIELD
    ))))
}

fn multipart_error(err: MultipartError) -> HttpAppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HttpAppError(AppError::PayloadTooLarge(err.body_text()))
    } else {
        HttpAppError(AppError::BadRequest(format!(
            "Invalid multipart body: {}",
            err.body_text()
        )))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ContextQuery {
    /// Full storage key, e.g. `NCR/1718000000000-budget.pdf`
    pub key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentContextResponse {
    pub document: Document,
    /// `content` or `placeholder`
    pub grounding_mode: String,
    pub text: String,
}

#[utoipa::path(
    get,
    path = "/api/v0/documents/context",
    tag = "documents",
    params(ContextQuery),
    responses(
        (status = 200, description = "Grounding text for the document", body = DocumentContextResponse),
        (status = 400, description = "Malformed key", body = ErrorResponse),
        (status = 403, description = "Document is outside the caller's regions", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_document_context(
    State(docs): State<DocumentState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ContextQuery>,
) -> Result<Json<DocumentContextResponse>, HttpAppError> {
    let document = docs.lister.find_document(&user, &query.key).await?;
    let text = docs.context_loader.load(&document).await;

    Ok(Json(DocumentContextResponse {
        document,
        grounding_mode: docs.context_loader.mode().as_str().to_string(),
        text,
    }))
}
