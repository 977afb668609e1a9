//! # Receipt Endpoints
//!
//! ## Creation Flow
//! ```text
//! POST /api/receipts
//!      │
//!      ▼
//! receipts().create(input)     validate, number, insert (one transaction)
//!      │                       ── Rejected ──► 400, nothing written
//!      ▼
//! render_document(receipt)     settings ──► PDF ──► document_path recorded
//!      │                       ── RenderError ──► 500, receipt stays stored
//!      ▼
//! 201 { message, receipt, document_url }
//! ```

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use receipt_core::validation::parse_filter;
use receipt_core::{NewReceipt, Receipt};
use receipt_render::document_file_name;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::dto::{
    document_url, CreatedResponse, ExportDocument, ListParams, MessageResponse, ReceiptView,
    SummaryView,
};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

async fn load(state: &AppState, id: &str) -> ApiResult<Receipt> {
    state
        .db()
        .receipts()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Receipt", id))
}

async fn file_exists(path: Option<&str>) -> bool {
    match path {
        Some(path) => tokio::fs::try_exists(path).await.unwrap_or(false),
        None => false,
    }
}

/// `POST /api/receipts`
pub async fn create_receipt(
    State(state): State<AppState>,
    payload: Result<Json<NewReceipt>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let Json(input) = payload?;

    let mut receipt = state.db().receipts().create(&input).await?;
    state.render_document(&mut receipt).await?;

    info!(
        receipt_number = %receipt.receipt_number,
        total_cents = receipt.total_cents,
        "Receipt issued"
    );

    let response = CreatedResponse {
        message: "Receipt generated successfully".to_string(),
        document_url: document_url(&receipt.id),
        receipt: ReceiptView::from(receipt),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /api/receipts?search=&date_from=&date_to=`
pub async fn list_receipts(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<SummaryView>>> {
    let filter = parse_filter(
        params.search.as_deref(),
        params.date_from.as_deref(),
        params.date_to.as_deref(),
    )?;

    let summaries = state.db().receipts().list(&filter).await?;

    let mut views = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let exists = file_exists(summary.document_path.as_deref()).await;
        views.push(SummaryView::new(summary, exists));
    }

    Ok(Json(views))
}

/// `GET /api/receipts/:id`
pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReceiptView>> {
    let receipt = load(&state, &id).await?;
    Ok(Json(ReceiptView::from(receipt)))
}

/// `DELETE /api/receipts/:id`
///
/// The document file goes too. Its number is never reissued.
pub async fn delete_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let receipt = state.db().receipts().delete(&id).await?;

    if let Some(path) = receipt.document_path.as_deref() {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path, error = %e, "Could not remove receipt document"),
        }
    }

    Ok(Json(MessageResponse::new("Receipt deleted")))
}

/// `POST /api/receipts/:id/regenerate`: re-renders with the current settings.
pub async fn regenerate_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let mut receipt = load(&state, &id).await?;
    state.render_document(&mut receipt).await?;

    Ok(Json(
        MessageResponse::new("Document regenerated").with_document(&receipt.id),
    ))
}

/// `GET /api/receipts/:id/document`
///
/// Serves the recorded file, rendering it again first if it has gone missing.
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let mut receipt = load(&state, &id).await?;

    let path: PathBuf = match receipt.document_path.clone() {
        Some(path) if file_exists(Some(path.as_str())).await => path.into(),
        _ => state.render_document(&mut receipt).await?,
    };

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "Could not read receipt document");
        ApiError::internal("Could not read the receipt document")
    })?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        document_file_name(&receipt.receipt_number)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

/// `GET /api/receipts/:id/export`
pub async fn export_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ExportDocument>> {
    let receipt = load(&state, &id).await?;
    Ok(Json(ExportDocument::from(receipt)))
}
