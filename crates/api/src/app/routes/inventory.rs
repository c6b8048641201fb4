//! Read-only catalog endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::app::dto::NodeDto;
use crate::app::errors::json_error;
use crate::app::services::AppServices;

pub async fn tree(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.read(|m| NodeDto::from_category(m.root())) {
        Ok(tree) => Json(tree).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn types(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.read(|m| m.registry().names()) {
        Ok(names) => Json(names).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn logs(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.read(|m| m.activity().lines()) {
        Ok(lines) => Json(lines).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn report(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.read(|m| m.generate_report()) {
        Ok(report) => Json(report).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn history(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.read(|m| m.export_history()) {
        Ok(export) => Json(export).into_response(),
        Err(e) => e.into_response(),
    }
}

/// History rendered as a downloadable text file, newest first.
pub async fn history_export(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let export = match services.read(|m| m.export_history()) {
        Ok(export) => export,
        Err(e) => return e.into_response(),
    };

    let mut body = Vec::new();
    if let Err(e) = export.write_to(&mut body) {
        tracing::error!(error = %e, "failed to render history export");
        return json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "export_failed",
            "failed to render history export",
        );
    }

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"history.txt\"",
            ),
        ],
        body,
    )
        .into_response()
}
