//! HTTP surface: welcome page, upload form and the draft endpoint.
//!
//! | Method | Path      | Response                               |
//! |--------|-----------|----------------------------------------|
//! | GET    | `/`       | welcome fragment, 200                  |
//! | GET    | `/upload` | upload form, 200                       |
//! | POST   | `/upload` | draft fragment 200, or error 500       |
//!
//! Every failure of the POST handler is funnelled through the
//! [`IntoResponse`] impl of [`DraftError`], which logs it and answers 500
//! with the error's text. Nothing is retried.

use crate::config::ServerConfig;
use crate::draft::{DraftPipeline, UploadPair, DISTRICT_FIELD, GRANT_FIELD};
use crate::error::DraftError;
use crate::pipeline::render::{draft_html, error_html, upload_form_html, welcome_html};
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use bytes::Bytes;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{debug, error, info, Level};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<DraftPipeline>,
}

impl AppState {
    pub fn new(pipeline: DraftPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

impl IntoResponse for DraftError {
    fn into_response(self) -> Response {
        error!(kind = ?self.kind(), "❌ Error: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(error_html(&self.to_string())),
        )
            .into_response()
    }
}

/// Build the application router.
///
/// Uploads are read fully into memory with no size cap, so the default
/// body limit is disabled.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", get(upload_form).post(upload_submit))
        .layer(DefaultBodyLimit::disable())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Bind `config` and serve until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, state: AppState, shutdown: F) -> Result<(), DraftError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind_addr = config.bind_address();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|source| DraftError::ServerFailed {
            addr: bind_addr.clone(),
            source,
        })?;
    info!(
        "Rotunda listening on http://{}, upload form at http://localhost:{}/upload",
        bind_addr, config.port
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|source| DraftError::ServerFailed {
            addr: bind_addr,
            source,
        })?;

    info!("Server stopped");
    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(welcome_html())
}

async fn upload_form() -> Html<&'static str> {
    Html(upload_form_html())
}

async fn upload_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, DraftError> {
    info!("📥 Files uploaded!");

    let multipart = multipart.map_err(|e| DraftError::MalformedUpload {
        reason: e.body_text(),
    })?;
    let upload = read_upload(multipart).await?;
    let output = state.pipeline.generate_draft(upload).await?;

    Ok(Html(draft_html(&output.draft)?))
}

/// Collect the two document fields; other fields are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<UploadPair, DraftError> {
    let mut district_doc: Option<Bytes> = None;
    let mut grant_doc: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DraftError::MalformedUpload {
            reason: e.body_text(),
        })?
    {
        let field_name = field.name().unwrap_or("").to_string();
        let file_name = field.file_name().map(|s| s.to_string());

        let slot = match field_name.as_str() {
            DISTRICT_FIELD => &mut district_doc,
            GRANT_FIELD => &mut grant_doc,
            _ => {
                debug!("Ignoring upload field '{}'", field_name);
                continue;
            }
        };

        let data = field.bytes().await.map_err(|e| DraftError::MalformedUpload {
            reason: e.body_text(),
        })?;
        debug!(
            field = %field_name,
            file_name = ?file_name,
            size = data.len(),
            "Received upload field"
        );
        *slot = Some(data);
    }

    UploadPair::from_parts(district_doc, grant_doc)
}
