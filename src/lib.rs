pub mod api;
pub mod config;
pub mod services;
pub mod utils;
pub mod views;

use crate::api::middleware::request_id::{REQUEST_ID_HEADER, request_id_middleware};
use crate::config::AppConfig;
use crate::services::upload_service::UploadService;
use crate::views::Views;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_file,
        api::handlers::upload::preview_upload,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            api::handlers::upload::UploadRequest,
            api::handlers::upload::PreviewResponse,
            api::handlers::health::HealthResponse,
            services::preview::SheetPreview,
        )
    ),
    tags(
        (name = "preview", description = "Spreadsheet upload and preview"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub uploads: Arc<UploadService>,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        Ok(Self {
            uploads: Arc::new(UploadService::new(config.clone())),
            views: Arc::new(Views::new()?),
            config,
        })
    }

    /// `accept` attribute for the file input, e.g. ".xls,.xlsx"
    pub fn accept_attribute(&self) -> String {
        self.config
            .allowed_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(",")
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_file_size;

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(api::handlers::home::home))
        .route("/upload", post(api::handlers::upload::upload_file))
        .route("/api/preview", post(api::handlers::upload::preview_upload))
        .route("/health", get(api::handlers::health::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get(&REQUEST_ID_HEADER)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("unknown");
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id,
                    )
                })
                .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                    info!("📥 {} {}", request.method(), request.uri());
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        info!(
                            "📤 Finished in {:?} with status {}",
                            latency,
                            response.status()
                        );
                    },
                ),
        )
        // Outermost, so the trace span already sees the request id
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
