use crate::AppState;
use crate::api::error::{AppError, JsonError};
use crate::config::AppConfig;
use crate::services::preview::SheetPreview;
use crate::utils::validation::{ValidatedFilename, validate_filename};
use crate::views::IndexPage;
use axum::{
    Json,
    extract::{Multipart, State},
    response::Html,
};
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;

/// Multipart field carrying the spreadsheet
pub const FILE_FIELD: &str = "excel_file";

/// Multipart fields accepted for the free-text question
pub const QUESTION_FIELDS: &[&str] = &["Question", "user_question"];

/// Request body of the upload routes, for the OpenAPI document only
#[derive(ToSchema)]
pub struct UploadRequest {
    /// Spreadsheet file (.xls or .xlsx)
    #[schema(value_type = String, format = Binary)]
    pub excel_file: Vec<u8>,
    /// Optional question; the field may also be named `Question`
    pub user_question: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct PreviewResponse {
    pub filename: String,
    pub question: Option<String>,
    pub sheet_name: String,
    pub sheet_names: Vec<String>,
    pub num_rows: usize,
    pub num_cols: usize,
    pub columns: Vec<String>,
    /// Leading data rows, header excluded
    pub preview: Vec<Vec<String>>,
}

struct UploadedFile {
    filename: ValidatedFilename,
    contents: Bytes,
}

struct UploadForm {
    file: Option<UploadedFile>,
    question: Option<String>,
}

/// Result of one accepted upload
struct UploadOutcome {
    filename: String,
    question: Option<String>,
    preview: SheetPreview,
}

/// Reads the whole form. The file field is validated as soon as its headers
/// arrive, so a rejected file is never buffered.
async fn read_upload_form(
    mut multipart: Multipart,
    config: &AppConfig,
) -> Result<UploadForm, AppError> {
    let mut file = None;
    let mut question: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_FIELD {
            // Only the first file part counts; later ones are skipped unread
            if file.is_some() {
                tracing::debug!("Ignoring extra '{}' part", FILE_FIELD);
                continue;
            }

            // A part without a filename is not a file upload
            let Some(original_filename) = field.file_name().map(str::to_string) else {
                continue;
            };

            let filename = validate_filename(&original_filename, config)?;
            let contents = field.bytes().await?;
            file = Some(UploadedFile { filename, contents });
        } else if QUESTION_FIELDS.contains(&name.as_str()) {
            let text = field.text().await?;
            if question.as_deref().is_none_or(str::is_empty) {
                question = Some(text);
            }
        }
    }

    Ok(UploadForm {
        file,
        question: question.filter(|q| !q.is_empty()),
    })
}

async fn process_upload(state: &AppState, multipart: Multipart) -> Result<UploadOutcome, AppError> {
    let form = read_upload_form(multipart, &state.config).await?;
    let file = form.file.ok_or(AppError::MissingFile)?;

    tracing::info!(
        filename = %file.filename.name,
        bytes = file.contents.len(),
        has_question = form.question.is_some(),
        "Spreadsheet upload accepted"
    );

    let preview = state.uploads.preview(&file.filename, file.contents).await?;

    tracing::info!(
        sheet = %preview.sheet_name,
        rows = preview.num_rows,
        cols = preview.num_cols,
        "Spreadsheet preview ready"
    );

    Ok(UploadOutcome {
        filename: file.filename.name,
        question: form.question,
        preview,
    })
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Preview page", content_type = "text/html", body = String),
        (status = 400, description = "Missing file or file type not allowed", body = String),
        (status = 413, description = "Upload exceeds the size limit"),
        (status = 500, description = "Spreadsheet could not be read", body = String)
    ),
    tag = "preview"
)]
pub async fn upload_file(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let outcome = process_upload(&state, multipart).await?;

    let page = IndexPage {
        accept: state.accept_attribute(),
        filename: Some(outcome.filename),
        question: outcome.question,
        preview: Some(outcome.preview),
    };

    Ok(Html(state.views.render_index(&page)?))
}

#[utoipa::path(
    post,
    path = "/api/preview",
    request_body(content = UploadRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Summary of the first worksheet", body = PreviewResponse),
        (status = 400, description = "Missing file or file type not allowed"),
        (status = 413, description = "Upload exceeds the size limit"),
        (status = 500, description = "Spreadsheet could not be read")
    ),
    tag = "preview"
)]
pub async fn preview_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<PreviewResponse>, JsonError> {
    let outcome = process_upload(&state, multipart).await?;
    let preview = outcome.preview;

    Ok(Json(PreviewResponse {
        filename: outcome.filename,
        question: outcome.question,
        sheet_name: preview.sheet_name,
        sheet_names: preview.sheet_names,
        num_rows: preview.num_rows,
        num_cols: preview.num_cols,
        columns: preview.columns,
        preview: preview.rows,
    }))
}
