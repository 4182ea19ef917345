use crate::AppState;
use crate::api::error::AppError;
use crate::views::IndexPage;
use axum::{extract::State, response::Html};

/// Landing page with the upload form
pub async fn home(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let page = IndexPage {
        accept: state.accept_attribute(),
        ..Default::default()
    };

    Ok(Html(state.views.render_index(&page)?))
}
