use crate::api::error::AppError;
use crate::services::preview::SheetPreview;
use handlebars::{Handlebars, TemplateError};
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index";

/// Context for the landing page. Without a preview only the form is shown.
#[derive(Debug, Default, Serialize)]
pub struct IndexPage {
    /// Value of the file input's `accept` attribute, e.g. ".xls,.xlsx"
    pub accept: String,
    pub filename: Option<String>,
    pub question: Option<String>,
    pub preview: Option<SheetPreview>,
}

/// Compiled page templates
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(INDEX_TEMPLATE, include_str!("templates/index.hbs"))?;
        Ok(Self { registry })
    }

    pub fn render_index(&self, page: &IndexPage) -> Result<String, AppError> {
        self.registry
            .render(INDEX_TEMPLATE, page)
            .map_err(|e| AppError::Internal(format!("Failed to render page: {}", e)))
    }
}
