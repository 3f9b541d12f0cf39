//! Server-rendered pages.
//!
//! Rendering lives behind [`PageRenderer`]; the handlers here only pick the
//! template and turn failures into a bare 500.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, response::Html};

use crate::error::{GateError, GateResult};

/// Template used by the status page.
pub const STATUS_TEMPLATE: &str = "status.html";

/// Renders a named page to HTML.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, name: &str) -> GateResult<String>;
}

/// Serves templates straight from a directory.
#[derive(Debug, Clone)]
pub struct TemplateDir {
    root: PathBuf,
}

impl TemplateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PageRenderer for TemplateDir {
    async fn render(&self, name: &str) -> GateResult<String> {
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return Err(GateError::BadRequest(format!("Invalid template name: {}", name)));
        }

        let path = self.root.join(name);
        tokio::fs::read_to_string(&path).await.map_err(|e| {
            GateError::Internal(format!("Failed to read template {}: {}", path.display(), e))
        })
    }
}

/// Shared renderer handed to page handlers.
pub type SharedRenderer = Arc<dyn PageRenderer>;

/// Render the status page.
///
/// GET /status
pub async fn status(State(renderer): State<SharedRenderer>) -> GateResult<Html<String>> {
    let html = renderer
        .render(STATUS_TEMPLATE)
        .await
        .map_err(|e| GateError::Internal(e.to_string()))?;

    Ok(Html(html))
}
