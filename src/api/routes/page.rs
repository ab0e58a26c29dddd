//! Page Route
//!
//! - GET / - Dashboard page shell

use axum::response::Html;

use crate::page::render_shell;

/// GET /
///
/// Serve the static dashboard shell. All data arrives afterwards, over the
/// push channel and the chart endpoint.
pub async fn index() -> Html<String> {
    Html(render_shell())
}
