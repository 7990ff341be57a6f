use axum::response::Html;

use crate::templates::home_page;

/// Handler for the route index page (GET /)
pub async fn index_handler() -> Html<String> {
    Html(home_page().into_string())
}
