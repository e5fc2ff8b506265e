//! Static tester page for trying `/speak` from a browser

use axum::response::Html;

const AGENT_PAGE: &str = include_str!("../../../../../public/agent.html");

/// `GET /` and `GET /public/agent.html`
pub async fn agent_page() -> Html<&'static str> {
    Html(AGENT_PAGE)
}
