//! The playground page.

use {
    askama::Template,
    axum::{extract::State, response::Html},
    tracing::warn,
};

use crate::server::AppState;

#[derive(Template)]
#[template(path = "playground.html", escape = "html")]
struct PlaygroundTemplate<'a> {
    source: &'a str,
    version: &'a str,
}

/// `GET /` — editor, preview frame, and console log in one page.
pub async fn playground_page(State(state): State<AppState>) -> Html<String> {
    let source = state.playground.source();
    let template = PlaygroundTemplate {
        source: &source,
        version: env!("CARGO_PKG_VERSION"),
    };
    let html = match template.render() {
        Ok(html) => html,
        Err(e) => {
            warn!(error = %e, "failed to render playground page");
            String::new()
        },
    };
    Html(html)
}
