use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{Html, Response};

use crate::state::AppState;

/// Count every request that passes through.
pub async fn count_hits(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.increment();
    next.run(request).await
}

/// Admin page showing the hit count.
pub async fn metrics_handler(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n\n<body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n</body>\n\n</html>\n",
        state.hits.get()
    ))
}

/// Zero the hit count.
pub async fn reset_handler(State(state): State<AppState>) -> &'static str {
    state.hits.reset();
    "Hits reset to 0"
}
