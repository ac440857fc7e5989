//! Request handlers.

use std::convert::Infallible;
use std::sync::OnceLock;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use edgechat_llm::error::ProviderError;
use edgechat_llm::{ChatBody, RouterError, TruncateError};
use edgechat_plugins::{PluginReply, PluginStream};
use futures_util::StreamExt;
use tracing::{debug, error};

use crate::state::AppState;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Routes mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    START_TIME.get_or_init(Instant::now);
    Router::new()
        .route("/chat/completions", post(chat_completions))
        .route("/health", get(health_check))
}

async fn health_check() -> Json<serde_json::Value> {
    let start = START_TIME.get_or_init(Instant::now);
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": start.elapsed().as_secs()
    }))
}

/// `POST /api/chat/completions`.
///
/// A last message that is a plugin command is answered by the plugin
/// dispatcher; everything else goes to the completion router.
async fn chat_completions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ChatBody>,
) -> Response {
    if let Some(last) = body.messages.last()
        && let Some(reply) = state.plugins.handle(&last.content)
    {
        return plugin_response(reply);
    }

    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match state.completions.complete(&body, auth).await {
        Ok(stream) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            Body::from_stream(stream),
        )
            .into_response(),
        Err(e) => router_error_response(e),
    }
}

fn plugin_response(reply: PluginReply) -> Response {
    match reply {
        PluginReply::Notice(text) => text.into_response(),
        PluginReply::Stream(stream) => event_stream(stream),
    }
}

fn event_stream(stream: PluginStream) -> Response {
    let chunks = stream.map(|frame| Ok::<_, Infallible>(frame.into_chunk()));
    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(chunks),
    )
        .into_response()
}

fn router_error_response(err: RouterError) -> Response {
    match err {
        RouterError::UnsupportedModel(ref model) => {
            debug!(model = %model, "unsupported model requested");
            (StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
        RouterError::Budget(TruncateError::NoMessages) => {
            (StatusCode::BAD_REQUEST, TruncateError::NoMessages.to_string()).into_response()
        }
        RouterError::Budget(e) => e.to_string().into_response(),
        RouterError::StatusDenied(text) => text.into_response(),
        RouterError::Provider(e) => {
            error!(error = %e, "completion failed");
            (StatusCode::INTERNAL_SERVER_ERROR, provider_failure_text(&e)).into_response()
        }
    }
}

/// Failures of the model service read "OpenAI Error"; failures on the
/// edge read "Internal Server Error".
fn provider_failure_text(err: &ProviderError) -> &'static str {
    if err.is_upstream() {
        "OpenAI Error"
    } else {
        "Internal Server Error"
    }
}
