use axum::{
    extract::State,
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, Span};

use crate::{
    error::Result,
    slack::{SlackInteraction, SlackModal, SlashCommand},
    ServerState,
};

mod extract;
mod interactive;

use extract::SignedForm;

pub fn get_router() -> Router<ServerState> {
    Router::new()
        .route("/", get(healthz).post(healthz))
        .route("/healthz", get(healthz).post(healthz))
        .route("/slash", post(slash))
        .route("/interactive", post(interactive))
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    message: &'static str,
    hostname: String,
    timestamp: String,
}

async fn healthz(State(state): State<ServerState>) -> Json<Health> {
    Json(Health {
        status: "OK",
        message: "i'm healthy",
        hostname: state.config.hostname.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[tracing::instrument(skip_all, fields(command = %payload.command, user = %payload.user_id))]
async fn slash(
    State(state): State<ServerState>,
    SignedForm(payload): SignedForm<SlashCommand>,
) -> Result<StatusCode> {
    info!("slash command");

    let modal = SlackModal::greeting(&payload.user_name);
    state
        .slack
        .open_view(&payload.trigger_id, &modal.view()?)
        .await?;

    Ok(StatusCode::OK)
}

#[tracing::instrument(skip_all, fields(callback_id, user))]
async fn interactive(
    State(state): State<ServerState>,
    SignedForm(interaction): SignedForm<SlackInteraction>,
) -> Result<Response> {
    let callback = interaction.callback().map_err(interactive::parse_error)?;

    let span = Span::current();
    if let Some(user) = callback.user_id() {
        span.record("user", user);
    }
    if let Some(callback_id) = callback.callback_id() {
        span.record("callback_id", callback_id);
    }

    interactive::dispatch(&state, callback).await
}
