use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, info};

use crate::{
    error::{AppError, Result},
    slack::{
        payloads::{SlackBlockActions, SlackShortcut, SlackViewSubmission},
        InteractionCallback, ModalTemplate, SlackModal, ViewTarget, CLICK_ME_VALUE,
    },
    ServerState,
};

pub async fn dispatch(state: &ServerState, callback: InteractionCallback) -> Result<Response> {
    match callback {
        InteractionCallback::Shortcut(shortcut) => handle_shortcut(state, shortcut).await,
        InteractionCallback::BlockActions(actions) => handle_block_actions(state, actions).await,
        InteractionCallback::ViewSubmission(submission) => Ok(handle_view_submission(submission)),
        InteractionCallback::Unknown => {
            debug!("ignoring unsupported interaction type");
            Ok(StatusCode::OK.into_response())
        }
    }
}

async fn handle_shortcut(state: &ServerState, shortcut: SlackShortcut) -> Result<Response> {
    info!(callback_id = %shortcut.callback_id, user = %shortcut.user.id, "shortcut");

    let modal = SlackModal::new(ModalTemplate::ClickMe);
    state
        .slack
        .open_view(&shortcut.trigger_id, &modal.view()?)
        .await?;

    Ok(StatusCode::OK.into_response())
}

async fn handle_block_actions(state: &ServerState, payload: SlackBlockActions) -> Result<Response> {
    for action in &payload.actions {
        info!(action_id = %action.action_id, kind = %action.r#type, value = %action.value, "block action");
    }

    if payload.actions.iter().any(|action| action.value == CLICK_ME_VALUE) {
        let target = update_target(&payload);
        let modal = SlackModal::new(ModalTemplate::ClickMeUpdate);
        state.slack.update_view(&target, &modal.view()?).await?;
    }

    Ok((StatusCode::OK, format!("<@{}> Hello World!!", payload.user.id)).into_response())
}

fn handle_view_submission(submission: SlackViewSubmission) -> Response {
    info!(view_id = %submission.view.id, callback_id = %submission.view.callback_id, "view submission");

    (StatusCode::OK, Json(json!({"response_action": "clear"}))).into_response()
}

fn update_target(payload: &SlackBlockActions) -> ViewTarget {
    let view_id = if payload.container.view_id.is_empty() {
        payload.view.id.clone()
    } else {
        payload.container.view_id.clone()
    };

    ViewTarget {
        external_id: payload.view.external_id.clone(),
        hash: payload.view.hash.clone(),
        view_id,
    }
}

pub fn parse_error(err: serde_json::Error) -> AppError {
    AppError::BadRequest(format!("Could not parse action response JSON: {err}"))
}
