use axum::{
    async_trait,
    body::{Body, Bytes},
    extract::{FromRequest, Request},
    Form,
};
use serde::de::DeserializeOwned;

use crate::{error::AppError, slack::verify::SlackVerifier, ServerState};

/// Form body that only decodes once its Slack signature has been checked.
///
/// The body is buffered a single time; the verifier hashes those bytes and
/// the same bytes are replayed into [`Form`] for decoding.
#[derive(Debug, Clone)]
pub struct SignedForm<T>(pub T);

#[async_trait]
impl<T> FromRequest<ServerState> for SignedForm<T>
where
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &ServerState) -> Result<Self, Self::Rejection> {
        let method = req.method().clone();
        let headers = req.headers().clone();
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;

        SlackVerifier::new(&state.config.signing_secret, state.config.tolerance_secs).verify(
            &headers,
            &body,
            chrono::Utc::now().timestamp(),
        )?;

        let mut replay = Request::new(Body::from(body));
        *replay.method_mut() = method;
        *replay.headers_mut() = headers;

        let Form(value) = Form::<T>::from_request(replay, state)
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;

        Ok(Self(value))
    }
}
