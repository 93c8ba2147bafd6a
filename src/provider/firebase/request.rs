use reqwest::IntoUrl;
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::{ResultExt, Snafu};

use super::response::{ErrorResponse, FirebaseResponse};
use crate::error::AuthError;

#[derive(Debug, Snafu)]
pub enum RequestError {
    #[snafu(display("RequestError: Could not send request"))]
    Send { source: reqwest::Error },

    #[snafu(display("RequestError: Could not decode payload"))]
    Decode { source: reqwest::Error },

    #[snafu(display("RequestError: Received an error response"))]
    ErrResponse { error_response: ErrorResponse },
}

impl From<RequestError> for AuthError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Send { source } => AuthError::Unreachable {
                details: source.to_string(),
            },
            RequestError::Decode { source } => AuthError::UnexpectedResponse {
                details: source.to_string(),
            },
            RequestError::ErrResponse { error_response } => error_response.into(),
        }
    }
}

/// POST `body` as JSON, as expected by the Identity Toolkit API.
pub(crate) async fn post_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    endpoint: impl IntoUrl,
    body: &impl Serialize,
) -> Result<T, RequestError> {
    let response = client
        .post(endpoint)
        .json(body)
        .send()
        .await
        .context(SendSnafu {})?
        .json::<FirebaseResponse<T>>()
        .await
        .context(DecodeSnafu {})?;
    unpack(response)
}

/// POST `params` url-encoded, as expected by the Secure Token API.
pub(crate) async fn post_form<T: DeserializeOwned>(
    client: &reqwest::Client,
    endpoint: impl IntoUrl,
    params: &[(&str, &str)],
) -> Result<T, RequestError> {
    let response = client
        .post(endpoint)
        .form(params)
        .send()
        .await
        .context(SendSnafu {})?
        .json::<FirebaseResponse<T>>()
        .await
        .context(DecodeSnafu {})?;
    unpack(response)
}

fn unpack<T>(response: FirebaseResponse<T>) -> Result<T, RequestError> {
    match response {
        FirebaseResponse::Success(success) => Ok(success),
        FirebaseResponse::Error(envelope) => Err(ErrResponseSnafu {
            error_response: envelope.error,
        }
        .build()),
    }
}
