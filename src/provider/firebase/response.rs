use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Any Firebase Auth REST response: either the expected payload or an error envelope.
///
/// The error variant must come first. Some success payloads consist of optional fields only and
/// would otherwise also match an error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum FirebaseResponse<T> {
    Error(ErrorEnvelope),
    Success(T),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorResponse,
}

/// Error body returned by the Identity Toolkit and Secure Token APIs.
///
/// `message` carries the error code, optionally followed by `" : "` and a description,
/// e.g. `"WEAK_PASSWORD : Password should be at least 6 characters"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code.
    pub code: u16,
    pub message: String,
}

/// Error codes we know how to explain to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KnownFirebaseErrorCode {
    EmailExists,
    EmailNotFound,
    InvalidPassword,
    InvalidLoginCredentials,
    UserDisabled,
    TooManyAttemptsTryLater,
    WeakPassword,
    InvalidEmail,
    MissingEmail,
    OperationNotAllowed,
    TokenExpired,
    InvalidRefreshToken,
    InvalidIdToken,
    UserNotFound,
    CredentialTooOldLoginAgain,
    InvalidIdpResponse,
}

impl KnownFirebaseErrorCode {
    pub fn user_message(self) -> &'static str {
        match self {
            Self::EmailExists => "An account with this email already exists.",
            Self::EmailNotFound | Self::InvalidPassword | Self::InvalidLoginCredentials => {
                "Invalid email or password."
            }
            Self::UserDisabled => "This account has been disabled.",
            Self::TooManyAttemptsTryLater => "Too many attempts. Please try again later.",
            Self::WeakPassword => "Password should be at least 6 characters.",
            Self::InvalidEmail | Self::MissingEmail => "The email address is invalid.",
            Self::OperationNotAllowed => "This sign-in method is not enabled.",
            Self::TokenExpired
            | Self::InvalidRefreshToken
            | Self::InvalidIdToken
            | Self::UserNotFound
            | Self::CredentialTooOldLoginAgain => "Your session has expired. Please sign in again.",
            Self::InvalidIdpResponse => "Google sign-in failed. Please try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FirebaseErrorCode {
    Known(KnownFirebaseErrorCode),
    Unknown(String),
}

impl ErrorResponse {
    /// The machine-readable part of `message`.
    pub fn raw_code(&self) -> &str {
        self.message
            .split_once(" : ")
            .map_or(self.message.as_str(), |(code, _)| code)
            .trim()
    }

    /// The human-readable part of `message`, if the provider sent one.
    pub fn description(&self) -> Option<&str> {
        self.message
            .split_once(" : ")
            .map(|(_, description)| description.trim())
            .filter(|it| !it.is_empty())
    }

    pub fn code(&self) -> FirebaseErrorCode {
        let raw = self.raw_code();
        serde_json::from_value::<KnownFirebaseErrorCode>(serde_json::Value::String(raw.to_owned()))
            .map_or_else(
                |_| FirebaseErrorCode::Unknown(raw.to_owned()),
                FirebaseErrorCode::Known,
            )
    }

    pub fn user_message(&self) -> String {
        match self.code() {
            FirebaseErrorCode::Known(known) => known.user_message().to_owned(),
            FirebaseErrorCode::Unknown(code) => match self.description() {
                Some(description) => description.to_owned(),
                None => format!("Authentication failed ({code})."),
            },
        }
    }
}

impl From<ErrorResponse> for AuthError {
    fn from(error_response: ErrorResponse) -> Self {
        AuthError::Rejected {
            code: error_response.raw_code().to_owned(),
            message: error_response.user_message(),
        }
    }
}

/// Returned by `accounts:signUp`, `accounts:signInWithPassword` and `accounts:signInWithIdp`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInResponse {
    pub local_id: String,
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds, as a string.
    pub expires_in: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProfileResponse {
    pub local_id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct LookupResponse {
    #[serde(default)]
    pub users: Vec<AccountInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccountInfo {
    pub local_id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    /// Milliseconds since the unix epoch, as a string.
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateAuthUriResponse {
    pub auth_uri: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct SendOobCodeResponse {
    pub email: Option<String>,
}

/// Returned by the Secure Token `token` endpoint. Unlike the Identity Toolkit, it uses snake case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct RefreshTokenResponse {
    pub id_token: String,
    pub refresh_token: String,
    /// Seconds, as a string.
    pub expires_in: String,
    pub user_id: Option<String>,
}
