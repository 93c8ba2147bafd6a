use snafu::Snafu;

/// Provider codes stating that the credentials of a session can never be used again.
/// Other rejections, e.g. rate limits or provider outages, leave the session intact.
pub const SESSION_ENDING_CODES: [&str; 6] = [
    "TOKEN_EXPIRED",
    "INVALID_REFRESH_TOKEN",
    "INVALID_ID_TOKEN",
    "USER_NOT_FOUND",
    "USER_DISABLED",
    "CREDENTIAL_TOO_OLD_LOGIN_AGAIN",
];

/// Failure reported by the identity provider or by the transport used to reach it.
///
/// Errors are `Clone` so that they can be kept in a signal (`Auth::last_error`) and rendered
/// verbatim as a banner. The `Display` output is meant for end users.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum AuthError {
    /// The provider understood the request and refused it, e.g. wrong password or an already
    /// registered email. `code` is the provider's machine-readable code.
    #[snafu(display("{message}"))]
    Rejected { code: String, message: String },

    #[snafu(display("Could not reach the authentication service: {details}"))]
    Unreachable { details: String },

    #[snafu(display("Received an unexpected response from the authentication service: {details}"))]
    UnexpectedResponse { details: String },

    #[snafu(display("Sign-in was cancelled."))]
    Cancelled {},

    #[snafu(display("Your session has expired. Please sign in again."))]
    SessionExpired {},

    #[snafu(display("Authentication is not configured: {details}"))]
    Misconfigured { details: String },
}

impl AuthError {
    /// Whether this error proves the stored session to be unusable.
    /// Transport failures and temporary refusals do not, the session may still be valid later.
    pub fn invalidates_session(&self) -> bool {
        match self {
            AuthError::Rejected { code, .. } => SESSION_ENDING_CODES.contains(&code.as_str()),
            AuthError::SessionExpired {} => true,
            AuthError::Unreachable { .. }
            | AuthError::UnexpectedResponse { .. }
            | AuthError::Cancelled {}
            | AuthError::Misconfigured { .. } => false,
        }
    }
}

/// Errors raised while reading server-side configuration.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigError {
    #[snafu(display("ConfigError: Environment variable '{name}' must be set"))]
    MissingVar { name: &'static str },

    #[snafu(display("ConfigError: Environment variable '{name}' is not a valid url: {source}"))]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },

    #[snafu(display("ConfigError: Environment variable '{name}' must be an http(s) url, got '{url}'"))]
    NotHttp { name: &'static str, url: url::Url },
}
