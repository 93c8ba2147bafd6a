use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use url::Url;

use crate::error::AuthError;
use crate::session::Session;

pub mod firebase;

/// Future returned by every `IdentityProvider` operation.
///
/// Not `Send`: in the browser, requests are driven by the single-threaded event loop.
pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, AuthError>> + 'a>>;

/// Outcome of starting a social sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialSignIn {
    /// The provider signed the user in without leaving the page.
    Completed(Session),

    /// The user must be sent to `url`. After consenting, the identity provider redirects back
    /// to the continue url, where the sign-in is finished using `pending`.
    Redirect {
        url: Url,
        pending: PendingSocialSignIn,
    },
}

/// State that must survive the round-trip to the social identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSocialSignIn {
    pub provider_id: String,

    /// Opaque provider session binding the callback to the request we started.
    pub session_id: String,

    /// Url the identity provider was told to send the user back to.
    pub continue_url: Url,
}

impl PendingSocialSignIn {
    /// Whether `url` looks like the identity provider returning to us.
    pub fn is_callback(&self, url: &Url) -> bool {
        url.path() == self.continue_url.path()
            && url
                .query_pairs()
                .any(|(key, _)| matches!(key.as_ref(), "code" | "error" | "id_token" | "state"))
    }
}

/// The external identity service this application delegates authentication to.
///
/// Implementations perform the actual account operations; session state and loading /
/// error bookkeeping are handled by [`Auth`](crate::Auth).
pub trait IdentityProvider: Send + Sync {
    /// Create an account and sign it in.
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
        display_name: &'a str,
    ) -> ProviderFuture<'a, Session>;

    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> ProviderFuture<'a, Session>;

    /// Start a Google sign-in. `continue_url` is where the user should land afterwards.
    fn sign_in_with_google<'a>(&'a self, continue_url: &'a Url) -> ProviderFuture<'a, SocialSignIn>;

    /// Finish a social sign-in once the identity provider redirected back to `callback_url`.
    fn complete_social_sign_in<'a>(
        &'a self,
        callback_url: &'a Url,
        pending: &'a PendingSocialSignIn,
    ) -> ProviderFuture<'a, Session>;

    /// Send a password reset email to `email`.
    fn reset_password<'a>(&'a self, email: &'a str) -> ProviderFuture<'a, ()>;

    /// Exchange the session's refresh token for fresh credentials.
    fn refresh<'a>(&'a self, session: &'a Session) -> ProviderFuture<'a, Session>;

    fn sign_out<'a>(&'a self, session: &'a Session) -> ProviderFuture<'a, ()>;
}
