//! [`IdentityProvider`] backed by the Firebase Auth REST API.

use serde_json::json;
use std::time::Duration as StdDuration;
use time::OffsetDateTime;
use url::Url;

use self::request::{post_form, post_json};
use self::response::{
    AccountInfo, CreateAuthUriResponse, LookupResponse, RefreshTokenResponse,
    SendOobCodeResponse, SignInResponse, UpdateProfileResponse,
};
use super::{IdentityProvider, PendingSocialSignIn, ProviderFuture, SocialSignIn};
use crate::config::FirebaseOptions;
use crate::error::AuthError;
use crate::session::{Session, TokenData, User};

pub mod request;
pub mod response;

const GOOGLE_PROVIDER_ID: &str = "google.com";

#[derive(Debug, Clone)]
pub struct FirebaseIdentityProvider {
    client: reqwest::Client,
    options: FirebaseOptions,
}

impl FirebaseIdentityProvider {
    pub fn new(options: FirebaseOptions) -> Self {
        Self::with_client(reqwest::Client::new(), options)
    }

    pub fn with_client(client: reqwest::Client, options: FirebaseOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &FirebaseOptions {
        &self.options
    }

    async fn lookup(&self, id_token: &str) -> Result<AccountInfo, AuthError> {
        let response: LookupResponse = post_json(
            &self.client,
            self.options.accounts_endpoint("accounts:lookup"),
            &json!({ "idToken": id_token }),
        )
        .await?;
        response
            .users
            .into_iter()
            .next()
            .ok_or_else(|| AuthError::UnexpectedResponse {
                details: "account lookup returned no user".to_owned(),
            })
    }

    /// Turn a fresh sign-in into a full session by looking up the account's profile.
    async fn establish(&self, signed_in: SignInResponse) -> Result<Session, AuthError> {
        let token = token_data(
            signed_in.id_token,
            signed_in.refresh_token,
            &signed_in.expires_in,
        )?;
        let account = self.lookup(&token.id_token).await?;
        let session = Session {
            user: user_from(account),
            token,
        };
        tracing::debug!(uid = %session.user.uid, "Session established");
        Ok(session)
    }
}

fn token_data(
    id_token: String,
    refresh_token: String,
    expires_in: &str,
) -> Result<TokenData, AuthError> {
    let seconds = expires_in
        .trim()
        .parse::<u64>()
        .map_err(|err| AuthError::UnexpectedResponse {
            details: format!("invalid token lifetime '{expires_in}': {err}"),
        })?;
    Ok(TokenData::new(
        id_token,
        refresh_token,
        StdDuration::from_secs(seconds),
    ))
}

fn user_from(account: AccountInfo) -> User {
    let created_at = account
        .created_at
        .as_deref()
        .and_then(parse_millis)
        .unwrap_or_else(|| {
            tracing::warn!(uid = %account.local_id, "Account has no usable creation date");
            OffsetDateTime::now_utc()
        });
    User {
        uid: account.local_id,
        display_name: account.display_name.unwrap_or_default(),
        email: account.email.unwrap_or_default(),
        created_at,
    }
}

fn parse_millis(millis: &str) -> Option<OffsetDateTime> {
    let millis = millis.trim().parse::<i128>().ok()?;
    OffsetDateTime::from_unix_timestamp_nanos(millis.checked_mul(1_000_000)?).ok()
}

impl IdentityProvider for FirebaseIdentityProvider {
    fn sign_up<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
        display_name: &'a str,
    ) -> ProviderFuture<'a, Session> {
        Box::pin(async move {
            tracing::debug!(email, "Creating account");
            let signed_up: SignInResponse = post_json(
                &self.client,
                self.options.accounts_endpoint("accounts:signUp"),
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;

            let _: UpdateProfileResponse = post_json(
                &self.client,
                self.options.accounts_endpoint("accounts:update"),
                &json!({
                    "idToken": signed_up.id_token,
                    "displayName": display_name,
                    "returnSecureToken": false,
                }),
            )
            .await?;

            self.establish(signed_up).await
        })
    }

    fn sign_in<'a>(&'a self, email: &'a str, password: &'a str) -> ProviderFuture<'a, Session> {
        Box::pin(async move {
            tracing::debug!(email, "Signing in with password");
            let signed_in: SignInResponse = post_json(
                &self.client,
                self.options.accounts_endpoint("accounts:signInWithPassword"),
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
            self.establish(signed_in).await
        })
    }

    fn sign_in_with_google<'a>(&'a self, continue_url: &'a Url) -> ProviderFuture<'a, SocialSignIn> {
        Box::pin(async move {
            let response: CreateAuthUriResponse = post_json(
                &self.client,
                self.options.accounts_endpoint("accounts:createAuthUri"),
                &json!({
                    "providerId": GOOGLE_PROVIDER_ID,
                    "continueUri": continue_url.as_str(),
                }),
            )
            .await?;

            let (Some(auth_uri), Some(session_id)) = (response.auth_uri, response.session_id)
            else {
                return Err(AuthError::UnexpectedResponse {
                    details: "createAuthUri returned no authUri or sessionId".to_owned(),
                });
            };
            let url = Url::parse(&auth_uri).map_err(|err| AuthError::UnexpectedResponse {
                details: format!("invalid authUri: {err}"),
            })?;

            tracing::debug!(%url, "Redirecting to Google");
            Ok(SocialSignIn::Redirect {
                url,
                pending: PendingSocialSignIn {
                    provider_id: GOOGLE_PROVIDER_ID.to_owned(),
                    session_id,
                    continue_url: continue_url.clone(),
                },
            })
        })
    }

    fn complete_social_sign_in<'a>(
        &'a self,
        callback_url: &'a Url,
        pending: &'a PendingSocialSignIn,
    ) -> ProviderFuture<'a, Session> {
        Box::pin(async move {
            if let Some((_, error)) = callback_url.query_pairs().find(|(key, _)| key == "error") {
                tracing::info!(%error, provider_id = %pending.provider_id, "Social sign-in was not completed");
                return Err(AuthError::Cancelled {});
            }

            let signed_in: SignInResponse = post_json(
                &self.client,
                self.options.accounts_endpoint("accounts:signInWithIdp"),
                &json!({
                    "requestUri": callback_url.as_str(),
                    "sessionId": pending.session_id,
                    "returnSecureToken": true,
                    "returnIdpCredential": true,
                }),
            )
            .await?;
            self.establish(signed_in).await
        })
    }

    fn reset_password<'a>(&'a self, email: &'a str) -> ProviderFuture<'a, ()> {
        Box::pin(async move {
            let _: SendOobCodeResponse = post_json(
                &self.client,
                self.options.accounts_endpoint("accounts:sendOobCode"),
                &json!({ "requestType": "PASSWORD_RESET", "email": email }),
            )
            .await?;
            tracing::debug!(email, "Password reset email requested");
            Ok(())
        })
    }

    fn refresh<'a>(&'a self, session: &'a Session) -> ProviderFuture<'a, Session> {
        Box::pin(async move {
            let refreshed: RefreshTokenResponse = post_form(
                &self.client,
                self.options.token_endpoint(),
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", session.token.refresh_token.as_str()),
                ],
            )
            .await?;

            if let Some(user_id) = &refreshed.user_id {
                if user_id != &session.user.uid {
                    return Err(AuthError::SessionExpired {});
                }
            }

            let token = token_data(
                refreshed.id_token,
                refreshed.refresh_token,
                &refreshed.expires_in,
            )?;
            tracing::trace!(expires_at = %token.expires_at, "Session refreshed");
            Ok(Session {
                user: session.user.clone(),
                token,
            })
        })
    }

    fn sign_out<'a>(&'a self, session: &'a Session) -> ProviderFuture<'a, ()> {
        // Firebase id tokens are stateless. Forgetting them locally is all there is to do.
        Box::pin(async move {
            tracing::debug!(uid = %session.user.uid, "Signed out");
            Ok(())
        })
    }
}
