use leptos::prelude::*;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use url::Url;

use crate::error::AuthError;
use crate::form::AuthRequest;
use crate::provider::{IdentityProvider, PendingSocialSignIn, SocialSignIn};
use crate::session::Session;

/// Where the application stands regarding the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// The persisted session was not yet restored (or is being refreshed / completed).
    Loading,

    Authenticated(Session),

    NotAuthenticated,
}

impl AuthState {
    pub fn resolve(resolved: bool, session: Option<Session>) -> Self {
        match (resolved, session) {
            (false, _) => AuthState::Loading,
            (true, Some(session)) => AuthState::Authenticated(session),
            (true, None) => AuthState::NotAuthenticated,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Loading | AuthState::NotAuthenticated => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, AuthState::Loading)
    }
}

/// The authentication state of this application and the verbs changing it.
///
/// Provided as context by [`init_auth`](crate::init_auth). Use
/// ```no_run
/// use leptos_foundation::use_auth;
///
/// let auth = use_auth();
/// ```
/// in any component rendered below the component that performed the `init_auth` call.
#[derive(Clone, Copy)]
pub struct Auth {
    pub(crate) provider: StoredValue<Arc<dyn IdentityProvider>>,

    /// The current session, persisted in browser storage.
    pub session: Signal<Option<Session>>,
    pub(crate) set_session: WriteSignal<Option<Session>>,

    /// Becomes `true` once the persisted session was restored.
    pub(crate) resolved: RwSignal<bool>,

    pub state: Signal<AuthState>,

    /// Derived signal stating `true` when `state` is of the `Authenticated` variant.
    pub is_authenticated: Signal<bool>,

    /// `true` while the session is being restored or any verb is in flight.
    pub is_loading: Signal<bool>,
    pub(crate) in_flight: RwSignal<usize>,

    /// The error of the last failed verb. Cleared when the next verb starts.
    pub last_error: Signal<Option<AuthError>>,
    pub(crate) set_last_error: WriteSignal<Option<AuthError>>,

    pub(crate) pending_social: Signal<Option<PendingSocialSignIn>>,
    pub(crate) set_pending_social: WriteSignal<Option<PendingSocialSignIn>>,

    pub(crate) social_continue_url: StoredValue<Url>,
    pub(crate) refresh_margin: StoredValue<StdDuration>,
    pub(crate) refreshing: RwSignal<bool>,
}

impl Auth {
    /// Build the context around already persisted `session` and `pending_social` signals.
    /// The session counts as restored once `resolved` is set.
    pub(crate) fn new(
        provider: Arc<dyn IdentityProvider>,
        (session, set_session): (Signal<Option<Session>>, WriteSignal<Option<Session>>),
        (pending_social, set_pending_social): (
            Signal<Option<PendingSocialSignIn>>,
            WriteSignal<Option<PendingSocialSignIn>>,
        ),
        social_continue_url: Url,
        refresh_margin: StdDuration,
    ) -> Self {
        let resolved = RwSignal::new(false);
        let in_flight = RwSignal::new(0_usize);
        let (last_error, set_last_error) = signal(None);

        let state = Memo::new(move |_| AuthState::resolve(resolved.get(), session.get()));

        Self {
            provider: StoredValue::new(provider),
            session,
            set_session,
            resolved,
            state: state.into(),
            is_authenticated: Signal::derive(move || {
                matches!(*state.read(), AuthState::Authenticated(_))
            }),
            is_loading: Signal::derive(move || !resolved.get() || in_flight.get() > 0),
            in_flight,
            last_error: last_error.into(),
            set_last_error,
            pending_social,
            set_pending_social,
            social_continue_url: StoredValue::new(social_continue_url),
            refresh_margin: StoredValue::new(refresh_margin),
            refreshing: RwSignal::new(false),
        }
    }

    pub fn clear_error(&self) {
        self.set_last_error.set(None);
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<Session, AuthError> {
        let provider = self.provider.get_value();
        let result = self
            .track(provider.sign_up(email, password, display_name))
            .await;
        self.adopt(result)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let provider = self.provider.get_value();
        let result = self.track(provider.sign_in(email, password)).await;
        self.adopt(result)
    }

    /// Run a request prepared by the auth form.
    pub async fn execute(&self, request: &AuthRequest) -> Result<Session, AuthError> {
        tracing::debug!(mode = ?request.mode(), "Submitting credentials");
        let provider = self.provider.get_value();
        let result = self.track(request.dispatch(provider.as_ref())).await;
        self.adopt(result)
    }

    /// Sign in with Google. Either signs in right away or leaves the page for Google's consent
    /// screen, in which case the sign-in is finished by `init_auth` once the user returns.
    pub async fn sign_in_with_google(&self) -> Result<(), AuthError> {
        let provider = self.provider.get_value();
        let continue_url = self.social_continue_url.get_value();
        match self
            .track(provider.sign_in_with_google(&continue_url))
            .await?
        {
            SocialSignIn::Completed(session) => {
                self.set_session.try_set(Some(session));
                Ok(())
            }
            SocialSignIn::Redirect { url, pending } => {
                tracing::debug!(%url, "Leaving for social sign-in");
                self.set_pending_social.try_set(Some(pending));
                redirect_to(&url).inspect_err(|err| {
                    self.set_last_error.try_set(Some(err.clone()));
                })
            }
        }
    }

    pub async fn reset_password(&self, email: &str) -> Result<(), AuthError> {
        let provider = self.provider.get_value();
        self.track(provider.reset_password(email)).await
    }

    /// End the current session. Never fails: provider errors are logged and the local session
    /// is dropped regardless.
    pub async fn sign_out(&self) {
        let Some(session) = self.session.get_untracked() else {
            tracing::debug!("Sign-out requested without a session");
            return;
        };
        let provider = self.provider.get_value();

        self.in_flight.update(|it| *it += 1);
        if let Err(err) = provider.sign_out(&session).await {
            tracing::warn!(?err, "Provider could not end the session, forgetting it anyway");
        }
        self.in_flight.try_update(|it| *it = it.saturating_sub(1));

        self.forget_session();
    }

    pub(crate) fn forget_session(&self) {
        tracing::trace!("Dropping session");
        self.set_session.try_set(None);
    }

    /// Mark a call as in flight for its whole duration and record its failure.
    async fn track<T>(
        &self,
        call: impl Future<Output = Result<T, AuthError>>,
    ) -> Result<T, AuthError> {
        self.set_last_error.set(None);
        self.in_flight.update(|it| *it += 1);

        let result = call.await;

        // The owner may have been disposed while we were waiting.
        self.in_flight.try_update(|it| *it = it.saturating_sub(1));
        if let Err(err) = &result {
            tracing::warn!(?err, "Authentication call failed");
            self.set_last_error.try_set(Some(err.clone()));
        }
        result
    }

    fn adopt(&self, result: Result<Session, AuthError>) -> Result<Session, AuthError> {
        if let Ok(session) = &result {
            tracing::debug!(uid = %session.user.uid, "Signed in");
            self.set_session.try_set(Some(session.clone()));
        }
        result
    }

    /// Refresh the session if its id token is (nearly) expired.
    /// Runs in the background: failures are logged, not reported through `last_error`.
    pub(crate) async fn refresh_if_needed(&self) {
        let margin = self.refresh_margin.get_value();
        let Some(session) = self
            .session
            .get_untracked()
            .filter(|it| it.needs_refresh(margin))
        else {
            return;
        };
        if self.refreshing.get_untracked() {
            return;
        }

        tracing::trace!("Refreshing session");
        self.refreshing.set(true);
        let provider = self.provider.get_value();
        let result = provider.refresh(&session).await;
        self.refreshing.try_set(false);

        match result {
            Ok(refreshed) => {
                self.set_session.try_set(Some(refreshed));
            }
            Err(err) if err.invalidates_session() => {
                tracing::info!(?err, "Session was rejected by the provider");
                self.forget_session();
            }
            Err(err) => {
                tracing::warn!(?err, "Could not refresh session, keeping it for now");
            }
        }
    }

    /// Finish a social sign-in if we were just sent back by the identity provider.
    /// A pending sign-in only survives a single page load.
    pub(crate) async fn complete_pending_social_sign_in(&self, current_url: Option<Url>) -> bool {
        let Some(pending) = self.pending_social.get_untracked() else {
            return false;
        };
        self.set_pending_social.set(None);

        let Some(callback_url) = current_url.filter(|url| pending.is_callback(url)) else {
            tracing::debug!("Discarding stale social sign-in");
            return false;
        };

        let provider = self.provider.get_value();
        let result = self
            .track(provider.complete_social_sign_in(&callback_url, &pending))
            .await;
        let _ = self.adopt(result);
        true
    }
}

#[cfg(not(feature = "ssr"))]
fn redirect_to(url: &Url) -> Result<(), AuthError> {
    window()
        .location()
        .set_href(url.as_str())
        .map_err(|err| AuthError::Misconfigured {
            details: format!("could not navigate to the identity provider: {err:?}"),
        })
}

#[cfg(feature = "ssr")]
fn redirect_to(url: &Url) -> Result<(), AuthError> {
    Err(AuthError::Misconfigured {
        details: format!("cannot navigate to {url} while rendering on the server"),
    })
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;
    use leptos::reactive::owner::Owner;

    use super::*;
    use crate::provider::fake::{Call, FakeProvider};
    use crate::session::fixtures;

    const FIVE_MINUTES: StdDuration = StdDuration::from_secs(5 * 60);
    const TWO_HOURS: StdDuration = StdDuration::from_secs(2 * 60 * 60);

    /// An `Auth` context owned by a fresh reactive owner, restored with `session`.
    fn auth_with(
        provider: Arc<FakeProvider>,
        session: Option<Session>,
        refresh_margin: StdDuration,
    ) -> Auth {
        let owner = Owner::new();
        owner.set();

        let (session, set_session) = signal(session);
        let (pending_social, set_pending_social) = signal::<Option<PendingSocialSignIn>>(None);
        let auth = Auth::new(
            provider,
            (session.into(), set_session),
            (pending_social.into(), set_pending_social),
            Url::parse("http://127.0.0.1:3000/auth").unwrap(),
            refresh_margin,
        );
        auth.resolved.set(true);
        // `Owner::set` only keeps a weak reference; keep the owner (and its signals) alive.
        std::mem::forget(owner);
        auth
    }

    fn pending_google() -> PendingSocialSignIn {
        PendingSocialSignIn {
            provider_id: "google.com".to_owned(),
            session_id: "sid".to_owned(),
            continue_url: Url::parse("http://127.0.0.1:3000/auth").unwrap(),
        }
    }

    fn rejected(code: &str) -> AuthError {
        AuthError::Rejected {
            code: code.to_owned(),
            message: "Refused.".to_owned(),
        }
    }

    fn offline() -> AuthError {
        AuthError::Unreachable {
            details: "connection refused".to_owned(),
        }
    }

    #[tokio::test]
    async fn failed_call_is_recorded_and_clears_the_loading_flag() {
        let auth = auth_with(Arc::new(FakeProvider::failing(offline())), None, FIVE_MINUTES);

        let result = auth.sign_in("ada@example.com", "secret").await;

        assert_that(result).is_equal_to(Err(offline()));
        assert_that(auth.in_flight.get_untracked()).is_equal_to(0);
        assert_that(auth.is_loading.get_untracked()).is_false();
        assert_that(auth.last_error.get_untracked()).is_equal_to(Some(offline()));
        assert_that(auth.session.get_untracked()).is_equal_to(None);

        auth.clear_error();
        assert_that(auth.last_error.get_untracked()).is_equal_to(None);
    }

    #[tokio::test]
    async fn successful_request_adopts_the_session_and_drops_the_previous_error() {
        let provider = Arc::new(FakeProvider::default());
        let auth = auth_with(provider.clone(), None, FIVE_MINUTES);
        auth.set_last_error.set(Some(offline()));

        let request = AuthRequest::SignIn {
            email: "ada@example.com".to_owned(),
            password: "secret".to_owned(),
        };
        let session = auth.execute(&request).await.unwrap();

        assert_that(auth.session.get_untracked()).is_equal_to(Some(session.clone()));
        assert_that(auth.state.get_untracked()).is_equal_to(AuthState::Authenticated(session));
        assert_that(auth.is_authenticated.get_untracked()).is_true();
        assert_that(auth.last_error.get_untracked()).is_equal_to(None);
        assert_that(provider.calls()).is_equal_to(vec![Call::SignIn {
            email: "ada@example.com".to_owned(),
            password: "secret".to_owned(),
        }]);
    }

    #[tokio::test]
    async fn sign_out_forgets_the_session_even_when_the_provider_fails() {
        let provider = Arc::new(FakeProvider::failing(offline()));
        let session = fixtures::session("Ada", "ada@example.com");
        let auth = auth_with(provider.clone(), Some(session), FIVE_MINUTES);

        auth.sign_out().await;

        assert_that(auth.session.get_untracked()).is_equal_to(None);
        assert_that(auth.state.get_untracked()).is_equal_to(AuthState::NotAuthenticated);
        assert_that(auth.in_flight.get_untracked()).is_equal_to(0);
        assert_that(provider.calls()).is_equal_to(vec![Call::SignOut]);
    }

    #[tokio::test]
    async fn refresh_rejected_by_the_provider_drops_the_session() {
        let provider = Arc::new(FakeProvider::failing(rejected("INVALID_REFRESH_TOKEN")));
        let session = fixtures::session("Ada", "ada@example.com");
        let auth = auth_with(provider.clone(), Some(session), TWO_HOURS);

        auth.refresh_if_needed().await;

        assert_that(auth.session.get_untracked()).is_equal_to(None);
        assert_that(auth.refreshing.get_untracked()).is_false();
        assert_that(provider.calls()).is_equal_to(vec![Call::Refresh]);
    }

    #[tokio::test]
    async fn refresh_failing_for_other_reasons_keeps_the_session() {
        for err in [offline(), rejected("INTERNAL_ERROR"), rejected("QUOTA_EXCEEDED")] {
            let provider = Arc::new(FakeProvider::failing(err.clone()));
            let session = fixtures::session("Ada", "ada@example.com");
            let auth = auth_with(provider.clone(), Some(session.clone()), TWO_HOURS);

            auth.refresh_if_needed().await;

            assert_that(auth.session.get_untracked())
                .with_detail_message(format!("{err:?}"))
                .is_equal_to(Some(session));
            assert_that(auth.refreshing.get_untracked()).is_false();
        }
    }

    #[tokio::test]
    async fn fresh_session_is_not_refreshed() {
        let provider = Arc::new(FakeProvider::default());
        let session = fixtures::session("Ada", "ada@example.com");
        let auth = auth_with(provider.clone(), Some(session), FIVE_MINUTES);

        auth.refresh_if_needed().await;

        assert_that(provider.calls().len()).is_equal_to(0);
    }

    #[tokio::test]
    async fn stale_pending_social_sign_in_is_discarded() {
        let provider = Arc::new(FakeProvider::default());
        let auth = auth_with(provider.clone(), None, FIVE_MINUTES);
        auth.set_pending_social.set(Some(pending_google()));

        let completed = auth
            .complete_pending_social_sign_in(Url::parse("http://127.0.0.1:3000/auth").ok())
            .await;

        assert_that(completed).is_false();
        assert_that(auth.pending_social.get_untracked()).is_equal_to(None);
        assert_that(auth.session.get_untracked()).is_equal_to(None);
        assert_that(provider.calls().len()).is_equal_to(0);
    }

    #[tokio::test]
    async fn social_callback_completes_the_pending_sign_in() {
        let provider = Arc::new(FakeProvider::default());
        let auth = auth_with(provider.clone(), None, FIVE_MINUTES);
        auth.set_pending_social.set(Some(pending_google()));

        let callback = Url::parse("http://127.0.0.1:3000/auth?state=xyz&code=4%2F0A").ok();
        let completed = auth.complete_pending_social_sign_in(callback).await;

        assert_that(completed).is_true();
        assert_that(auth.pending_social.get_untracked()).is_equal_to(None);
        assert_that(auth.is_authenticated.get_untracked()).is_true();
        assert_that(provider.calls()).is_equal_to(vec![Call::Google]);
    }

    #[test]
    fn unresolved_state_is_loading_even_with_a_stored_session() {
        let state = AuthState::resolve(false, Some(fixtures::session("Ada", "a@b.com")));
        assert_that(state.is_loading()).is_true();
        assert_that(state.session().is_none()).is_true();
    }

    #[test]
    fn resolved_state_follows_the_session() {
        let session = fixtures::session("Ada", "a@b.com");
        assert_that(AuthState::resolve(true, Some(session.clone())))
            .is_equal_to(AuthState::Authenticated(session));
        assert_that(AuthState::resolve(true, None)).is_equal_to(AuthState::NotAuthenticated);
    }
}
