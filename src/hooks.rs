use codee::string::JsonSerdeCodec;
use leptos::context::provide_context;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;
use leptos_use::{use_interval, UseIntervalReturn};
use std::sync::Arc;
use url::Url;

use crate::config::{AuthOptions, SessionStorage};
use crate::provider::{IdentityProvider, PendingSocialSignIn};
use crate::routes::AppRoute;
use crate::session::Session;
use crate::state::Auth;
use crate::storage::{
    use_persisted, Persisted, PENDING_SOCIAL_SIGN_IN_STORAGE_KEY, SESSION_STORAGE_KEY,
};

/// Initializes the `Auth` context of this application, using `provider` for all account
/// operations.
///
/// Must be called below the `Router`. Restores a previously persisted session, finishes a social
/// sign-in if the identity provider just sent the user back to us and keeps the session fresh.
pub fn init_auth(options: AuthOptions, provider: Arc<dyn IdentityProvider>) -> Auth {
    tracing::trace!("Initializing auth...");

    let AuthOptions {
        social_continue_url,
        advanced,
    } = options;

    let Persisted {
        read: session,
        write: set_session,
        ..
    } = use_persisted::<Option<Session>, JsonSerdeCodec>(
        advanced.session_storage.into(),
        SESSION_STORAGE_KEY,
        None,
    );
    let Persisted {
        read: pending_social,
        write: set_pending_social,
        ..
    } = use_persisted::<Option<PendingSocialSignIn>, JsonSerdeCodec>(
        SessionStorage::Session.into(),
        PENDING_SOCIAL_SIGN_IN_STORAGE_KEY,
        None,
    );

    let auth = Auth::new(
        provider,
        (session, set_session),
        (pending_social, set_pending_social),
        social_continue_url,
        advanced.refresh_margin,
    );

    // We guarantee that the Auth state is provided as context.
    provide_context(auth);

    // Effects only run in the browser, where the persisted session is available.
    let navigate = use_navigate();
    Effect::new(move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            let current_url = current_url();
            if auth.complete_pending_social_sign_in(current_url).await {
                // The callback parameters were consumed. Drop them from the address bar.
                navigate(
                    AppRoute::Auth.path(),
                    NavigateOptions {
                        replace: true,
                        ..NavigateOptions::default()
                    },
                );
            }
            auth.refresh_if_needed().await;
            tracing::trace!("Auth resolved");
            auth.resolved.try_set(true);
        });
    });

    let UseIntervalReturn { counter, .. } = use_interval::<u64>(
        advanced
            .session_check_interval
            .as_millis()
            .try_into()
            .unwrap_or(u64::MAX),
    );
    Effect::new(move |_| {
        let _count = counter.get();
        if auth.resolved.get_untracked() {
            spawn_local(async move { auth.refresh_if_needed().await });
        }
    });

    auth
}

fn current_url() -> Option<Url> {
    let href = window().location().href().ok()?;
    Url::parse(&href).ok()
}

/// Access the `Auth` context. Panics when called outside of a component tree in which
/// `init_auth` was called.
pub fn use_auth() -> Auth {
    expect_context::<Auth>()
}

pub fn try_use_auth() -> Option<Auth> {
    use_context::<Auth>()
}
