//! Which page content may be shown for a given [`AuthState`].

use crate::routes::AppRoute;
use crate::state::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show a loading indicator and nothing else.
    ShowLoading,

    /// Render the page content.
    Render,

    /// Render nothing and navigate to the given route.
    Redirect(AppRoute),
}

/// Signed-in users have no business on the auth page and are sent to their dashboard.
/// While the session is still being restored, the form is shown.
pub fn guard_auth_page(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Authenticated(_) => GuardDecision::Redirect(AppRoute::Dashboard),
        AuthState::Loading | AuthState::NotAuthenticated => GuardDecision::Render,
    }
}

pub fn guard_dashboard(state: &AuthState) -> GuardDecision {
    match state {
        AuthState::Loading => GuardDecision::ShowLoading,
        AuthState::Authenticated(_) => GuardDecision::Render,
        AuthState::NotAuthenticated => GuardDecision::Redirect(AppRoute::Auth),
    }
}
