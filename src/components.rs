use leptos::prelude::*;

use crate::session::Session;
use crate::state::AuthState;
use crate::use_auth;

mod alert;
mod button;
mod footer;
mod input;
mod loading;

pub use alert::{Alert, AlertVariant};
pub use button::{Button, ButtonSize, ButtonVariant};
pub use footer::Footer;
pub use input::Input;
pub use loading::LoadingIndicator;

/// Show `children` only when a user is signed in, handing them the current session.
///
/// Children are rendered anew whenever the session changes, e.g. after a token refresh.
///
/// # Example
/// ```no_run
/// use leptos::prelude::*;
/// use leptos_foundation::components::Authenticated;
///
/// # #[component]
/// # fn Component() -> impl IntoView {
/// view! {
///     <Authenticated children=move |session| view! {
///         <p>"Welcome, " { session.user.greeting_name().to_owned() }</p>
///     }/>
/// }
/// # }
/// ```
#[component(transparent)]
#[allow(clippy::must_use_candidate)]
pub fn Authenticated<C, V>(children: C) -> impl IntoView
where
    C: Fn(Session) -> V + 'static + Send,
    V: IntoView + 'static,
{
    let auth = use_auth();

    move || match auth.state.get() {
        AuthState::Authenticated(session) => Some(children(session)),
        AuthState::Loading | AuthState::NotAuthenticated => None,
    }
}

/// Show `children` only when it is known that nobody is signed in.
/// Nothing is shown while the persisted session is still being restored.
#[component(transparent)]
#[allow(clippy::must_use_candidate)]
pub fn Unauthenticated(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    move || match auth.state.get() {
        AuthState::NotAuthenticated => Some(children()),
        AuthState::Authenticated(_) | AuthState::Loading => None,
    }
}
