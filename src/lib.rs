#![recursion_limit = "256"]

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod form;
pub mod guard;
mod hooks;
pub mod pages;
pub mod provider;
pub mod routes;
pub mod session;
pub mod state;
mod storage;
pub mod validation;

pub use config::{AdvancedOptions, AppConfig, AuthOptions, FirebaseOptions, SessionStorage};
pub use error::{AuthError, ConfigError};
pub use hooks::{init_auth, try_use_auth, use_auth};
pub use session::{Session, TokenData, User};
pub use state::{Auth, AuthState};
pub use url::Url;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::App;

    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::default()
            .set_max_level(tracing::Level::DEBUG)
            .build(),
    );

    leptos::mount::hydrate_body(App);
}
