use leptos_use::storage::StorageType;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::routes::AppRoute;

pub const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1/";
pub const DEFAULT_SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/";

/// Connection parameters of the Firebase project used as identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseOptions {
    /// Web API key of your Firebase project.
    pub api_key: String,

    /// Base url of the Identity Toolkit v1 API.
    /// Point this to `http://localhost:9099/identitytoolkit.googleapis.com/v1/` to use the emulator.
    pub identity_toolkit_url: Url,

    /// Base url of the Secure Token v1 API, used to refresh sessions.
    pub secure_token_url: Url,
}

impl FirebaseOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            identity_toolkit_url: Url::parse(DEFAULT_IDENTITY_TOOLKIT_URL)
                .expect("valid default identity toolkit url"),
            secure_token_url: Url::parse(DEFAULT_SECURE_TOKEN_URL)
                .expect("valid default secure token url"),
        }
    }

    /// Endpoint of an Identity Toolkit method, e.g. `accounts:signUp`.
    pub(crate) fn accounts_endpoint(&self, method: &str) -> Url {
        with_key(extend(&self.identity_toolkit_url, method), &self.api_key)
    }

    pub(crate) fn token_endpoint(&self) -> Url {
        with_key(extend(&self.secure_token_url, "token"), &self.api_key)
    }
}

fn extend(base: &Url, segment: &str) -> Url {
    let mut url = base.clone();
    // Cannot-be-a-base urls are rejected by `AppConfig::from_env`. Others stay as given.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(segment);
    }
    url
}

fn with_key(mut url: Url, api_key: &str) -> Url {
    url.query_pairs_mut().append_pair("key", api_key);
    url
}

/// Everything the client needs to know to talk to the identity provider.
/// Read on the server and handed to the client through a server function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub firebase: FirebaseOptions,

    /// Public origin of this application, E.g. "http://127.0.0.1:3000/".
    pub public_url: Url,
}

impl AppConfig {
    /// Where social identity providers should send the user back to.
    pub fn social_continue_url(&self) -> Url {
        let mut url = self.public_url.clone();
        url.set_path(AppRoute::Auth.path());
        url
    }

    /// Read the configuration from the process environment (after loading an optional `.env`).
    ///
    /// - `FIREBASE_API_KEY` (required)
    /// - `PUBLIC_URL` (required)
    /// - `FIREBASE_IDENTITY_TOOLKIT_URL` (optional)
    /// - `FIREBASE_SECURE_TOKEN_URL` (optional)
    #[cfg(feature = "ssr")]
    pub fn from_env() -> Result<Self, crate::error::ConfigError> {
        use crate::error::{InvalidUrlSnafu, MissingVarSnafu, NotHttpSnafu};
        use snafu::{ensure, OptionExt, ResultExt};

        dotenvy::dotenv().ok();

        fn var(name: &'static str) -> Option<String> {
            std::env::var(name).ok().filter(|it| !it.trim().is_empty())
        }
        fn url(name: &'static str, value: &str) -> Result<Url, crate::error::ConfigError> {
            let url = Url::parse(value).context(InvalidUrlSnafu { name })?;
            ensure!(
                matches!(url.scheme(), "http" | "https"),
                NotHttpSnafu { name, url }
            );
            Ok(url)
        }

        let api_key = var("FIREBASE_API_KEY").context(MissingVarSnafu {
            name: "FIREBASE_API_KEY",
        })?;
        let public_url = var("PUBLIC_URL").context(MissingVarSnafu { name: "PUBLIC_URL" })?;

        let mut firebase = FirebaseOptions::new(api_key);
        if let Some(it) = var("FIREBASE_IDENTITY_TOOLKIT_URL") {
            firebase.identity_toolkit_url = url("FIREBASE_IDENTITY_TOOLKIT_URL", &it)?;
        }
        if let Some(it) = var("FIREBASE_SECURE_TOKEN_URL") {
            firebase.secure_token_url = url("FIREBASE_SECURE_TOKEN_URL", &it)?;
        }

        Ok(Self {
            firebase,
            public_url: url("PUBLIC_URL", &public_url)?,
        })
    }
}

/// Browser storage a value is persisted in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionStorage {
    /// Survives closing the browser.
    #[default]
    Local,

    /// Scoped to the current tab.
    Session,
}

impl From<SessionStorage> for StorageType {
    fn from(storage: SessionStorage) -> Self {
        match storage {
            SessionStorage::Local => StorageType::Local,
            SessionStorage::Session => StorageType::Session,
        }
    }
}

/// Options for the `Auth` context.
#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// Where social identity providers should send the user back to.
    pub social_continue_url: Url,

    pub advanced: AdvancedOptions,
}

#[derive(Debug, Clone)]
pub struct AdvancedOptions {
    /// Storage the session is persisted in, allowing it to survive page reloads.
    /// Defaults to `SessionStorage::Local`.
    pub session_storage: SessionStorage,

    /// Interval after which the session is checked for its age.
    /// Defaults to `Duration::from_secs(30)`.
    pub session_check_interval: Duration,

    /// How much id token lifetime must be left for the session to not count as "nearly expired".
    /// Nearly expired sessions are refreshed.
    /// Defaults to `Duration::from_secs(5 * 60)`.
    pub refresh_margin: Duration,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            session_storage: SessionStorage::Local,
            session_check_interval: Duration::from_secs(30),
            refresh_margin: Duration::from_secs(5 * 60),
        }
    }
}
