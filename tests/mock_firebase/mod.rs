//! Minimal in-process stand-in for the Firebase Auth REST API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Form, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

use leptos_foundation::FirebaseOptions;

pub const API_KEY: &str = "test-api-key";
pub const GOOGLE_SESSION_ID: &str = "google-session-1";
pub const CREATED_AT_MILLIS: &str = "1709814600000";

#[derive(Debug, Clone)]
struct Account {
    uid: String,
    email: String,
    password: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Default)]
struct Accounts {
    by_uid: HashMap<String, Account>,
    issued: usize,
}

impl Accounts {
    fn create(&mut self, email: &str, password: Option<&str>, display_name: Option<&str>) -> String {
        let uid = format!("uid-{}", self.by_uid.len() + 1);
        self.by_uid.insert(
            uid.clone(),
            Account {
                uid: uid.clone(),
                email: email.to_owned(),
                password: password.map(str::to_owned),
                display_name: display_name.map(str::to_owned),
            },
        );
        uid
    }

    fn find_by_email(&self, email: &str) -> Option<&Account> {
        self.by_uid.values().find(|it| it.email == email)
    }

    /// Tokens are `<kind>-<uid>-<n>`, so they are unique per issuance and name their user.
    fn issue(&mut self, uid: &str) -> (String, String) {
        self.issued += 1;
        (
            format!("id-{uid}-{}", self.issued),
            format!("refresh-{uid}-{}", self.issued),
        )
    }

    fn uid_of(token: &str, kind: &str) -> Option<String> {
        let rest = token.strip_prefix(kind)?.strip_prefix('-')?;
        let (uid, _n) = rest.rsplit_once('-')?;
        Some(uid.to_owned())
    }
}

#[derive(Clone, Default)]
struct MockState {
    accounts: Arc<Mutex<Accounts>>,
}

pub struct MockFirebase {
    pub base_url: Url,
    handle: JoinHandle<()>,
}

impl MockFirebase {
    pub async fn start() -> Self {
        let router = Router::new()
            .route("/identitytoolkit/v1/{method}", post(accounts))
            .route("/securetoken/v1/token", post(token))
            .with_state(MockState::default());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("free port");
        let addr = listener.local_addr().expect("bound");
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock server to run");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).expect("valid url"),
            handle,
        }
    }

    pub fn options(&self) -> FirebaseOptions {
        let mut options = FirebaseOptions::new(API_KEY);
        options.identity_toolkit_url = self.base_url.join("identitytoolkit/v1/").expect("valid url");
        options.secure_token_url = self.base_url.join("securetoken/v1/").expect("valid url");
        options
    }
}

impl Drop for MockFirebase {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": { "code": 400, "message": message, "errors": [] } })),
    )
        .into_response()
}

fn signed_in(uid: &str, tokens: (String, String)) -> Response {
    Json(json!({
        "localId": uid,
        "idToken": tokens.0,
        "refreshToken": tokens.1,
        "expiresIn": "3600",
    }))
    .into_response()
}

fn str_field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}

async fn accounts(
    State(state): State<MockState>,
    Path(method): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut accounts = state.accounts.lock().expect("not poisoned");
    match method.as_str() {
        "accounts:signUp" => {
            let email = str_field(&body, "email");
            if accounts.find_by_email(email).is_some() {
                return error("EMAIL_EXISTS");
            }
            if str_field(&body, "password").len() < 6 {
                return error("WEAK_PASSWORD : Password should be at least 6 characters");
            }
            let uid = accounts.create(email, Some(str_field(&body, "password")), None);
            let tokens = accounts.issue(&uid);
            signed_in(&uid, tokens)
        }
        "accounts:signInWithPassword" => {
            let Some(account) = accounts
                .find_by_email(str_field(&body, "email"))
                .filter(|it| it.password.as_deref() == Some(str_field(&body, "password")))
                .cloned()
            else {
                return error("INVALID_LOGIN_CREDENTIALS");
            };
            let tokens = accounts.issue(&account.uid);
            signed_in(&account.uid, tokens)
        }
        "accounts:update" => {
            let Some(uid) = Accounts::uid_of(str_field(&body, "idToken"), "id") else {
                return error("INVALID_ID_TOKEN");
            };
            let Some(account) = accounts.by_uid.get_mut(&uid) else {
                return error("USER_NOT_FOUND");
            };
            account.display_name = Some(str_field(&body, "displayName").to_owned());
            Json(json!({ "localId": uid, "displayName": account.display_name })).into_response()
        }
        "accounts:lookup" => {
            let Some(account) = Accounts::uid_of(str_field(&body, "idToken"), "id")
                .and_then(|uid| accounts.by_uid.get(&uid))
            else {
                return error("INVALID_ID_TOKEN");
            };
            Json(json!({
                "users": [{
                    "localId": account.uid,
                    "email": account.email,
                    "displayName": account.display_name,
                    "createdAt": CREATED_AT_MILLIS,
                }]
            }))
            .into_response()
        }
        "accounts:sendOobCode" => {
            if str_field(&body, "requestType") != "PASSWORD_RESET" {
                return error("INVALID_REQ_TYPE");
            }
            let email = str_field(&body, "email");
            match accounts.find_by_email(email) {
                Some(_) => Json(json!({ "email": email })).into_response(),
                None => error("EMAIL_NOT_FOUND"),
            }
        }
        "accounts:createAuthUri" => {
            if str_field(&body, "providerId") != "google.com" {
                return error("INVALID_PROVIDER_ID");
            }
            let continue_uri = str_field(&body, "continueUri");
            Json(json!({
                "authUri": format!("https://accounts.google.com/o/oauth2/auth?state=xyz&redirect_uri={continue_uri}"),
                "sessionId": GOOGLE_SESSION_ID,
                "providerId": "google.com",
            }))
            .into_response()
        }
        "accounts:signInWithIdp" => {
            if str_field(&body, "sessionId") != GOOGLE_SESSION_ID
                || !str_field(&body, "requestUri").contains("code=")
            {
                return error("INVALID_IDP_RESPONSE");
            }
            let existing = accounts
                .find_by_email("grace@gmail.com")
                .map(|it| it.uid.clone());
            let uid = match existing {
                Some(uid) => uid,
                None => accounts.create("grace@gmail.com", None, Some("Grace Hopper")),
            };
            let tokens = accounts.issue(&uid);
            signed_in(&uid, tokens)
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({ "error": { "code": 404, "message": "NOT_FOUND" } })))
            .into_response(),
    }
}

#[derive(Deserialize)]
struct TokenRequest {
    grant_type: String,
    refresh_token: String,
}

async fn token(State(state): State<MockState>, Form(request): Form<TokenRequest>) -> Response {
    if request.grant_type != "refresh_token" {
        return error("INVALID_GRANT_TYPE");
    }
    let mut accounts = state.accounts.lock().expect("not poisoned");
    let Some(uid) = Accounts::uid_of(&request.refresh_token, "refresh")
        .filter(|uid| accounts.by_uid.contains_key(uid))
    else {
        return error("INVALID_REFRESH_TOKEN");
    };
    let (id_token, refresh_token) = accounts.issue(&uid);
    Json(json!({
        "id_token": id_token,
        "refresh_token": refresh_token,
        "expires_in": "3600",
        "token_type": "Bearer",
        "user_id": uid,
    }))
    .into_response()
}

pub fn init_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
