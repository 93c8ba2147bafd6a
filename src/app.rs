use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Meta, MetaTags, Stylesheet, Title};
use leptos_router::components::*;
use leptos_router::path;
use std::sync::Arc;

use crate::components::{Alert, ButtonSize, LoadingIndicator};
use crate::config::{AdvancedOptions, AppConfig, AuthOptions};
use crate::init_auth;
use crate::pages::{AuthPage, Dashboard, Landing};
use crate::provider::firebase::FirebaseIdentityProvider;
use crate::provider::IdentityProvider;

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Meta name="description" content="A Leptos starter with Firebase authentication"/>
        <Stylesheet id="leptos" href="/pkg/leptos-foundation.css"/>
        <Title text="Leptos Foundation"/>

        <Router>
            <WithAuth>
                <Routes fallback=|| view! { "Page not found." }>
                    <Route path=path!("/") view=Landing/>
                    <Route path=path!("/auth") view=AuthPage/>
                    <Route path=path!("/dashboard") view=Dashboard/>
                </Routes>
            </WithAuth>
        </Router>
    }
}

/// Configuration read from the server environment. The Firebase web API key is public.
#[server]
pub async fn get_app_config() -> Result<AppConfig, ServerFnError> {
    AppConfig::from_env().map_err(|err| {
        tracing::error!(%err, "Could not read app configuration");
        ServerFnError::new(err)
    })
}

/// Initializes the `Auth` context once the configuration is known and renders `children` below it.
#[component]
fn WithAuth(children: ChildrenFn) -> impl IntoView {
    let config = Resource::new(|| (), |()| get_app_config());

    view! {
        <Suspense fallback=|| view! {
            <div class="min-h-screen flex items-center justify-center">
                <LoadingIndicator size=ButtonSize::Lg/>
            </div>
        }>
            {move || {
                let children = children.clone();
                Suspend::new(async move {
                    match config.await {
                        Ok(config) => {
                            let provider: Arc<dyn IdentityProvider> =
                                Arc::new(FirebaseIdentityProvider::new(config.firebase.clone()));
                            let _auth = init_auth(
                                AuthOptions {
                                    social_continue_url: config.social_continue_url(),
                                    advanced: AdvancedOptions::default(),
                                },
                                provider,
                            );
                            children().into_any()
                        }
                        Err(err) => view! {
                            <div class="max-w-md mx-auto py-12">
                                <Alert message=format!("Authentication is not configured: {err}")/>
                            </div>
                        }
                        .into_any(),
                    }
                })
            }}
        </Suspense>
    }
}
