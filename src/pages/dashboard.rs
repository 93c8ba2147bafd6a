use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

use crate::components::{
    Authenticated, Button, ButtonSize, ButtonVariant, Footer, LoadingIndicator,
};
use crate::guard::{guard_dashboard, GuardDecision};
use crate::routes::AppRoute;
use crate::session::Session;
use crate::use_auth;

#[component]
pub fn Dashboard() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| guard_dashboard(&auth.state.get()));
    Effect::new(move |_| {
        if let GuardDecision::Redirect(route) = decision.get() {
            tracing::debug!(to = route.path(), "Not signed in");
            navigate(route.path(), NavigateOptions::default());
        }
    });

    move || match decision.get() {
        GuardDecision::ShowLoading => view! {
            <div class="min-h-screen bg-gray-50 flex items-center justify-center">
                <LoadingIndicator size=ButtonSize::Lg text="Loading your dashboard..."/>
            </div>
        }
        .into_any(),
        GuardDecision::Redirect(_) => ().into_any(),
        GuardDecision::Render => view! {
            <Authenticated children=move |session| view! { <DashboardContent session=session/> }/>
        }
        .into_any(),
    }
}

#[component]
fn DashboardContent(session: Session) -> impl IntoView {
    let auth = use_auth();
    let navigate = StoredValue::new_local(use_navigate());

    let on_logout = Callback::new(move |_: MouseEvent| {
        let confirmed = window()
            .confirm_with_message("Are you sure you want to logout?")
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        // Leave first, so that the guard does not send us to the auth page once the session is gone.
        navigate.with_value(|navigate| navigate(AppRoute::Landing.path(), NavigateOptions::default()));
        spawn_local(async move { auth.sign_out().await });
    });

    let user = session.user;
    let name = user.greeting_name().to_owned();
    let member_since = user.member_since();

    view! {
        <div class="min-h-screen bg-gray-50">
            <nav class="bg-white shadow-sm border-b">
                <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                    <div class="flex justify-between items-center h-16">
                        <a href=AppRoute::Landing.path() class="text-xl font-bold text-blue-600 hover:text-blue-700">
                            "Leptos Foundation"
                        </a>
                        <div class="flex items-center space-x-4">
                            <span class="text-sm text-gray-700">{format!("Welcome, {name}")}</span>
                            <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on_click=on_logout>
                                "Logout"
                            </Button>
                        </div>
                    </div>
                </div>
            </nav>

            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <div class="mb-8">
                    <h1 class="text-2xl font-bold text-gray-900">"Dashboard"</h1>
                    <p class="mt-1 text-sm text-gray-600">
                        "Welcome back! Here's what's happening with your account."
                    </p>
                </div>

                <div class="bg-white shadow rounded-lg mb-8">
                    <div class="px-4 py-5 sm:p-6">
                        <h3 class="text-lg leading-6 font-medium text-gray-900 mb-4">"Profile Information"</h3>
                        <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                            <div class="flex items-center space-x-4">
                                <div class="h-16 w-16 rounded-full bg-gray-300 flex items-center justify-center">
                                    <svg class="h-8 w-8 text-gray-500" fill="currentColor" viewBox="0 0 24 24">
                                        <path d="M24 20.993V24H0v-2.996A14.977 14.977 0 0112.004 15c4.904 0 9.26 2.354 11.996 5.993zM16.002 8.999a4 4 0 11-8 0 4 4 0 018 0z"/>
                                    </svg>
                                </div>
                                <div>
                                    <h4 class="text-lg font-medium text-gray-900">{name.clone()}</h4>
                                    <p class="text-sm text-gray-500">{user.email.clone()}</p>
                                </div>
                            </div>
                            <dl class="space-y-3">
                                <div>
                                    <dt class="text-sm font-medium text-gray-500">"Member since"</dt>
                                    <dd class="mt-1 text-sm text-gray-900">{member_since}</dd>
                                </div>
                                <div>
                                    <dt class="text-sm font-medium text-gray-500">"Account status"</dt>
                                    <dd class="mt-1">
                                        <span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-green-100 text-green-800">
                                            "Active"
                                        </span>
                                    </dd>
                                </div>
                            </dl>
                        </div>
                    </div>
                </div>
            </div>

            <Footer/>
        </div>
    }
}
