use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};
use leptos_router::NavigateOptions;

use crate::components::{Alert, AlertVariant, Button, ButtonSize, ButtonVariant, Input};
use crate::form::AuthForm;
use crate::guard::{guard_auth_page, GuardDecision};
use crate::routes::AppRoute;
use crate::use_auth;
use crate::validation::{AuthMode, FormField, MIN_PASSWORD_LENGTH};

#[component]
pub fn AuthPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| guard_auth_page(&auth.state.get()));
    Effect::new(move |_| {
        if let GuardDecision::Redirect(route) = decision.get() {
            tracing::debug!(to = route.path(), "Already signed in");
            navigate(route.path(), NavigateOptions::default());
        }
    });

    // `/auth?mode=signup` opens the sign-up form right away.
    let initial_mode = match use_query_map().read_untracked().get("mode").as_deref() {
        Some("signup") => AuthMode::SignUp,
        _ => AuthMode::SignIn,
    };

    view! {
        <Show when=move || decision.get() == GuardDecision::Render>
            <AuthFormCard initial_mode=initial_mode/>
        </Show>
    }
}

#[component]
fn AuthFormCard(initial_mode: AuthMode) -> impl IntoView {
    let auth = use_auth();
    let form = RwSignal::new(AuthForm::new(initial_mode));

    let mode = Memo::new(move |_| form.read().mode);
    let is_sign_up = move || mode.get() == AuthMode::SignUp;
    let busy = Signal::derive(move || form.read().busy);

    let value = move |field: FormField| {
        Signal::derive(move || form.read().data.get(field).to_owned())
    };
    let error = move |field: FormField| {
        Signal::derive(move || form.read().error(field).map(str::to_owned))
    };
    let on_input = move |field: FormField| {
        Callback::new(move |new_value: String| {
            form.update(|it| it.update_field(field, new_value));
            if auth.last_error.read_untracked().is_some() {
                auth.clear_error();
            }
        })
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(request) = form.try_update(AuthForm::prepare_submit).flatten() else {
            return;
        };
        spawn_local(async move {
            // Navigation follows from the session change, see `guard_auth_page`.
            let result = auth.execute(&request).await;
            form.try_update(|it| it.finish_submit(&result));
        });
    };

    let on_forgot_password = move |_: MouseEvent| {
        let Some(email) = form.try_update(AuthForm::prepare_password_reset).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = auth.reset_password(&email).await;
            form.try_update(|it| it.finish_password_reset(&result));
        });
    };

    let on_google = Callback::new(move |_: MouseEvent| {
        if !form.try_update(AuthForm::begin_social_sign_in).unwrap_or(false) {
            return;
        }
        auth.clear_error();
        spawn_local(async move {
            let _ = auth.sign_in_with_google().await;
            form.try_update(AuthForm::finish_social_sign_in);
        });
    });

    let set_mode = move |mode: AuthMode| move |_: MouseEvent| form.update(|it| it.set_mode(mode));

    view! {
        <div class="min-h-screen flex flex-col justify-center py-12 sm:px-6 lg:px-8 bg-gray-50">
            <div class="sm:mx-auto sm:w-full sm:max-w-md">
                <div class="text-center">
                    <a href=AppRoute::Landing.path() class="text-2xl font-bold text-blue-600 hover:text-blue-700">
                        "Leptos Foundation"
                    </a>
                </div>
                <h2 class="mt-6 text-center text-3xl font-bold text-gray-900">
                    {move || if is_sign_up() { "Create your account" } else { "Sign in to your account" }}
                </h2>
                <p class="mt-2 text-center text-sm text-gray-600">
                    <Show
                        when=is_sign_up
                        fallback=move || view! {
                            "Don't have an account? "
                            <button type="button" on:click=set_mode(AuthMode::SignUp) class="font-medium text-blue-600 hover:text-blue-500">
                                "Sign up"
                            </button>
                        }
                    >
                        "Already have an account? "
                        <button type="button" on:click=set_mode(AuthMode::SignIn) class="font-medium text-blue-600 hover:text-blue-500">
                            "Sign in"
                        </button>
                    </Show>
                </p>
            </div>

            <div class="mt-8 sm:mx-auto sm:w-full sm:max-w-md">
                <div class="bg-white py-8 px-4 shadow sm:rounded-lg sm:px-10">
                    {move || auth.last_error.get().map(|err| view! { <Alert message=err.to_string()/> })}
                    <Show when=move || form.read().reset_email_sent>
                        <Alert
                            variant=AlertVariant::Success
                            message="Password reset email sent! Check your inbox for instructions."
                        />
                    </Show>

                    <form class="space-y-6" on:submit=on_submit novalidate=true>
                        <Show when=is_sign_up>
                            <Input
                                label="Full name"
                                name=FormField::DisplayName.name()
                                placeholder="Enter your full name"
                                required=true
                                value=value(FormField::DisplayName)
                                on_input=on_input(FormField::DisplayName)
                                error=error(FormField::DisplayName)
                            />
                        </Show>

                        <Input
                            label="Email address"
                            name=FormField::Email.name()
                            input_type="email"
                            placeholder="Enter your email"
                            required=true
                            value=value(FormField::Email)
                            on_input=on_input(FormField::Email)
                            error=error(FormField::Email)
                        />

                        <Input
                            label="Password"
                            name=FormField::Password.name()
                            input_type="password"
                            placeholder="Enter your password"
                            required=true
                            value=value(FormField::Password)
                            on_input=on_input(FormField::Password)
                            error=error(FormField::Password)
                            helper_text=Signal::derive(move || {
                                is_sign_up().then(|| format!("Must be at least {MIN_PASSWORD_LENGTH} characters"))
                            })
                        />

                        <Show when=is_sign_up>
                            <Input
                                label="Confirm password"
                                name=FormField::ConfirmPassword.name()
                                input_type="password"
                                placeholder="Confirm your password"
                                required=true
                                value=value(FormField::ConfirmPassword)
                                on_input=on_input(FormField::ConfirmPassword)
                                error=error(FormField::ConfirmPassword)
                            />
                        </Show>

                        <Show when=move || !is_sign_up()>
                            <div class="flex items-center justify-between">
                                <div class="text-sm">
                                    <button
                                        type="button"
                                        on:click=on_forgot_password
                                        class="font-medium text-blue-600 hover:text-blue-500"
                                    >
                                        "Forgot your password?"
                                    </button>
                                </div>
                            </div>
                        </Show>

                        <Button button_type="submit" class="w-full" size=ButtonSize::Lg loading=busy>
                            {move || if is_sign_up() { "Create account" } else { "Sign in" }}
                        </Button>
                    </form>

                    <div class="mt-6">
                        <div class="relative">
                            <div class="absolute inset-0 flex items-center">
                                <div class="w-full border-t border-gray-300"></div>
                            </div>
                            <div class="relative flex justify-center text-sm">
                                <span class="px-2 bg-white text-gray-500">"Or"</span>
                            </div>
                        </div>

                        <div class="mt-6">
                            <Button variant=ButtonVariant::Outline class="w-full" disabled=busy on_click=on_google>
                                <GoogleIcon/>
                                "Continue with Google"
                            </Button>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn GoogleIcon() -> impl IntoView {
    view! {
        <svg class="w-5 h-5 mr-2" viewBox="0 0 24 24">
            <path fill="currentColor" d="M22.56 12.25c0-.78-.07-1.53-.2-2.25H12v4.26h5.92c-.26 1.37-1.04 2.53-2.21 3.31v2.77h3.57c2.08-1.92 3.28-4.74 3.28-8.09z"/>
            <path fill="currentColor" d="M12 23c2.97 0 5.46-.98 7.28-2.66l-3.57-2.77c-.98.66-2.23 1.06-3.71 1.06-2.86 0-5.29-1.93-6.16-4.53H2.18v2.84C3.99 20.53 7.7 23 12 23z"/>
            <path fill="currentColor" d="M5.84 14.09c-.22-.66-.35-1.36-.35-2.09s.13-1.43.35-2.09V7.07H2.18C1.43 8.55 1 10.22 1 12s.43 3.45 1.18 4.93l2.85-2.22.81-.62z"/>
            <path fill="currentColor" d="M12 5.38c1.62 0 3.06.56 4.21 1.64l3.15-3.15C17.45 2.09 14.97 1 12 1 7.7 1 3.99 3.47 2.18 7.07l3.66 2.84c.87-2.6 3.3-4.53 6.16-4.53z"/>
        </svg>
    }
}
