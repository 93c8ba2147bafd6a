use leptos::prelude::*;

use crate::components::{
    Authenticated, Button, ButtonSize, ButtonVariant, Footer, Unauthenticated,
};
use crate::routes::AppRoute;
use crate::session::Session;

#[component]
pub fn Landing() -> impl IntoView {
    view! {
        <main class="min-h-screen bg-gray-50">
            <nav class="bg-white shadow-sm">
                <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 flex justify-between items-center h-16">
                    <span class="text-xl font-bold text-blue-600">"Leptos Foundation"</span>
                    <Unauthenticated>
                        <Button href=AppRoute::Auth.path() variant=ButtonVariant::Ghost size=ButtonSize::Sm>
                            "Sign in"
                        </Button>
                    </Unauthenticated>
                    <Authenticated children=move |_: Session| view! {
                        <Button href=AppRoute::Dashboard.path() variant=ButtonVariant::Ghost size=ButtonSize::Sm>
                            "Dashboard"
                        </Button>
                    }/>
                </div>
            </nav>
            <div class="relative overflow-hidden">
                <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-16 sm:py-24">
                    <div class="text-center">
                        <h1 class="text-4xl font-bold tracking-tight text-gray-900 sm:text-5xl md:text-6xl">
                            <span class="block">"Build faster with"</span>
                            <span class="block text-blue-600">"Leptos Foundation"</span>
                        </h1>
                        <p class="mt-6 max-w-md mx-auto text-base text-gray-500 sm:text-lg md:mt-8 md:text-xl md:max-w-3xl">
                            "The clean Leptos starter with Firebase authentication. "
                            "Skip the setup, start building your next great idea today."
                        </p>
                        <div class="mt-8 max-w-md mx-auto sm:flex sm:justify-center md:mt-12">
                            <div class="rounded-md shadow">
                                <Button href=AppRoute::Auth.path() size=ButtonSize::Lg class="w-full sm:w-auto">
                                    "Get Started"
                                </Button>
                            </div>
                            <div class="mt-3 sm:mt-0 sm:ml-3">
                                <Button
                                    href=AppRoute::Dashboard.path()
                                    variant=ButtonVariant::Outline
                                    size=ButtonSize::Lg
                                    class="w-full sm:w-auto"
                                >
                                    "View Dashboard"
                                </Button>
                            </div>
                        </div>
                    </div>
                </div>
            </div>

            <div class="py-16 bg-white">
                <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                    <div class="text-center">
                        <h2 class="text-3xl font-bold text-gray-900 sm:text-4xl">
                            "Everything you need to ship fast"
                        </h2>
                        <p class="mt-4 max-w-2xl mx-auto text-xl text-gray-500">
                            "Pre-configured with the best tools and patterns for modern web development"
                        </p>
                    </div>
                    <div class="mt-16 grid grid-cols-1 gap-8 md:grid-cols-3">
                        <FeatureCard
                            icon_path="M13 10V3L4 14h7v7l9-11h-7z"
                            title="Lightning Fast"
                            description="Server-side rendered with Leptos and hydrated into a reactive WebAssembly app"
                        />
                        <FeatureCard
                            icon_path="M9 12l2 2 4-4m6 2a9 9 0 11-18 0 9 9 0 0118 0z"
                            title="Auth Ready"
                            description="Firebase Authentication integrated with session persistence and protected routes"
                        />
                        <FeatureCard
                            icon_path="M12 18h.01M8 21h8a2 2 0 002-2V5a2 2 0 00-2-2H8a2 2 0 00-2 2v14a2 2 0 002 2z"
                            title="Mobile First"
                            description="Responsive design with Tailwind CSS, perfect on every device"
                        />
                    </div>
                </div>
            </div>

            <Footer/>
        </main>
    }
}

#[component]
fn FeatureCard(
    icon_path: &'static str,
    title: &'static str,
    description: &'static str,
) -> impl IntoView {
    view! {
        <div class="text-center">
            <div class="mx-auto h-12 w-12 flex items-center justify-center rounded-md bg-blue-500 text-white">
                <svg class="h-6 w-6" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d=icon_path/>
                </svg>
            </div>
            <h3 class="mt-4 text-lg font-medium text-gray-900">{title}</h3>
            <p class="mt-2 text-base text-gray-500">{description}</p>
        </div>
    }
}
