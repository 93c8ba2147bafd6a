use leptos::prelude::*;
use time::OffsetDateTime;

#[component]
pub fn Footer() -> impl IntoView {
    let current_year = OffsetDateTime::now_utc().year();

    view! {
        <footer class="bg-white border-t border-gray-200">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <div class="flex flex-col items-center justify-between space-y-4 sm:flex-row sm:space-y-0">
                    <p class="text-sm text-gray-500">{format!("© {current_year} Leptos Foundation")}</p>
                    <div class="flex items-center space-x-2 text-sm text-gray-500">
                        <span>"Powered by"</span>
                        <a
                            href="https://leptos.dev"
                            target="_blank"
                            rel="noopener noreferrer"
                            class="font-medium text-blue-600 hover:text-blue-700"
                        >
                            "Leptos"
                        </a>
                    </div>
                </div>
                <div class="mt-6 pt-6 border-t border-gray-100">
                    <div class="flex flex-col items-center justify-center space-y-2 text-xs text-gray-400">
                        <p>"A clean Leptos starter with Firebase authentication"</p>
                        <div class="flex items-center space-x-4">
                            <span>"Leptos"</span>
                            <span>"•"</span>
                            <span>"Axum"</span>
                            <span>"•"</span>
                            <span>"Firebase"</span>
                            <span>"•"</span>
                            <span>"Tailwind CSS"</span>
                        </div>
                    </div>
                </div>
            </div>
        </footer>
    }
}
