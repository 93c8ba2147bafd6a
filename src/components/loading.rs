use leptos::prelude::*;

use super::ButtonSize;

/// A centered spinner with an optional caption.
#[component]
pub fn LoadingIndicator(
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] text: Option<String>,
) -> impl IntoView {
    let spinner = match size {
        ButtonSize::Sm => "h-4 w-4",
        ButtonSize::Md => "h-8 w-8",
        ButtonSize::Lg => "h-12 w-12",
    };

    view! {
        <div class="flex flex-col items-center justify-center gap-3" role="status">
            <span class=format!("{spinner} animate-spin rounded-full border-2 border-blue-600 border-t-transparent")></span>
            {text.map(|text| view! { <p class="text-sm text-gray-600">{text}</p> })}
        </div>
    }
}
