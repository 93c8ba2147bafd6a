use leptos::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlertVariant {
    #[default]
    Error,
    Success,
}

#[component]
pub fn Alert(#[prop(into)] message: String, #[prop(optional)] variant: AlertVariant) -> impl IntoView {
    let classes = match variant {
        AlertVariant::Error => "bg-red-50 border-red-200 text-red-600",
        AlertVariant::Success => "bg-green-50 border-green-200 text-green-600",
    };

    view! {
        <div class=format!("mb-4 p-3 border text-sm rounded-md {classes}") role="alert">
            {message}
        </div>
    }
}
