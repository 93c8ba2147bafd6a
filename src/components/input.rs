use leptos::prelude::*;

/// A labelled text input bound to `value`.
///
/// `error` takes precedence over `helper_text`. Both are optional.
#[component]
pub fn Input(
    #[prop(into)] label: String,
    #[prop(into)] name: String,
    #[prop(optional, into)] input_type: Option<&'static str>,
    #[prop(optional, into)] placeholder: String,
    #[prop(optional)] required: bool,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(optional, into)] error: Signal<Option<String>>,
    #[prop(optional, into)] helper_text: Signal<Option<String>>,
) -> impl IntoView {
    let has_error = move || error.read().is_some();

    view! {
        <div class="w-full">
            <label for=name.clone() class="block text-sm font-medium text-gray-700 mb-1">
                {label}
            </label>
            <input
                type=input_type.unwrap_or("text")
                id=name.clone()
                name=name
                placeholder=placeholder
                required=required
                prop:value=move || value.get()
                on:input=move |ev| on_input.run(event_target_value(&ev))
                class=move || format!(
                    "block w-full rounded-md border px-3 py-2 shadow-sm focus:outline-none focus:ring-2 sm:text-sm {}",
                    if has_error() {
                        "border-red-300 text-red-900 focus:border-red-500 focus:ring-red-500"
                    } else {
                        "border-gray-300 focus:border-blue-500 focus:ring-blue-500"
                    },
                )
            />
            {move || match (error.get(), helper_text.get()) {
                (Some(error), _) => Some(view! { <p class="mt-1 text-sm text-red-600">{error}</p> }.into_any()),
                (None, Some(helper)) => Some(view! { <p class="mt-1 text-sm text-gray-500">{helper}</p> }.into_any()),
                (None, None) => None,
            }}
        </div>
    }
}
