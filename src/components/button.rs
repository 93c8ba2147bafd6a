use leptos::ev::MouseEvent;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Ghost,
}

impl ButtonVariant {
    fn classes(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "bg-blue-600 text-white hover:bg-blue-700 focus:ring-blue-500",
            ButtonVariant::Secondary => {
                "bg-gray-200 text-gray-900 hover:bg-gray-300 focus:ring-gray-500"
            }
            ButtonVariant::Outline => {
                "border border-gray-300 bg-white text-gray-700 hover:bg-gray-50 focus:ring-blue-500"
            }
            ButtonVariant::Ghost => "text-gray-700 hover:bg-gray-100 focus:ring-gray-500",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl ButtonSize {
    fn classes(self) -> &'static str {
        match self {
            ButtonSize::Sm => "px-3 py-1.5 text-sm",
            ButtonSize::Md => "px-4 py-2 text-sm",
            ButtonSize::Lg => "px-6 py-3 text-base",
        }
    }
}

/// A button, or a link styled as one when `href` is given.
///
/// While `loading`, a spinner is shown in front of the children and the button is disabled.
#[component]
pub fn Button(
    children: Children,
    #[prop(optional)] variant: ButtonVariant,
    #[prop(optional)] size: ButtonSize,
    #[prop(optional, into)] disabled: Signal<bool>,
    #[prop(optional, into)] loading: Signal<bool>,
    /// HTML button type. Defaults to "button".
    #[prop(optional, into)]
    button_type: Option<&'static str>,
    #[prop(optional, into)] href: Option<String>,
    #[prop(optional, into)] class: String,
    #[prop(optional, into)] on_click: Option<Callback<MouseEvent>>,
) -> impl IntoView {
    let classes = format!(
        "inline-flex items-center justify-center rounded-md font-medium transition-colors focus:outline-none focus:ring-2 focus:ring-offset-2 disabled:opacity-50 disabled:cursor-not-allowed {} {} {class}",
        variant.classes(),
        size.classes(),
    );

    if let Some(href) = href {
        return view! {
            <a href=href class=classes>
                {children()}
            </a>
        }
        .into_any();
    }

    view! {
        <button
            type=button_type.unwrap_or("button")
            class=classes
            disabled=move || disabled.get() || loading.get()
            on:click=move |ev| {
                if let Some(on_click) = on_click {
                    on_click.run(ev);
                }
            }
        >
            <Show when=move || loading.get()>
                <span class="mr-2 h-4 w-4 animate-spin rounded-full border-2 border-current border-t-transparent"></span>
            </Show>
            {children()}
        </button>
    }
    .into_any()
}
