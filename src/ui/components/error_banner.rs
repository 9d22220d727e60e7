use dioxus::prelude::*;

#[component]
pub fn ErrorBanner(message: String) -> Element {
    rsx! {
        div { class: "error-banner",
            p { class: "error-title", "Oops! Something went wrong." }
            p { class: "error-detail", "{message}" }
        }
    }
}
