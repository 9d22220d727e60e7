use dioxus::prelude::*;

#[component]
pub fn Loader(message: String) -> Element {
    rsx! {
        div { class: "loader",
            div { class: "spinner" }
            h3 { "Analyzing Part..." }
            p { "{message}" }
        }
    }
}
