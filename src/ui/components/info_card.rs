use dioxus::prelude::*;

#[component]
pub fn InfoCard(title: String, value: String) -> Element {
    rsx! {
        div { class: "info-card",
            h4 { "{title}" }
            p { "{value}" }
        }
    }
}
