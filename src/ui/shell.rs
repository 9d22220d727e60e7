use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::app::Route;
use crate::ui::theme;
use crate::util::version::{version_label, APP_NAME};

#[component]
pub fn Shell(children: Element) -> Element {
    let current_route = use_route::<Route>();
    let nav = use_navigator();
    let year = OffsetDateTime::now_utc().year();

    rsx! {
        div { class: "app",
            header { class: "header",
                h1 { class: "header-title", "{APP_NAME}" }
                nav { class: "nav",
                    NavButton {
                        active: matches!(current_route, Route::Home {}),
                        onclick: move |_| { nav.push(Route::Home {}); },
                        label: "Quote",
                    }
                    NavButton {
                        active: matches!(current_route, Route::Settings {}),
                        onclick: move |_| { nav.push(Route::Settings {}); },
                        label: "Settings",
                    }
                }
            }
            main { class: "main", {children} }
            footer { class: "footer",
                p { "© {year} AI Machinist Quote. All Rights Reserved. {version_label()}" }
            }
        }
    }
}

#[component]
fn NavButton(active: bool, onclick: EventHandler<()>, label: &'static str) -> Element {
    rsx! {
        button {
            class: theme::nav_button(active),
            onclick: move |_| onclick.call(()),
            "{label}"
        }
    }
}
