use dioxus::prelude::*;

use crate::util::{
    config::{config_file, AppConfig},
    version::version_label,
};

#[component]
pub fn SettingsPage() -> Element {
    let config = use_context::<AppConfig>();

    let config_path = config_file()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "unavailable".to_string());
    let api_key = if config.has_api_key() {
        "configured"
    } else {
        "missing (set GEMINI_API_KEY)"
    };

    let rows = vec![
        ("Model", config.model.clone()),
        ("Endpoint", config.base_url.clone()),
        ("API key", api_key.to_string()),
        ("Option debounce", format!("{} ms", config.debounce_ms)),
        ("Request timeout", format!("{} s", config.request_timeout().as_secs())),
        ("Config file", config_path),
        ("Version", version_label()),
    ];

    rsx! {
        div { class: "stack",
            section { class: "panel",
                div { class: "panel-body",
                    h2 { class: "section-title", "Quote Provider" }
                    ul { class: "settings-list",
                        for (label, value) in rows {
                            li { class: "settings-row",
                                span { "{label}" }
                                span { class: "value", "{value}" }
                            }
                        }
                    }
                    p { class: "hint",
                        "Settings are read at startup from the config file and environment variables (GEMINI_API_KEY, GEMINI_MODEL, GEMINI_BASE_URL, QUOTE_DEBOUNCE_MS, QUOTE_REQUEST_TIMEOUT_SECS)."
                    }
                }
            }
        }
    }
}
