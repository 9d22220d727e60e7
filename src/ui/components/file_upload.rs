use dioxus::prelude::*;
use rfd::AsyncFileDialog;
use tracing::{error, warn};

use crate::{
    app::QuoteController,
    domain::{CadFile, SessionEvent, SUPPORTED_EXTENSIONS, SUPPORTED_FORMATS_LABEL},
    ui::{
        components::toast::{push_toast, ToastKind, ToastMessage},
        theme,
    },
    util::format::format_kb,
};

#[component]
pub fn FileUpload(file: Option<CadFile>, disabled: bool) -> Element {
    let controller = use_context::<QuoteController>();
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();

    let on_browse = move |_| {
        if disabled {
            return;
        }
        spawn(async move {
            let Some(handle) = AsyncFileDialog::new()
                .set_title("Select a CAD file")
                .add_filter("CAD files", &SUPPORTED_EXTENSIONS)
                .add_filter("All files", &["*"])
                .pick_file()
                .await
            else {
                return;
            };

            match CadFile::from_path(handle.path()) {
                Ok(file) => {
                    if !file.is_supported() {
                        warn!(file = %file.name, "selected file has an unsupported extension");
                        push_toast(
                            toasts,
                            ToastKind::Warning,
                            format!(
                                "{} is not a typical CAD format ({SUPPORTED_FORMATS_LABEL}); the estimate may be unreliable.",
                                file.name
                            ),
                        );
                    }
                    controller.dispatch(SessionEvent::FileSelected(file));
                }
                Err(err) => {
                    error!(path = %handle.path().display(), "failed to read selected file: {err}");
                    push_toast(
                        toasts,
                        ToastKind::Error,
                        format!("Could not read {}: {err}", handle.file_name()),
                    );
                }
            }
        });
    };

    let on_clear = move |_| controller.dispatch(SessionEvent::FileCleared);

    rsx! {
        div { class: "narrow",
            {match file {
                None => rsx! {
                    div {
                        class: theme::dropzone(disabled),
                        onclick: on_browse,
                        div { class: "icon-large", "⇪" }
                        p { class: "dropzone-title", "Select your CAD file" }
                        p { class: "hint", "Click to browse" }
                        p { class: "hint-small", "Supported formats: {SUPPORTED_FORMATS_LABEL}" }
                    }
                },
                Some(file) => rsx! {
                    div { class: "file-card",
                        button {
                            class: "close-btn",
                            aria_label: "Remove file",
                            onclick: on_clear,
                            "✕"
                        }
                        div { class: "icon-large", "📄" }
                        p { class: "file-name", "{file.name}" }
                        p { class: "hint", "{format_kb(file.size_bytes)}" }
                    }
                },
            }}
        }
    }
}
