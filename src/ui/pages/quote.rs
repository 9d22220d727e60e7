use dioxus::prelude::*;

use crate::{
    app::QuoteController,
    domain::LoadingView,
    ui::components::{
        error_banner::ErrorBanner, file_upload::FileUpload, loader::Loader,
        quote_display::QuoteDisplay, quote_form::QuoteCustomization,
    },
};

#[component]
pub fn QuotePage() -> Element {
    let controller = use_context::<QuoteController>();
    let session = controller.session();

    let (file, options, quote, error, loading_view, upload_disabled) = session.with(|s| {
        (
            s.file().cloned(),
            s.current_options().clone(),
            s.latest_quote().cloned(),
            s.error().map(str::to_string),
            s.loading_view(),
            s.upload_disabled(),
        )
    });
    let has_file = file.is_some();

    rsx! {
        div { class: "stack",
            header { class: "hero",
                h1 { "AI Machinist Quote Generator" }
                p { "Get an instant, AI-powered manufacturing estimate for your 3D models." }
            }

            FileUpload { file, disabled: upload_disabled }

            if has_file {
                QuoteCustomization { options }

                if loading_view == LoadingView::FullPage {
                    Loader {
                        message: "Our AI is analyzing your file and preparing a detailed quote. This may take a moment."
                            .to_string(),
                    }
                }

                if let Some(message) = error {
                    ErrorBanner { message }
                }

                if let Some(quote) = quote {
                    QuoteDisplay { quote, refreshing: loading_view == LoadingView::Overlay }
                }
            } else {
                HowItWorks {}
            }
        }
    }
}

#[component]
fn HowItWorks() -> Element {
    let steps = [
        (
            "1. Upload Your CAD",
            "Select your design file to get an initial quote.",
        ),
        (
            "2. Customize Options",
            "Adjust quantity, material, finish, and lead time to see how they affect the price.",
        ),
        (
            "3. Instant Quote",
            "Your quote updates automatically, showing a detailed cost breakdown.",
        ),
    ];

    rsx! {
        div { class: "how-it-works",
            h3 { "How It Works" }
            div { class: "steps",
                for (title, text) in steps {
                    div { class: "step",
                        p { class: "step-title", "{title}" }
                        p { class: "step-text", "{text}" }
                    }
                }
            }
        }
    }
}
