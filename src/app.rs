use std::sync::Arc;

use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use futures_util::StreamExt;
use tracing::{error, info};

use crate::{
    domain::{Command, Session, SessionEvent, Settle},
    infra::{GeminiClient, QuoteProvider, UnconfiguredProvider},
    ui::{
        components::toast::{push_toast, Toast, ToastKind, ToastMessage},
        pages::{QuotePage, SettingsPage},
        shell::Shell,
    },
    util::{assets, config::AppConfig, debounce::Debouncer},
};

#[derive(Routable, Clone, PartialEq)]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/settings")]
    Settings {},
}

/// Runs the session reducer and executes the commands it returns.
///
/// Cheap to copy; every field is a signal handle owned by the root scope.
#[derive(Clone, Copy)]
pub struct QuoteController {
    session: Signal<Session>,
    debouncer: Signal<Option<Debouncer<Settle>>>,
    provider: Signal<Arc<dyn QuoteProvider>>,
}

impl QuoteController {
    pub fn session(&self) -> Signal<Session> {
        self.session
    }

    pub fn dispatch(mut self, event: SessionEvent) {
        let commands = self.session.with_mut(|session| session.apply(event));
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(mut self, command: Command) {
        match command {
            Command::IssueRequest(request) => {
                let provider = Arc::clone(&*self.provider.peek());
                // Handlers in child scopes dispatch too; the request must outlive them.
                spawn_forever(async move {
                    let event = match provider.request_quote(&request).await {
                        Ok(quote) => SessionEvent::RequestSucceeded {
                            token: request.token,
                            quote,
                        },
                        Err(err) => SessionEvent::RequestFailed {
                            token: request.token,
                            message: err.user_message().to_string(),
                        },
                    };
                    self.dispatch(event);
                });
            }
            Command::ScheduleSettle(settle) => self.debouncer.with_mut(|debouncer| {
                if let Some(debouncer) = debouncer {
                    debouncer.push(settle);
                }
            }),
            Command::CancelSettle => self.debouncer.with_mut(|debouncer| {
                if let Some(debouncer) = debouncer {
                    debouncer.cancel();
                }
            }),
        }
    }
}

fn build_provider(config: &AppConfig) -> Arc<dyn QuoteProvider> {
    if !config.has_api_key() {
        error!("no API key configured; quotes will fail until GEMINI_API_KEY is set");
        return Arc::new(UnconfiguredProvider);
    }
    match GeminiClient::new(config) {
        Ok(client) => {
            info!(model = %config.model, base_url = %config.base_url, "Gemini client ready");
            Arc::new(client)
        }
        Err(err) => {
            error!("failed to initialise Gemini client: {err}");
            Arc::new(UnconfiguredProvider)
        }
    }
}

fn use_quote_controller(config: &AppConfig) -> QuoteController {
    let session = use_signal(Session::default);
    let debouncer = use_signal(|| None::<Debouncer<Settle>>);
    let provider = use_signal(|| build_provider(config));
    let controller = QuoteController {
        session,
        debouncer,
        provider,
    };

    let settled = use_coroutine(move |mut rx: UnboundedReceiver<Settle>| async move {
        // Settles queued before a file change are dropped by the session.
        while let Some(settle) = rx.next().await {
            controller.dispatch(SessionEvent::DebouncedOptionsSettled(settle));
        }
    });

    let delay = config.debounce();
    use_hook(move || {
        let mut debouncer = debouncer;
        let tx = settled.tx();
        debouncer.set(Some(Debouncer::new(delay, move |settle| {
            let _ = tx.unbounded_send(settle);
        })));
    });

    controller
}

#[component]
pub fn App() -> Element {
    let config = use_hook(AppConfig::load);
    use_context_provider(|| config.clone());

    let toasts = use_signal(Vec::<ToastMessage>::new);
    use_context_provider(|| toasts);

    let controller = use_quote_controller(&config);
    use_context_provider(|| controller);

    use_hook({
        let has_key = config.has_api_key();
        move || {
            if !has_key {
                push_toast(
                    toasts,
                    ToastKind::Warning,
                    "No API key configured. Set GEMINI_API_KEY to enable quotes.",
                );
            }
        }
    });

    rsx! {
        document::Link { rel: "icon", href: assets::favicon_data_uri() }
        document::Style { "{assets::main_css()}" }
        Router::<Route> {}
        Toast {}
    }
}

#[component]
pub fn Home() -> Element {
    rsx! { Shell { QuotePage {} } }
}

#[component]
pub fn Settings() -> Element {
    rsx! { Shell { SettingsPage {} } }
}
