//! Quote session state and the reducer that drives it.
//!
//! - Every state change goes through [`Session::apply`], keyed by [`SessionEvent`].
//! - Side effects are returned as [`Command`]s for the UI driver to execute.
//! - Debounced option values are tagged with the file epoch they were edited in;
//!   a settle from before the last file change is dropped.
//! - Provider results carry the [`RequestToken`] they were issued with; only the
//!   latest token is ever committed.

use std::fmt;

use tracing::{debug, info, warn};

use super::{cad_file::CadFile, options::QuoteOptions, quote::Quote};

/// Monotonic correlation id for provider requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A quote and the options it was priced for.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviousQuote {
    pub quote: Quote,
    pub options: QuoteOptions,
}

/// Options waiting out the debounce window, tagged with the file epoch they belong to.
#[derive(Clone, Debug, PartialEq)]
pub struct Settle {
    pub epoch: u64,
    pub options: QuoteOptions,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuoteRequest {
    pub token: RequestToken,
    pub file: CadFile,
    pub options: QuoteOptions,
    pub previous: Option<PreviousQuote>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    FileSelected(CadFile),
    FileCleared,
    OptionsChanged(QuoteOptions),
    DebouncedOptionsSettled(Settle),
    RequestSucceeded { token: RequestToken, quote: Quote },
    RequestFailed { token: RequestToken, message: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    IssueRequest(QuoteRequest),
    ScheduleSettle(Settle),
    CancelSettle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingQuote,
    Ready,
    Refreshing,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadingView {
    None,
    /// Nothing to show yet; the loader replaces the quote panel.
    FullPage,
    /// Loader drawn on top of the quote that is still displayed.
    Overlay,
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    file: Option<CadFile>,
    current_options: QuoteOptions,
    debounced_options: QuoteOptions,
    latest_quote: Option<Quote>,
    quoted_options: Option<QuoteOptions>,
    in_flight: Option<RequestToken>,
    error: Option<String>,
    issued: u64,
    /// Bumped whenever the file is selected or cleared.
    epoch: u64,
}

impl Session {
    pub fn file(&self) -> Option<&CadFile> {
        self.file.as_ref()
    }

    pub fn current_options(&self) -> &QuoteOptions {
        &self.current_options
    }

    pub fn debounced_options(&self) -> &QuoteOptions {
        &self.debounced_options
    }

    pub fn latest_quote(&self) -> Option<&Quote> {
        self.latest_quote.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> Phase {
        if self.file.is_none() {
            return Phase::Idle;
        }
        match (self.is_loading(), self.latest_quote.is_some(), self.error.is_some()) {
            (true, false, _) => Phase::AwaitingQuote,
            (true, true, _) => Phase::Refreshing,
            (false, _, true) => Phase::Failed,
            (false, true, false) => Phase::Ready,
            // Selecting a file always issues a request, so this is transient at most.
            (false, false, false) => Phase::AwaitingQuote,
        }
    }

    pub fn loading_view(&self) -> LoadingView {
        match self.phase() {
            Phase::AwaitingQuote if self.is_loading() => LoadingView::FullPage,
            Phase::Refreshing => LoadingView::Overlay,
            _ => LoadingView::None,
        }
    }

    /// The upload control stays usable once a quote exists.
    pub fn upload_disabled(&self) -> bool {
        self.is_loading() && self.latest_quote.is_none()
    }

    pub fn apply(&mut self, event: SessionEvent) -> Vec<Command> {
        match event {
            SessionEvent::FileSelected(file) => {
                info!(file = %file.name, size = file.size_bytes, "file selected");
                self.epoch += 1;
                self.file = Some(file.clone());
                self.latest_quote = None;
                self.quoted_options = None;
                self.error = None;
                self.debounced_options = self.current_options.clone();
                let request = self.issue(file, self.current_options.clone());
                vec![Command::CancelSettle, Command::IssueRequest(request)]
            }
            SessionEvent::FileCleared => {
                if let Some(token) = self.in_flight {
                    debug!(%token, "file cleared; pending response will be ignored");
                }
                self.epoch += 1;
                self.file = None;
                self.latest_quote = None;
                self.quoted_options = None;
                self.error = None;
                self.in_flight = None;
                self.debounced_options = self.current_options.clone();
                vec![Command::CancelSettle]
            }
            SessionEvent::OptionsChanged(options) => {
                let options = options.normalized();
                if self.file.is_none() {
                    self.current_options = options.clone();
                    self.debounced_options = options;
                    return Vec::new();
                }
                self.current_options = options.clone();
                vec![Command::ScheduleSettle(Settle {
                    epoch: self.epoch,
                    options,
                })]
            }
            SessionEvent::DebouncedOptionsSettled(settle) => {
                if settle.epoch != self.epoch {
                    debug!(
                        settle_epoch = settle.epoch,
                        epoch = self.epoch,
                        "dropping settle from before the last file change"
                    );
                    return Vec::new();
                }
                let options = settle.options.normalized();
                self.debounced_options = options.clone();
                let Some(file) = self.file.clone() else {
                    return Vec::new();
                };
                vec![Command::IssueRequest(self.issue(file, options))]
            }
            SessionEvent::RequestSucceeded { token, quote } => {
                if !self.is_current(token) {
                    debug!(%token, "dropping superseded quote");
                    return Vec::new();
                }
                info!(%token, part = %quote.part_name, total = quote.total_cost, "quote received");
                self.latest_quote = Some(quote);
                self.quoted_options = Some(self.debounced_options.clone());
                self.error = None;
                self.in_flight = None;
                Vec::new()
            }
            SessionEvent::RequestFailed { token, message } => {
                if !self.is_current(token) {
                    debug!(%token, "dropping superseded failure");
                    return Vec::new();
                }
                warn!(%token, %message, "quote request failed");
                self.error = Some(message);
                self.in_flight = None;
                Vec::new()
            }
        }
    }

    fn is_current(&self, token: RequestToken) -> bool {
        self.file.is_some() && self.in_flight == Some(token)
    }

    fn issue(&mut self, file: CadFile, options: QuoteOptions) -> QuoteRequest {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.in_flight = Some(token);
        self.error = None;

        let previous = match (&self.latest_quote, &self.quoted_options) {
            (Some(quote), Some(quoted)) => Some(PreviousQuote {
                quote: quote.clone(),
                options: quoted.clone(),
            }),
            _ => None,
        };

        info!(%token, file = %file.name, refresh = previous.is_some(), "issuing quote request");

        QuoteRequest {
            token,
            file,
            options,
            previous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{options::Material, quote::sample_quote};

    fn part(name: &str) -> CadFile {
        CadFile::new(name, 4096, format!("/parts/{name}"))
    }

    fn settled(session: &Session, options: QuoteOptions) -> SessionEvent {
        SessionEvent::DebouncedOptionsSettled(Settle {
            epoch: session.epoch,
            options,
        })
    }

    fn requests(commands: &[Command]) -> Vec<&QuoteRequest> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::IssueRequest(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn single_request(commands: Vec<Command>) -> QuoteRequest {
        let found = requests(&commands);
        assert_eq!(found.len(), 1, "expected one request in {commands:?}");
        found[0].clone()
    }

    fn ready_session(quote: Quote) -> (Session, QuoteRequest) {
        let mut session = Session::default();
        let request = single_request(session.apply(SessionEvent::FileSelected(part("a.stl"))));
        session.apply(SessionEvent::RequestSucceeded {
            token: request.token,
            quote,
        });
        (session, request)
    }

    #[test]
    fn starts_idle() {
        let session = Session::default();
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.loading_view(), LoadingView::None);
    }

    #[test]
    fn selecting_a_file_issues_one_fresh_request() {
        let mut session = Session::default();
        let commands = session.apply(SessionEvent::FileSelected(part("a.stl")));
        let request = single_request(commands.clone());
        assert!(commands.contains(&Command::CancelSettle));
        assert_eq!(request.options, QuoteOptions::default());
        assert_eq!(request.previous, None);
        assert_eq!(session.phase(), Phase::AwaitingQuote);
        assert_eq!(session.loading_view(), LoadingView::FullPage);
        assert!(session.upload_disabled());
    }

    #[test]
    fn stub_quote_is_displayed_as_returned() {
        let q1 = sample_quote("Bracket", 412.5);
        let (session, _) = ready_session(q1.clone());
        assert_eq!(session.phase(), Phase::Ready);
        let shown = session.latest_quote().unwrap();
        assert_eq!(shown.total_cost, q1.total_cost);
        assert_eq!(shown.cost_breakdown.len(), q1.cost_breakdown.len());
        assert_eq!(session.error(), None);
    }

    #[test]
    fn option_edits_wait_for_settlement() {
        let (mut session, _) = ready_session(sample_quote("Bracket", 100.0));
        let edited = session.current_options().with_quantity_input("10");
        let commands = session.apply(SessionEvent::OptionsChanged(edited.clone()));
        assert_eq!(
            commands,
            vec![Command::ScheduleSettle(Settle {
                epoch: session.epoch,
                options: edited,
            })]
        );
        assert_eq!(session.phase(), Phase::Ready);
        assert!(session.latest_quote().is_some());
    }

    #[test]
    fn settled_options_request_with_previous_quote() {
        let q1 = sample_quote("Bracket", 100.0);
        let (mut session, _) = ready_session(q1.clone());
        let edited = session.current_options().with_quantity_input("10");
        session.apply(SessionEvent::OptionsChanged(edited.clone()));

        let request = single_request(session.apply(settled(&session, edited.clone())));
        let previous = request.previous.clone().unwrap();
        assert_eq!(previous.quote, q1);
        assert_eq!(previous.options, QuoteOptions::default());
        assert_eq!(request.options.quantity, 10);
        assert_eq!(session.phase(), Phase::Refreshing);
        assert_eq!(session.loading_view(), LoadingView::Overlay);
        assert!(!session.upload_disabled());

        let q2 = sample_quote("Bracket", 61.0);
        session.apply(SessionEvent::RequestSucceeded {
            token: request.token,
            quote: q2.clone(),
        });
        assert_eq!(session.phase(), Phase::Ready);
        assert_eq!(session.latest_quote(), Some(&q2));
        assert_eq!(session.error(), None);
    }

    #[test]
    fn failure_keeps_previous_quote() {
        let q1 = sample_quote("Bracket", 100.0);
        let (mut session, _) = ready_session(q1.clone());
        let edited = session.current_options().with_material(Material::TitaniumGrade5);
        let request = single_request(session.apply(settled(&session, edited)));
        session.apply(SessionEvent::RequestFailed {
            token: request.token,
            message: "model unavailable".into(),
        });
        assert_eq!(session.phase(), Phase::Failed);
        assert_eq!(session.error(), Some("model unavailable"));
        assert_eq!(session.latest_quote(), Some(&q1));
    }

    #[test]
    fn next_settlement_retries_after_failure() {
        let mut session = Session::default();
        let first = single_request(session.apply(SessionEvent::FileSelected(part("a.stl"))));
        session.apply(SessionEvent::RequestFailed {
            token: first.token,
            message: "boom".into(),
        });
        assert_eq!(session.phase(), Phase::Failed);

        let retry = single_request(
            session.apply(settled(&session, QuoteOptions::default())),
        );
        assert!(retry.token > first.token);
        assert_eq!(retry.previous, None);
        assert_eq!(session.error(), None);
        assert_eq!(session.phase(), Phase::AwaitingQuote);
    }

    #[test]
    fn superseded_response_is_ignored() {
        let (mut session, _) = ready_session(sample_quote("Bracket", 100.0));
        let slow = single_request(
            session.apply(settled(&session, QuoteOptions::default().with_quantity_input("5"))),
        );
        let fast = single_request(
            session.apply(settled(&session, QuoteOptions::default().with_quantity_input("50"))),
        );

        let newest = sample_quote("Bracket", 20.0);
        session.apply(SessionEvent::RequestSucceeded {
            token: fast.token,
            quote: newest.clone(),
        });
        session.apply(SessionEvent::RequestSucceeded {
            token: slow.token,
            quote: sample_quote("Bracket", 80.0),
        });
        assert_eq!(session.latest_quote(), Some(&newest));

        session.apply(SessionEvent::RequestFailed {
            token: slow.token,
            message: "late".into(),
        });
        assert_eq!(session.error(), None);
        assert_eq!(session.phase(), Phase::Ready);
    }

    #[test]
    fn response_for_replaced_file_is_dropped() {
        let mut session = Session::default();
        let for_a = single_request(session.apply(SessionEvent::FileSelected(part("a.stl"))));
        let for_b = single_request(session.apply(SessionEvent::FileSelected(part("b.step"))));
        assert_eq!(for_b.file.name, "b.step");

        session.apply(SessionEvent::RequestSucceeded {
            token: for_a.token,
            quote: sample_quote("A", 10.0),
        });
        assert_eq!(session.latest_quote(), None);
        assert_eq!(session.phase(), Phase::AwaitingQuote);
    }

    #[test]
    fn reselecting_same_file_issues_a_new_token() {
        let mut session = Session::default();
        let first = single_request(session.apply(SessionEvent::FileSelected(part("a.stl"))));
        let second = single_request(session.apply(SessionEvent::FileSelected(part("a.stl"))));
        assert_ne!(first.token, second.token);

        session.apply(SessionEvent::RequestSucceeded {
            token: first.token,
            quote: sample_quote("stale", 1.0),
        });
        assert_eq!(session.latest_quote(), None);
        session.apply(SessionEvent::RequestSucceeded {
            token: second.token,
            quote: sample_quote("fresh", 2.0),
        });
        assert_eq!(session.latest_quote().unwrap().part_name, "fresh");
    }

    #[test]
    fn clearing_file_discards_late_response() {
        let mut session = Session::default();
        let request = single_request(session.apply(SessionEvent::FileSelected(part("a.stl"))));
        let commands = session.apply(SessionEvent::FileCleared);
        assert_eq!(commands, vec![Command::CancelSettle]);
        assert_eq!(session.phase(), Phase::Idle);

        session.apply(SessionEvent::RequestSucceeded {
            token: request.token,
            quote: sample_quote("A", 10.0),
        });
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.latest_quote(), None);
        assert!(!session.is_loading());
    }

    #[test]
    fn new_file_clears_quote_and_error() {
        let (mut session, _) = ready_session(sample_quote("A", 10.0));
        let request = single_request(
            session.apply(settled(&session, QuoteOptions::default())),
        );
        session.apply(SessionEvent::RequestFailed {
            token: request.token,
            message: "nope".into(),
        });
        let fresh = single_request(session.apply(SessionEvent::FileSelected(part("b.stl"))));
        assert_eq!(fresh.previous, None);
        assert_eq!(session.latest_quote(), None);
        assert_eq!(session.error(), None);
    }

    #[test]
    fn zero_quantity_is_coerced_before_request() {
        let (mut session, _) = ready_session(sample_quote("A", 10.0));
        let bogus = QuoteOptions {
            quantity: 0,
            ..QuoteOptions::default()
        };
        session.apply(SessionEvent::OptionsChanged(bogus.clone()));
        assert_eq!(session.current_options().quantity, 1);
        let request = single_request(session.apply(settled(&session, bogus)));
        assert_eq!(request.options.quantity, 1);
    }

    #[test]
    fn options_without_file_do_not_request() {
        let mut session = Session::default();
        let edited = QuoteOptions::default().with_quantity_input("3");
        assert!(session.apply(SessionEvent::OptionsChanged(edited.clone())).is_empty());
        assert_eq!(session.debounced_options(), &edited);
        assert!(session
            .apply(settled(&session, edited.clone()))
            .is_empty());

        let request = single_request(session.apply(SessionEvent::FileSelected(part("a.stl"))));
        assert_eq!(request.options, edited);
    }

    fn scheduled(commands: Vec<Command>) -> Settle {
        match commands.as_slice() {
            [Command::ScheduleSettle(settle)] => settle.clone(),
            other => panic!("expected a single settle, got {other:?}"),
        }
    }

    #[test]
    fn options_stay_editable_while_refreshing() {
        let (mut session, _) = ready_session(sample_quote("Bracket", 100.0));
        let five = session.current_options().with_quantity_input("5");
        let settle = scheduled(session.apply(SessionEvent::OptionsChanged(five)));
        let first = single_request(session.apply(SessionEvent::DebouncedOptionsSettled(settle)));
        assert_eq!(session.phase(), Phase::Refreshing);

        let fifty = session.current_options().with_quantity_input("50");
        let settle = scheduled(session.apply(SessionEvent::OptionsChanged(fifty)));
        assert_eq!(session.current_options().quantity, 50);
        let second = single_request(session.apply(SessionEvent::DebouncedOptionsSettled(settle)));
        assert!(second.token > first.token);
        assert_eq!(second.options.quantity, 50);

        session.apply(SessionEvent::RequestSucceeded {
            token: first.token,
            quote: sample_quote("Bracket", 5.0),
        });
        assert_eq!(session.phase(), Phase::Refreshing);
        session.apply(SessionEvent::RequestSucceeded {
            token: second.token,
            quote: sample_quote("Bracket", 50.0),
        });
        assert_eq!(session.latest_quote().unwrap().total_cost, 50.0);
    }

    #[test]
    fn settle_from_before_file_change_is_dropped() {
        let (mut session, _) = ready_session(sample_quote("A", 10.0));
        let seven = session.current_options().with_quantity_input("7");
        let stale = scheduled(session.apply(SessionEvent::OptionsChanged(seven)));

        let fresh = single_request(session.apply(SessionEvent::FileSelected(part("b.step"))));
        assert!(session
            .apply(SessionEvent::DebouncedOptionsSettled(stale.clone()))
            .is_empty());
        assert_eq!(session.phase(), Phase::AwaitingQuote);

        session.apply(SessionEvent::RequestSucceeded {
            token: fresh.token,
            quote: sample_quote("B", 20.0),
        });
        assert_eq!(session.latest_quote().unwrap().part_name, "B");

        session.apply(SessionEvent::FileCleared);
        assert!(session
            .apply(SessionEvent::DebouncedOptionsSettled(stale))
            .is_empty());
    }

    mod debounced {
        use std::{
            sync::{Arc, Mutex},
            time::Duration,
        };

        use super::*;
        use crate::util::debounce::Debouncer;

        const DELAY: Duration = Duration::from_millis(750);

        async fn advance(duration: Duration) {
            tokio::time::sleep(duration).await;
            tokio::task::yield_now().await;
        }

        /// Feeds settle commands through a real debouncer and applies whatever settles.
        struct Harness {
            session: Session,
            debouncer: Debouncer<Settle>,
            settled: Arc<Mutex<Vec<Settle>>>,
            issued: Vec<QuoteRequest>,
        }

        impl Harness {
            fn new(session: Session) -> Self {
                let settled = Arc::new(Mutex::new(Vec::new()));
                let sink = Arc::clone(&settled);
                Self {
                    session,
                    debouncer: Debouncer::new(DELAY, move |settle| {
                        sink.lock().unwrap().push(settle)
                    }),
                    settled,
                    issued: Vec::new(),
                }
            }

            fn apply(&mut self, event: SessionEvent) {
                for command in self.session.apply(event) {
                    match command {
                        Command::IssueRequest(request) => self.issued.push(request),
                        Command::ScheduleSettle(settle) => self.debouncer.push(settle),
                        Command::CancelSettle => self.debouncer.cancel(),
                    }
                }
            }

            fn drain(&mut self) {
                let ready: Vec<Settle> = self.settled.lock().unwrap().drain(..).collect();
                for settle in ready {
                    self.apply(SessionEvent::DebouncedOptionsSettled(settle));
                }
            }
        }

        #[tokio::test(start_paused = true)]
        async fn rapid_edits_issue_one_request_with_last_value() {
            let (session, _) = ready_session(sample_quote("Bracket", 100.0));
            let mut harness = Harness::new(session);

            for quantity in ["2", "20", "200", "25"] {
                let edited = harness.session.current_options().with_quantity_input(quantity);
                harness.apply(SessionEvent::OptionsChanged(edited));
                advance(Duration::from_millis(300)).await;
                harness.drain();
            }
            assert!(harness.issued.is_empty());

            advance(DELAY).await;
            harness.drain();
            assert_eq!(harness.issued.len(), 1);
            assert_eq!(harness.issued[0].options.quantity, 25);
            assert!(harness.issued[0].previous.is_some());
        }

        #[tokio::test(start_paused = true)]
        async fn settle_fired_before_file_change_sends_nothing_extra() {
            let (session, _) = ready_session(sample_quote("A", 10.0));
            let mut harness = Harness::new(session);

            let edited = harness.session.current_options().with_quantity_input("4");
            harness.apply(SessionEvent::OptionsChanged(edited));
            advance(DELAY * 2).await;
            assert_eq!(harness.settled.lock().unwrap().len(), 1);

            harness.apply(SessionEvent::FileSelected(part("b.step")));
            harness.drain();
            assert_eq!(harness.issued.len(), 1);
            assert_eq!(harness.issued[0].file.name, "b.step");
            assert_eq!(harness.issued[0].options.quantity, 4);
        }
    }
}
