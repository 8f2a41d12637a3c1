//! Search-as-you-type state machine.
//!
//! `SearchSession` owns the per-view search state and reacts to discrete
//! events (keystroke, timer fire, lookup completion, focus changes, keys).
//! It never sleeps or performs I/O; it returns the effects the driver has to
//! carry out. Every issued lookup carries a [`LookupTicket`] with the
//! generation it was created under, and a completion is applied only while
//! that generation and its query are still current.

use crate::{
    error::Result,
    models::SearchRecord,
    view::{SearchPhase, SearchSnapshot},
};
use auth_rbac::AccessDenial;
use config_engine::PortalConfig;
use std::time::Duration;
use tracing::debug;

/// Timing and presentation options for a search session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub blur_grace: Duration,
    pub show_results: bool,
    pub lookup_timeout: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            blur_grace: Duration::from_millis(200),
            show_results: true,
            lookup_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&PortalConfig> for SearchOptions {
    fn from(config: &PortalConfig) -> Self {
        Self {
            debounce: config.debounce(),
            blur_grace: config.blur_grace(),
            show_results: config.search.show_results,
            lookup_timeout: config.request_timeout(),
        }
    }
}

/// Identifies one issued lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKey {
    Escape,
    Enter,
}

#[derive(Debug)]
pub enum SearchEvent<R> {
    Input(String),
    DebounceElapsed { ticket: u64 },
    LookupCompleted {
        ticket: LookupTicket,
        outcome: Result<Vec<R>>,
    },
    Focus,
    Blur,
    BlurElapsed { ticket: u64 },
    Key(SearchKey),
    Select(usize),
    /// The search gate was re-evaluated, e.g. after a role switch
    GateChanged(Option<AccessDenial>),
    Unmount,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEffect<R> {
    ScheduleDebounce { ticket: u64, after: Duration },
    Lookup(LookupTicket),
    ScheduleBlur { ticket: u64, after: Duration },
    Selected(R),
    Notify(String),
}

#[derive(Debug)]
pub struct SearchSession<R> {
    options: SearchOptions,
    denial: Option<AccessDenial>,
    phase: SearchPhase,
    raw: String,
    debounced: String,
    results: Vec<R>,
    dropdown_visible: bool,
    notice: Option<String>,
    generation: u64,
    active: Option<LookupTicket>,
    /// Debounced text has been looked up (in flight or resolved)
    settled: bool,
    debounce_ticket: u64,
    debounce_pending: bool,
    blur_ticket: u64,
    unmounted: bool,
}

impl<R: SearchRecord> SearchSession<R> {
    /// `denial` is the search gate for the identity at mount time
    pub fn new(options: SearchOptions, denial: Option<AccessDenial>) -> Self {
        let (phase, notice) = match &denial {
            Some(denial) => (SearchPhase::Denied, Some(denial.to_string())),
            None => (SearchPhase::Idle, None),
        };
        Self {
            options,
            denial,
            phase,
            raw: String::new(),
            debounced: String::new(),
            results: Vec::new(),
            dropdown_visible: false,
            notice,
            generation: 0,
            active: None,
            settled: false,
            debounce_ticket: 0,
            debounce_pending: false,
            blur_ticket: 0,
            unmounted: false,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn active_lookup(&self) -> Option<&LookupTicket> {
        self.active.as_ref()
    }

    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    pub fn snapshot(&self) -> SearchSnapshot<R> {
        SearchSnapshot {
            phase: self.phase,
            raw_text: self.raw.clone(),
            debounced_text: self.debounced.clone(),
            results: self.results.clone(),
            loading: self.active.is_some(),
            dropdown_open: self.dropdown_visible
                && self.options.show_results
                && !self.raw.is_empty(),
            notice: self.notice.clone(),
            generation: self.generation,
        }
    }

    pub fn handle(&mut self, event: SearchEvent<R>) -> Vec<SearchEffect<R>> {
        if self.unmounted {
            return Vec::new();
        }

        match event {
            SearchEvent::Input(text) => self.on_input(text),
            SearchEvent::DebounceElapsed { ticket } => self.on_debounce(ticket),
            SearchEvent::LookupCompleted { ticket, outcome } => {
                self.on_completed(&ticket, outcome)
            }
            SearchEvent::Focus => {
                self.blur_ticket += 1;
                if !self.results.is_empty() {
                    self.dropdown_visible = true;
                }
                Vec::new()
            }
            SearchEvent::Blur => {
                self.blur_ticket += 1;
                vec![SearchEffect::ScheduleBlur {
                    ticket: self.blur_ticket,
                    after: self.options.blur_grace,
                }]
            }
            SearchEvent::BlurElapsed { ticket } => {
                if ticket == self.blur_ticket {
                    self.reset();
                }
                Vec::new()
            }
            SearchEvent::Key(SearchKey::Escape) => {
                self.reset();
                Vec::new()
            }
            SearchEvent::Key(SearchKey::Enter) => {
                if self.results.len() == 1 {
                    self.select(0)
                } else {
                    Vec::new()
                }
            }
            SearchEvent::Select(index) => self.select(index),
            SearchEvent::GateChanged(denial) => self.on_gate_changed(denial),
            SearchEvent::Unmount => {
                self.unmounted = true;
                self.generation += 1;
                self.debounce_ticket += 1;
                self.blur_ticket += 1;
                self.debounce_pending = false;
                self.active = None;
                Vec::new()
            }
        }
    }

    fn on_input(&mut self, text: String) -> Vec<SearchEffect<R>> {
        if text.is_empty() {
            self.reset();
            return Vec::new();
        }

        self.raw = text;
        self.debounce_ticket += 1;
        self.debounce_pending = true;
        if self.phase != SearchPhase::Denied {
            self.phase = SearchPhase::Pending;
        }
        vec![SearchEffect::ScheduleDebounce {
            ticket: self.debounce_ticket,
            after: self.options.debounce,
        }]
    }

    fn on_debounce(&mut self, ticket: u64) -> Vec<SearchEffect<R>> {
        if ticket != self.debounce_ticket || !self.debounce_pending {
            return Vec::new();
        }
        self.debounce_pending = false;

        if let Some(denial) = self.denial.clone() {
            self.debounced.clone_from(&self.raw);
            self.deny(&denial);
            return Vec::new();
        }

        if self.raw.trim().is_empty() {
            self.debounced.clone_from(&self.raw);
            self.abandon_lookup();
            self.results.clear();
            self.dropdown_visible = false;
            self.phase = SearchPhase::Idle;
            return Vec::new();
        }

        if self.settled && self.raw == self.debounced {
            // Settled back on the text already asked for
            self.phase = if self.active.is_some() {
                SearchPhase::Loading
            } else {
                SearchPhase::Resolved
            };
            return Vec::new();
        }

        self.debounced.clone_from(&self.raw);
        self.generation += 1;
        let ticket = LookupTicket {
            generation: self.generation,
            query: self.debounced.clone(),
        };
        self.active = Some(ticket.clone());
        self.settled = true;
        self.phase = SearchPhase::Loading;
        vec![SearchEffect::Lookup(ticket)]
    }

    fn on_completed(
        &mut self,
        ticket: &LookupTicket,
        outcome: Result<Vec<R>>,
    ) -> Vec<SearchEffect<R>> {
        let current = self.active.as_ref().is_some_and(|active| active == ticket)
            && ticket.generation == self.generation
            && ticket.query == self.debounced;
        if !current {
            debug!(
                generation = ticket.generation,
                current_generation = self.generation,
                "Dropping stale lookup response"
            );
            return Vec::new();
        }

        self.active = None;
        self.phase = if self.debounce_pending {
            SearchPhase::Pending
        } else {
            SearchPhase::Resolved
        };

        match outcome {
            Ok(records) => {
                self.results = records;
                self.notice = None;
                self.dropdown_visible = true;
                Vec::new()
            }
            Err(err) => {
                let notice = err.notice();
                self.results.clear();
                self.notice = Some(notice.clone());
                vec![SearchEffect::Notify(notice)]
            }
        }
    }

    fn on_gate_changed(&mut self, denial: Option<AccessDenial>) -> Vec<SearchEffect<R>> {
        self.denial = denial;
        match self.denial.clone() {
            Some(denial) => {
                self.deny(&denial);
                Vec::new()
            }
            None if self.phase == SearchPhase::Denied => {
                self.notice = None;
                self.settled = false;
                self.phase = SearchPhase::Idle;
                if self.raw.is_empty() {
                    return Vec::new();
                }
                self.on_input(self.raw.clone())
            }
            None => {
                self.notice = None;
                Vec::new()
            }
        }
    }

    fn select(&mut self, index: usize) -> Vec<SearchEffect<R>> {
        let Some(record) = self.results.get(index).cloned() else {
            return Vec::new();
        };
        self.reset();
        vec![SearchEffect::Selected(record)]
    }

    fn deny(&mut self, denial: &AccessDenial) {
        self.abandon_lookup();
        self.results.clear();
        self.dropdown_visible = false;
        self.notice = Some(denial.to_string());
        self.phase = SearchPhase::Denied;
    }

    fn abandon_lookup(&mut self) {
        if self.active.take().is_some() {
            self.generation += 1;
        }
        self.settled = false;
    }

    /// Back to Idle: clear text and results, hide dropdown, drop pending work
    pub fn reset(&mut self) {
        self.raw.clear();
        self.debounced.clear();
        self.results.clear();
        self.dropdown_visible = false;
        self.generation += 1;
        self.active = None;
        self.settled = false;
        self.debounce_ticket += 1;
        self.debounce_pending = false;
        (self.phase, self.notice) = match &self.denial {
            Some(denial) => (SearchPhase::Denied, Some(denial.to_string())),
            None => (SearchPhase::Idle, None),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::demo_patients;
    use crate::error::SearchError;
    use crate::models::Patient;

    fn session() -> SearchSession<Patient> {
        SearchSession::new(SearchOptions::default(), None)
    }

    fn debounce_ticket(effects: &[SearchEffect<Patient>]) -> u64 {
        match effects {
            [SearchEffect::ScheduleDebounce { ticket, .. }] => *ticket,
            other => panic!("expected a debounce, got {other:?}"),
        }
    }

    fn lookup(effects: Vec<SearchEffect<Patient>>) -> LookupTicket {
        match effects.as_slice() {
            [SearchEffect::Lookup(ticket)] => ticket.clone(),
            other => panic!("expected one lookup, got {other:?}"),
        }
    }

    /// Type `text` and let the debounce elapse
    fn settle(session: &mut SearchSession<Patient>, text: &str) -> Vec<SearchEffect<Patient>> {
        let ticket = debounce_ticket(&session.handle(SearchEvent::Input(text.to_string())));
        session.handle(SearchEvent::DebounceElapsed { ticket })
    }

    fn john() -> Vec<Patient> {
        demo_patients().into_iter().take(1).collect()
    }

    #[test]
    fn superseded_keystrokes_never_look_up() {
        let mut session = session();
        let first = debounce_ticket(&session.handle(SearchEvent::Input("a".into())));
        let second = debounce_ticket(&session.handle(SearchEvent::Input("ab".into())));
        let third = debounce_ticket(&session.handle(SearchEvent::Input("abc".into())));
        assert_eq!(session.phase(), SearchPhase::Pending);

        assert!(session.handle(SearchEvent::DebounceElapsed { ticket: first }).is_empty());
        assert!(session.handle(SearchEvent::DebounceElapsed { ticket: second }).is_empty());
        let ticket = lookup(session.handle(SearchEvent::DebounceElapsed { ticket: third }));
        assert_eq!(ticket.query, "abc");
        assert_eq!(session.phase(), SearchPhase::Loading);
    }

    #[test]
    fn late_response_for_older_query_is_dropped() {
        let mut session = session();
        let slow = lookup(settle(&mut session, "ab"));
        let fast = lookup(settle(&mut session, "abc"));
        assert_eq!(session.active_lookup(), Some(&fast));

        session.handle(SearchEvent::LookupCompleted {
            ticket: fast,
            outcome: Ok(john()),
        });
        session.handle(SearchEvent::LookupCompleted {
            ticket: slow,
            outcome: Ok(demo_patients()),
        });

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SearchPhase::Resolved);
        assert_eq!(snapshot.result_ids(), ["1"]);
        assert!(snapshot.dropdown_open);
    }

    #[test]
    fn failure_of_newest_lookup_resolves_while_older_is_outstanding() {
        let mut session = session();
        let _slow = lookup(settle(&mut session, "slow"));
        let crashed = lookup(settle(&mut session, "boom"));

        session.handle(SearchEvent::LookupCompleted {
            ticket: crashed,
            outcome: Err(SearchError::Network("lookup task failed: panicked".into())),
        });

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SearchPhase::Resolved);
        assert!(!snapshot.loading);
        assert!(snapshot.notice.is_some());
        assert_eq!(session.active_lookup(), None);
    }

    #[test]
    fn failure_resolves_empty_with_notice() {
        let mut session = session();
        let ticket = lookup(settle(&mut session, "john"));
        let effects = session.handle(SearchEvent::LookupCompleted {
            ticket,
            outcome: Err(SearchError::Network("connection reset".into())),
        });

        assert_eq!(
            effects,
            vec![SearchEffect::Notify(
                "Failed to search patients. Please try again.".to_string()
            )]
        );
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SearchPhase::Resolved);
        assert!(!snapshot.loading);
        assert!(snapshot.results.is_empty());
        assert!(snapshot.notice.is_some());
    }

    #[test]
    fn settling_on_same_text_does_not_repeat_lookup() {
        let mut session = session();
        let ticket = lookup(settle(&mut session, "john"));
        session.handle(SearchEvent::LookupCompleted {
            ticket,
            outcome: Ok(john()),
        });

        session.handle(SearchEvent::Input("joh".into()));
        assert!(settle(&mut session, "john").is_empty());
        assert_eq!(session.phase(), SearchPhase::Resolved);
        assert_eq!(session.snapshot().result_ids(), ["1"]);
    }

    #[test]
    fn denied_gate_never_looks_up() {
        let mut session: SearchSession<Patient> = SearchSession::new(
            SearchOptions::default(),
            Some(AccessDenial::InsufficientPermission {
                missing: Some("patient_search".into()),
            }),
        );
        assert!(settle(&mut session, "john").is_empty());

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SearchPhase::Denied);
        assert!(!snapshot.loading);
        assert!(!snapshot.dropdown_open);
        assert!(snapshot.results.is_empty());
    }

    #[test]
    fn revoked_gate_abandons_lookup_and_restored_gate_resumes() {
        let mut session = session();
        let ticket = lookup(settle(&mut session, "maria"));

        session.handle(SearchEvent::GateChanged(Some(AccessDenial::Unauthenticated)));
        session.handle(SearchEvent::LookupCompleted {
            ticket,
            outcome: Ok(demo_patients()),
        });
        assert_eq!(session.phase(), SearchPhase::Denied);
        assert!(session.snapshot().results.is_empty());

        let effects = session.handle(SearchEvent::GateChanged(None));
        let ticket = debounce_ticket(&effects);
        let ticket = lookup(session.handle(SearchEvent::DebounceElapsed { ticket }));
        assert_eq!(ticket.query, "maria");
    }

    #[test]
    fn enter_selects_sole_result_and_resets() {
        let mut session = session();
        let ticket = lookup(settle(&mut session, "ELG2024001"));
        session.handle(SearchEvent::LookupCompleted {
            ticket,
            outcome: Ok(john()),
        });

        let effects = session.handle(SearchEvent::Key(SearchKey::Enter));
        assert!(matches!(effects.as_slice(), [SearchEffect::Selected(p)] if p.id == "1"));
        assert_eq!(session.snapshot(), SearchSnapshot {
            generation: session.generation(),
            ..SearchSnapshot::default()
        });
    }

    #[test]
    fn enter_with_several_results_does_nothing() {
        let mut session = session();
        let ticket = lookup(settle(&mut session, "555"));
        session.handle(SearchEvent::LookupCompleted {
            ticket,
            outcome: Ok(demo_patients()),
        });
        assert!(session.handle(SearchEvent::Key(SearchKey::Enter)).is_empty());
        assert_eq!(session.phase(), SearchPhase::Resolved);
    }

    #[test]
    fn blur_resets_after_grace_unless_refocused() {
        let mut session = session();
        let ticket = lookup(settle(&mut session, "john"));
        session.handle(SearchEvent::LookupCompleted {
            ticket,
            outcome: Ok(john()),
        });

        let first = match session.handle(SearchEvent::Blur).as_slice() {
            [SearchEffect::ScheduleBlur { ticket, after }] => {
                assert_eq!(*after, Duration::from_millis(200));
                *ticket
            }
            other => panic!("expected blur timer, got {other:?}"),
        };
        session.handle(SearchEvent::Focus);
        session.handle(SearchEvent::BlurElapsed { ticket: first });
        assert_eq!(session.phase(), SearchPhase::Resolved);

        let second = match session.handle(SearchEvent::Blur).as_slice() {
            [SearchEffect::ScheduleBlur { ticket, .. }] => *ticket,
            other => panic!("expected blur timer, got {other:?}"),
        };
        session.handle(SearchEvent::BlurElapsed { ticket: second });
        assert_eq!(session.phase(), SearchPhase::Idle);
        assert!(session.snapshot().raw_text.is_empty());
    }

    #[test]
    fn focus_keeps_dropdown_open_with_results() {
        let mut session = session();
        let ticket = lookup(settle(&mut session, "john"));
        session.handle(SearchEvent::LookupCompleted {
            ticket,
            outcome: Ok(john()),
        });
        session.handle(SearchEvent::Input("john ".into()));
        assert!(session.snapshot().dropdown_open);
        session.handle(SearchEvent::Focus);
        assert!(session.snapshot().dropdown_open);
    }

    #[test]
    fn clearing_input_resets_immediately() {
        let mut session = session();
        lookup(settle(&mut session, "john"));
        session.handle(SearchEvent::Input(String::new()));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SearchPhase::Idle);
        assert!(!snapshot.loading);
    }

    #[test]
    fn unmount_ignores_everything_after() {
        let mut session = session();
        let ticket = lookup(settle(&mut session, "john"));
        session.handle(SearchEvent::Unmount);

        assert!(session
            .handle(SearchEvent::LookupCompleted {
                ticket,
                outcome: Ok(john()),
            })
            .is_empty());
        assert!(session.handle(SearchEvent::Input("x".into())).is_empty());
        assert!(session.is_unmounted());
        assert!(session.snapshot().results.is_empty());
    }

    #[test]
    fn options_follow_portal_config() {
        let mut config = PortalConfig::default();
        config.search.debounce_ms = 250;
        config.search.show_results = false;
        let options = SearchOptions::from(&config);
        assert_eq!(options.debounce, Duration::from_millis(250));
        assert_eq!(options.blur_grace, Duration::from_millis(200));
        assert!(!options.show_results);
    }
}
