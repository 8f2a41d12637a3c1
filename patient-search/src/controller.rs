use crate::{
    directory::RecordDirectory,
    error::{Result, SearchError},
    models::SearchRecord,
    session::{LookupTicket, SearchEffect, SearchEvent, SearchKey, SearchOptions, SearchSession},
    view::SearchSnapshot,
};
use auth_identity::Identity;
use auth_rbac::{can_search_patients, AccessDenial};
use logger_redacted::{redacted_debug, PiiRedactor};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::{self, JoinError, JoinSet};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Opens the details view for a record
pub trait DetailsNavigator: Send + Sync {
    fn open_details(&self, record_id: &str);
}

/// What happens when a result is chosen
pub enum SelectionHandler<R> {
    Callback(Arc<dyn Fn(&R) + Send + Sync>),
    Navigate(Arc<dyn DetailsNavigator>),
}

impl<R: SearchRecord> SelectionHandler<R> {
    pub fn callback(f: impl Fn(&R) + Send + Sync + 'static) -> Self {
        Self::Callback(Arc::new(f))
    }

    /// Caller callback when given, otherwise navigate to the details view
    pub fn or_navigate(
        callback: Option<Arc<dyn Fn(&R) + Send + Sync>>,
        navigator: Arc<dyn DetailsNavigator>,
    ) -> Self {
        match callback {
            Some(callback) => Self::Callback(callback),
            None => Self::Navigate(navigator),
        }
    }

    fn select(&self, record: &R) {
        match self {
            Self::Callback(callback) => callback(record),
            Self::Navigate(navigator) => navigator.open_details(record.record_id()),
        }
    }
}

enum Command {
    Event(EventCommand),
    Shutdown(oneshot::Sender<()>),
}

enum EventCommand {
    Input(String),
    Focus,
    Blur,
    Key(SearchKey),
    Select(usize),
}

/// Search gate for an identity; `None` means lookups are allowed
pub fn search_gate(identity: Option<&Identity>) -> Option<AccessDenial> {
    can_search_patients(identity).err()
}

/// Handle to a running search session.
///
/// The session state lives in a spawned task that serializes every event
/// (commands from this handle, timer fires, lookup completions, identity
/// changes). Snapshots are published through a `watch` channel. Dropping the
/// handle unmounts the session.
pub struct SearchController<R> {
    session_id: Uuid,
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SearchSnapshot<R>>,
}

impl<R: SearchRecord> SearchController<R> {
    /// Start a session against `directory`.
    ///
    /// `identity` is watched for the lifetime of the session so a sign-out or
    /// role switch re-evaluates the search gate.
    pub fn spawn<D>(
        directory: Arc<D>,
        identity: watch::Receiver<Option<Identity>>,
        options: SearchOptions,
        selection: SelectionHandler<R>,
        redactor: PiiRedactor,
    ) -> Self
    where
        D: RecordDirectory<Record = R> + ?Sized,
    {
        let session_id = Uuid::new_v4();
        let denial = search_gate(identity.borrow().as_ref());
        let denied = denial.is_some();
        let session = SearchSession::new(options, denial);
        let (snapshots_tx, snapshots) = watch::channel(session.snapshot());
        let (commands, commands_rx) = mpsc::unbounded_channel();

        info!(session = %session_id, denied, "Search session mounted");

        let driver = Driver {
            session_id,
            session,
            directory,
            selection,
            identity,
            identity_open: true,
            snapshots: snapshots_tx,
            lookups: JoinSet::new(),
            in_flight: HashMap::new(),
            debounce: None,
            blur: None,
            options,
            redactor,
        };
        tokio::spawn(driver.run(commands_rx));

        Self {
            session_id,
            commands,
            snapshots,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    fn send(&self, event: EventCommand) -> Result<()> {
        self.commands
            .send(Command::Event(event))
            .map_err(|_| SearchError::ControllerClosed)
    }

    /// Keystroke: the full current text of the input
    pub fn input(&self, text: impl Into<String>) -> Result<()> {
        self.send(EventCommand::Input(text.into()))
    }

    pub fn focus(&self) -> Result<()> {
        self.send(EventCommand::Focus)
    }

    pub fn blur(&self) -> Result<()> {
        self.send(EventCommand::Blur)
    }

    pub fn key(&self, key: SearchKey) -> Result<()> {
        self.send(EventCommand::Key(key))
    }

    /// Choose the result at `index` in the current list
    pub fn select(&self, index: usize) -> Result<()> {
        self.send(EventCommand::Select(index))
    }

    pub fn snapshot(&self) -> SearchSnapshot<R> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot<R>> {
        self.snapshots.clone()
    }

    /// Wait until a published snapshot satisfies `predicate`
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SearchSnapshot<R>) -> bool,
    ) -> Result<SearchSnapshot<R>> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(predicate)
            .await
            .map_err(|_| SearchError::ControllerClosed)?;
        Ok(snapshot.clone())
    }

    /// Unmount: stop timers and ignore anything still in flight
    pub async fn shutdown(&self) -> Result<()> {
        let (done, finished) = oneshot::channel();
        self.commands
            .send(Command::Shutdown(done))
            .map_err(|_| SearchError::ControllerClosed)?;
        finished.await.map_err(|_| SearchError::ControllerClosed)
    }
}

type LookupOutcome<R> = (LookupTicket, Result<Vec<R>>);

enum Wake<R> {
    Command(Option<Command>),
    IdentityChanged(bool),
    Lookup(std::result::Result<(task::Id, LookupOutcome<R>), JoinError>),
    Debounce(u64),
    Blur(u64),
}

struct Driver<D: RecordDirectory + ?Sized> {
    session_id: Uuid,
    session: SearchSession<D::Record>,
    directory: Arc<D>,
    selection: SelectionHandler<D::Record>,
    identity: watch::Receiver<Option<Identity>>,
    identity_open: bool,
    snapshots: watch::Sender<SearchSnapshot<D::Record>>,
    lookups: JoinSet<LookupOutcome<D::Record>>,
    /// Ticket of every task still in `lookups`, so a failed join can be
    /// answered for the lookup it belonged to
    in_flight: HashMap<task::Id, LookupTicket>,
    debounce: Option<(u64, Instant)>,
    blur: Option<(u64, Instant)>,
    options: SearchOptions,
    redactor: PiiRedactor,
}

impl<D: RecordDirectory + ?Sized> Driver<D> {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        loop {
            let debounce_at = self.debounce.map_or_else(Instant::now, |(_, at)| at);
            let blur_at = self.blur.map_or_else(Instant::now, |(_, at)| at);

            let wake = tokio::select! {
                biased;
                command = commands.recv() => Wake::Command(command),
                changed = self.identity.changed(), if self.identity_open => {
                    Wake::IdentityChanged(changed.is_ok())
                }
                Some(joined) = self.lookups.join_next_with_id(), if !self.lookups.is_empty() => {
                    Wake::Lookup(joined)
                }
                () = sleep_until(debounce_at), if self.debounce.is_some() => {
                    Wake::Debounce(self.debounce.take().map_or(0, |(ticket, _)| ticket))
                }
                () = sleep_until(blur_at), if self.blur.is_some() => {
                    Wake::Blur(self.blur.take().map_or(0, |(ticket, _)| ticket))
                }
            };

            let event = match wake {
                Wake::Command(Some(Command::Event(command))) => match command {
                    EventCommand::Input(text) => SearchEvent::Input(text),
                    EventCommand::Focus => SearchEvent::Focus,
                    EventCommand::Blur => SearchEvent::Blur,
                    EventCommand::Key(key) => SearchEvent::Key(key),
                    EventCommand::Select(index) => SearchEvent::Select(index),
                },
                Wake::Command(Some(Command::Shutdown(done))) => {
                    self.unmount();
                    let _ = done.send(());
                    return;
                }
                Wake::Command(None) => {
                    self.unmount();
                    return;
                }
                Wake::IdentityChanged(true) => {
                    let gate = search_gate(self.identity.borrow_and_update().as_ref());
                    SearchEvent::GateChanged(gate)
                }
                Wake::IdentityChanged(false) => {
                    self.identity_open = false;
                    continue;
                }
                Wake::Lookup(Ok((id, (ticket, outcome)))) => {
                    self.in_flight.remove(&id);
                    SearchEvent::LookupCompleted { ticket, outcome }
                }
                Wake::Lookup(Err(err)) => {
                    let Some(ticket) = self.in_flight.remove(&err.id()) else {
                        continue;
                    };
                    if err.is_cancelled() {
                        continue;
                    }
                    warn!(
                        session = %self.session_id,
                        generation = ticket.generation,
                        error = %err,
                        "Lookup task failed"
                    );
                    SearchEvent::LookupCompleted {
                        ticket,
                        outcome: Err(SearchError::Network(format!("lookup task failed: {err}"))),
                    }
                }
                Wake::Debounce(ticket) => SearchEvent::DebounceElapsed { ticket },
                Wake::Blur(ticket) => SearchEvent::BlurElapsed { ticket },
            };

            self.apply(event);
        }
    }

    fn apply(&mut self, event: SearchEvent<D::Record>) {
        for effect in self.session.handle(event) {
            match effect {
                SearchEffect::ScheduleDebounce { ticket, after } => {
                    self.debounce = Some((ticket, Instant::now() + after));
                }
                SearchEffect::ScheduleBlur { ticket, after } => {
                    self.blur = Some((ticket, Instant::now() + after));
                }
                SearchEffect::Lookup(ticket) => self.issue(ticket),
                SearchEffect::Selected(record) => {
                    info!(
                        session = %self.session_id,
                        record_id = %record.record_id(),
                        "Search result selected"
                    );
                    self.selection.select(&record);
                }
                SearchEffect::Notify(notice) => {
                    warn!(session = %self.session_id, notice = %notice, "Patient search failed");
                }
            }
        }
        self.snapshots.send_replace(self.session.snapshot());
    }

    fn issue(&mut self, ticket: LookupTicket) {
        redacted_debug!(
            self.redactor,
            &ticket.query,
            "Issuing patient lookup",
            session = %self.session_id,
            generation = ticket.generation
        );

        // Only the newest ticket can ever be applied
        if !self.lookups.is_empty() {
            debug!(
                session = %self.session_id,
                superseded = self.lookups.len(),
                "Aborting superseded lookups"
            );
            self.lookups.abort_all();
        }

        let directory = Arc::clone(&self.directory);
        let timeout = self.options.lookup_timeout;
        let tagged = ticket.clone();
        let handle = self.lookups.spawn(async move {
            let lookup = directory.search(&tagged.query);
            let outcome = match tokio::time::timeout(timeout, lookup).await {
                Ok(outcome) => outcome,
                Err(_) => Err(SearchError::Timeout(timeout)),
            };
            (tagged, outcome)
        });
        self.in_flight.insert(handle.id(), ticket);
    }

    fn unmount(&mut self) {
        self.session.handle(SearchEvent::Unmount);
        self.lookups.abort_all();
        self.in_flight.clear();
        self.debounce = None;
        self.blur = None;
        self.snapshots.send_replace(self.session.snapshot());
        info!(session = %self.session_id, "Search session unmounted");
    }
}
