use log::{debug, error, info, trace};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

use super::clock::Clock;
use super::finish_pipeline::FinishPipeline;
use super::local_history::LocalHistory;
use super::settings::{RuntimeConfig, Settings};
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    Difficulty, DifficultyCatalog, ResultSummary, ScoreRecord, Sequence, Session, SessionCommand,
    SessionEvent, SessionStatus, TapOutcome, TickOutcome,
};

pub struct SessionServices {
    pub catalog: DifficultyCatalog,
    pub config: RuntimeConfig,
    pub clock: Rc<dyn Clock>,
    pub history: LocalHistory,
    pub pipeline: FinishPipeline,
}

/// Reducer for the game loop: takes one `SessionCommand` at a time and emits
/// the resulting `SessionEvent`s. Finishing a run appends it to the local
/// history before any network work is started.
pub struct SessionEngine {
    catalog: DifficultyCatalog,
    config: RuntimeConfig,
    clock: Rc<dyn Clock>,
    history: LocalHistory,
    pipeline: FinishPipeline,
    settings: Settings,
    status: SessionStatus,
    session: Option<Session>,
    last_summary: Option<Uuid>,
    debug_mode: bool,
    subscription: Option<Unsubscriber<SessionCommand>>,
    events: EventEmitter<SessionEvent>,
}

impl Destroyable for SessionEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl SessionEngine {
    pub fn new(
        command_observer: EventObserver<SessionCommand>,
        events: EventEmitter<SessionEvent>,
        settings: Settings,
        services: SessionServices,
    ) -> Rc<RefCell<Self>> {
        let status = if settings.has_player_name() {
            SessionStatus::Idle
        } else {
            SessionStatus::Setup
        };
        let engine = Self {
            catalog: services.catalog,
            config: services.config,
            clock: services.clock,
            history: services.history,
            pipeline: services.pipeline,
            settings,
            status,
            session: None,
            last_summary: None,
            debug_mode: Settings::is_debug_mode(),
            subscription: None,
            events,
        };
        let refcell = Rc::new(RefCell::new(engine));
        SessionEngine::wire_subscription(refcell.clone(), command_observer);
        refcell
    }

    fn wire_subscription(engine: Rc<RefCell<Self>>, command_observer: EventObserver<SessionCommand>) {
        let handler = engine.clone();
        let subscription = command_observer.subscribe(move |command| {
            handler.borrow_mut().handle_command(command.clone());
        });
        engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: SessionCommand) {
        trace!(target: "session_engine", "Handling command: {:?}", command);
        match command {
            SessionCommand::SetPlayerName(name) => self.set_player_name(&name),
            SessionCommand::SelectDifficulty(id) => self.select_difficulty(&id),
            SessionCommand::SetLanguage(language) => {
                self.settings.language = language;
                self.save_profile();
            }
            SessionCommand::ToggleAudio => {
                self.settings.audio_enabled = !self.settings.audio_enabled;
                self.save_profile();
            }
            SessionCommand::OpenSetup => {
                if !self.status.is_active() {
                    self.set_status(SessionStatus::Setup);
                }
            }
            SessionCommand::Start | SessionCommand::Retry => self.start(),
            SessionCommand::CountdownTick => self.tick(),
            SessionCommand::Tap(value) => {
                let now = self.clock.now();
                self.tap(value, now);
            }
            SessionCommand::TapAt(value, at) => self.tap(value, at),
            SessionCommand::Home => self.home(),
            SessionCommand::ShowLeaderboard(id) => {
                let difficulty_id = self.requested_difficulty(&id);
                self.pipeline.load_leaderboard(&difficulty_id);
            }
            SessionCommand::ShowLocalRecords(id) => {
                let difficulty_id = self.requested_difficulty(&id);
                self.publish_local_records(&difficulty_id);
            }
            SessionCommand::InitDisplay => self.publish_state(),
        }
    }

    fn set_status(&mut self, status: SessionStatus) {
        if self.status != status {
            debug!(target: "session_engine", "Status {:?} -> {:?}", self.status, status);
            self.status = status;
        }
        self.events.emit(SessionEvent::StatusChanged(status));
    }

    fn save_profile(&self) {
        self.settings.persist();
        self.events.emit(SessionEvent::ProfileChanged(self.settings.clone()));
    }

    fn set_player_name(&mut self, name: &str) {
        if !self.settings.set_player_name(name) {
            self.events.emit(SessionEvent::SetupRequired);
            return;
        }
        self.save_profile();
        if self.status == SessionStatus::Setup {
            self.set_status(SessionStatus::Idle);
        }
    }

    fn select_difficulty(&mut self, id: &str) {
        if self.status.is_active() {
            return;
        }
        let difficulty_id = self.catalog.resolve(id).id.clone();
        if difficulty_id != id {
            debug!(target: "session_engine", "Unknown difficulty `{}`, using `{}`", id, difficulty_id);
        }
        self.settings.difficulty_id = difficulty_id.clone();
        self.save_profile();
        self.publish_local_records(&difficulty_id);
    }

    fn publish_local_records(&self, difficulty_id: &str) {
        let records = self.history.local_records(difficulty_id, self.config.leaderboard_limit);
        self.events.emit(SessionEvent::LocalRecordsChanged(records));
    }

    fn requested_difficulty(&self, id: &str) -> String {
        match self.catalog.get(id) {
            Some(difficulty) => difficulty.id.clone(),
            None => self.selected_difficulty().id.clone(),
        }
    }

    pub fn selected_difficulty(&self) -> &Difficulty {
        self.catalog.resolve(&self.settings.difficulty_id)
    }

    fn start(&mut self) {
        if self.status.is_active() {
            trace!(target: "session_engine", "Ignoring start while {:?}", self.status);
            return;
        }
        if !self.settings.has_player_name() {
            self.set_status(SessionStatus::Setup);
            self.events.emit(SessionEvent::SetupRequired);
            return;
        }
        let difficulty = self.selected_difficulty().clone();
        let sequence = Sequence::generate(difficulty.total, self.config.seed);
        if self.debug_mode {
            info!(
                target: "session_engine",
                "New session; difficulty: {}; seed: {}; tiles: {:?}",
                difficulty.id,
                sequence.seed(),
                sequence.tiles()
            );
        }
        let countdown = self.config.countdown_ticks;
        self.session = Some(Session::new(difficulty.clone(), sequence.clone(), countdown));
        self.last_summary = None;

        self.events.emit(SessionEvent::SequenceDealt { difficulty, sequence });
        self.events.emit(SessionEvent::NextExpectedChanged(1));
        self.set_status(SessionStatus::Countdown);
        if countdown == 0 {
            self.tick();
        } else {
            self.events.emit(SessionEvent::CountdownChanged(countdown));
        }
    }

    fn tick(&mut self) {
        let now = self.clock.now();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.tick(now) {
            TickOutcome::Ignored => (),
            TickOutcome::Counting { remaining } => {
                self.events.emit(SessionEvent::CountdownChanged(remaining));
            }
            TickOutcome::Started => {
                self.events.emit(SessionEvent::CountdownChanged(0));
                self.set_status(SessionStatus::Playing);
            }
        }
    }

    fn tap(&mut self, value: u32, now: Instant) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.tap(value, now) {
            TapOutcome::Ignored => (),
            TapOutcome::Advanced { next_expected } => {
                self.events.emit(SessionEvent::NextExpectedChanged(next_expected));
            }
            TapOutcome::Rejected { expected } => {
                trace!(target: "session_engine", "Rejected tap {} (expected {})", value, expected);
                self.events.emit(SessionEvent::InvalidTap { value, expected });
            }
            TapOutcome::Completed { elapsed } => {
                let difficulty = session.difficulty().clone();
                let record = ScoreRecord::new(
                    &self.settings.user_id,
                    &self.settings.user_name,
                    &difficulty.id,
                    elapsed,
                );
                self.finish(record, &difficulty);
            }
        }
    }

    fn finish(&mut self, record: ScoreRecord, difficulty: &Difficulty) {
        if let Err(err) = self.history.append(record.clone()) {
            error!(target: "session_engine", "Failed to persist record {}: {}", record.id(), err);
        }
        let local_rank = self.history.rank_of(&record);
        let is_personal_best = self.history.is_personal_best(&record);
        info!(
            target: "session_engine",
            "Finished {} in {:.6}s; local rank {}; personal best: {}",
            difficulty.id,
            record.seconds(),
            local_rank,
            is_personal_best
        );
        let language = self.settings.language;
        let summary = ResultSummary::new(record, difficulty.name(language), local_rank, is_personal_best);
        self.last_summary = Some(summary.record_id());
        self.pipeline.dispatch(&summary, language);

        self.set_status(SessionStatus::Finished);
        self.events.emit(SessionEvent::Finished(summary));
        self.events.emit(SessionEvent::HistoryChanged);
        self.publish_local_records(&difficulty.id);
    }

    /// Leaves the current screen. An unfinished run is abandoned without a record.
    fn home(&mut self) {
        if let Some(session) = &self.session {
            if session.status().is_active() {
                debug!(target: "session_engine", "Abandoning session at {}", session.next_expected());
            }
        }
        self.session = None;
        self.last_summary = None;
        let status = if self.settings.has_player_name() {
            SessionStatus::Idle
        } else {
            SessionStatus::Setup
        };
        self.set_status(status);
    }

    fn publish_state(&self) {
        self.events.emit(SessionEvent::ProfileChanged(self.settings.clone()));
        if let Some(session) = &self.session {
            self.events.emit(SessionEvent::SequenceDealt {
                difficulty: session.difficulty().clone(),
                sequence: session.sequence().clone(),
            });
            self.events.emit(SessionEvent::NextExpectedChanged(session.next_expected()));
        }
        self.events.emit(SessionEvent::StatusChanged(self.status));
        match (&self.session, self.status) {
            (Some(session), SessionStatus::Countdown) if session.countdown() > 0 => {
                self.events.emit(SessionEvent::CountdownChanged(session.countdown()));
            }
            (_, SessionStatus::Finished) => {
                if let Some(summary) = self.last_summary() {
                    self.events.emit(SessionEvent::Finished(summary));
                }
            }
            _ => (),
        }
        self.publish_local_records(&self.selected_difficulty().id);
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn history(&self) -> &LocalHistory {
        &self.history
    }

    pub fn catalog(&self) -> &DifficultyCatalog {
        &self.catalog
    }

    pub fn last_summary(&self) -> Option<ResultSummary> {
        self.last_summary.and_then(|id| self.pipeline.board().get(id))
    }

    pub fn summary_for(&self, record_id: Uuid) -> Option<ResultSummary> {
        self.pipeline.board().get(record_id)
    }
}
