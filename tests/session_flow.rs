use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use zennum::events::{Channel, EventEmitter};
use zennum::game::{
    CannedEnrichment, CountdownDriver, Enricher, FinishPipeline, InMemoryRankingBackend,
    LocalHistory, ManualClock, RankingClient, RuntimeConfig, SessionEngine, SessionServices,
    Settings,
};
use zennum::model::{
    DifficultyCatalog, GlobalRank, SessionCommand, SessionEvent, SessionStatus, SubmissionState,
};

fn scratch_dir(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("zennum-flow-{}-{}", label, uuid::Uuid::new_v4()))
}

struct Game {
    engine: Rc<RefCell<SessionEngine>>,
    commands: EventEmitter<SessionCommand>,
    clock: Rc<ManualClock>,
    seen: Rc<RefCell<Vec<SessionEvent>>>,
    _countdown: Rc<RefCell<CountdownDriver>>,
}

fn new_game(backend: Rc<InMemoryRankingBackend>, history: LocalHistory, settings: Settings) -> Game {
    let (commands, command_observer) = Channel::<SessionCommand>::new();
    let (events, event_observer) = Channel::<SessionEvent>::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    event_observer.subscribe(move |event: &SessionEvent| sink.borrow_mut().push(event.clone()));

    let config = RuntimeConfig {
        tick_interval: Duration::from_millis(5),
        ranking_timeout: Duration::from_millis(200),
        enrichment_timeout: Duration::from_millis(200),
        ..RuntimeConfig::default()
    };
    let countdown = CountdownDriver::new(event_observer, commands.clone(), config.tick_interval);
    let pipeline = FinishPipeline::new(
        RankingClient::new(backend, config.ranking_timeout),
        Enricher::new(Rc::new(CannedEnrichment), config.enrichment_timeout),
        events.clone(),
        config.leaderboard_limit,
    );
    let clock = Rc::new(ManualClock::default());
    let services = SessionServices {
        catalog: DifficultyCatalog::standard(),
        config,
        clock: clock.clone(),
        history,
        pipeline,
    };
    let engine = SessionEngine::new(command_observer, events, settings, services);
    Game {
        engine,
        commands,
        clock,
        seen,
        _countdown: countdown,
    }
}

fn run_for(context: &glib::MainContext, duration: Duration) {
    context.block_on(glib::timeout_future(duration));
}

#[test]
fn full_session_is_recorded_ranked_and_survives_restart() {
    let dir = scratch_dir("full");
    let history_path = dir.join("history.json");
    let backend = Rc::new(InMemoryRankingBackend::default());

    let context = glib::MainContext::new();
    context
        .with_thread_default(|| {
            let history = LocalHistory::open(history_path.clone());
            let game = new_game(backend.clone(), history, Settings::in_memory());
            game.commands.emit(SessionCommand::Start);
            assert_eq!(game.engine.borrow().status(), SessionStatus::Setup);

            game.commands.emit(SessionCommand::SetPlayerName("Haru".into()));
            game.commands.emit(SessionCommand::SelectDifficulty("easy".into()));
            game.commands.emit(SessionCommand::Start);
            assert_eq!(game.engine.borrow().status(), SessionStatus::Countdown);

            // the countdown driver ticks on its own
            run_for(&context, Duration::from_millis(100));
            assert_eq!(game.engine.borrow().status(), SessionStatus::Playing);

            for value in 1..=9 {
                game.clock.advance(Duration::from_millis(400));
                game.commands.emit(SessionCommand::Tap(value));
            }
            assert_eq!(game.engine.borrow().status(), SessionStatus::Finished);
            run_for(&context, Duration::from_millis(50));

            let summary = game.engine.borrow().last_summary().expect("finished run has a summary");
            assert_eq!(summary.record.time(), Duration::from_millis(3600));
            assert!(summary.is_personal_best);
            assert_eq!(summary.global_rank, GlobalRank::Ranked(1));
            assert!(matches!(summary.submission, SubmissionState::Submitted(_)));
            assert!(summary.is_settled());

            let countdowns: Vec<u32> = game
                .seen
                .borrow()
                .iter()
                .filter_map(|event| match event {
                    SessionEvent::CountdownChanged(remaining) => Some(*remaining),
                    _ => None,
                })
                .collect();
            assert_eq!(countdowns, vec![3, 2, 1, 0]);

            game.commands.emit(SessionCommand::ShowLeaderboard("easy".into()));
            run_for(&context, Duration::from_millis(30));
            let leaderboard = game.seen.borrow().iter().find_map(|event| match event {
                SessionEvent::LeaderboardLoaded(snapshot) => Some(snapshot.clone()),
                _ => None,
            });
            assert_eq!(leaderboard.map(|s| s.entries.len()), Some(1));

            let restarted = LocalHistory::open(history_path.clone());
            assert_eq!(restarted.len(), 1);
            assert_eq!(restarted.best_for("easy").map(|r| r.time()), Some(Duration::from_millis(3600)));
        })
        .expect("fresh context can be acquired");

    assert_eq!(backend.len(), 1);
    let _ = std::fs::remove_dir_all(dir);
}
