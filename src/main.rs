use log::{error, info};
use std::cell::Cell;
use std::io::{self, BufRead};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use zennum::events::{Channel, EventEmitter, EventObserver};
use zennum::game::{
    CannedEnrichment, CountdownDriver, Enricher, FinishPipeline, InMemoryRankingBackend,
    LocalHistory, MonotonicClock, RankingClient, RuntimeConfig, SessionEngine, SessionServices,
    Settings,
};
use zennum::helpers::format_seconds;
use zennum::model::{
    t, DifficultyCatalog, GlobalRank, Language, SessionCommand, SessionEvent, SessionStatus,
    TextKey,
};
use zennum::Destroyable;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(20);
const LEADERBOARD_PREVIEW: usize = 10;
const LOCAL_PREVIEW: usize = 5;

fn init_logging() {
    env_logger::init();
}

enum Input {
    Command(SessionCommand),
    Help,
    Quit,
}

fn parse_line(line: &str, read_at: Instant) -> Option<Input> {
    let line = line.trim();
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match word {
        "" => return None,
        "q" | "quit" | "exit" => return Some(Input::Quit),
        "help" | "?" => return Some(Input::Help),
        "name" => SessionCommand::SetPlayerName(rest.to_string()),
        "mode" => SessionCommand::SelectDifficulty(rest.to_string()),
        "lang" => SessionCommand::SetLanguage(Language::from_code(rest)?),
        "audio" => SessionCommand::ToggleAudio,
        "setup" => SessionCommand::OpenSetup,
        "start" | "s" => SessionCommand::Start,
        "retry" | "r" => SessionCommand::Retry,
        "home" | "h" => SessionCommand::Home,
        "top" => SessionCommand::ShowLeaderboard(rest.to_string()),
        "records" => SessionCommand::ShowLocalRecords(rest.to_string()),
        value => SessionCommand::TapAt(value.parse().ok()?, read_at),
    };
    Some(Input::Command(command))
}

fn print_help() {
    println!("commands: name <NAME> | mode easy|normal|hard | lang ko|en | audio | setup");
    println!("          start | <number> | retry | home | top [mode] | records [mode] | quit");
}

/// Lines are stamped as they are read so taps are timed before the poll delay.
fn spawn_stdin_reader() -> Receiver<(Instant, String)> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send((Instant::now(), line)).is_err() {
                break;
            }
        }
    });
    receiver
}

fn pump_input(lines: Receiver<(Instant, String)>, commands: EventEmitter<SessionCommand>, main_loop: glib::MainLoop) {
    main_loop.context().spawn_local(async move {
        loop {
            match lines.try_recv() {
                Ok((read_at, line)) => match parse_line(&line, read_at) {
                    Some(Input::Command(command)) => commands.emit(command),
                    Some(Input::Help) | None => print_help(),
                    Some(Input::Quit) => break,
                },
                Err(TryRecvError::Empty) => glib::timeout_future(INPUT_POLL_INTERVAL).await,
                Err(TryRecvError::Disconnected) => break,
            }
        }
        main_loop.quit();
    });
}

fn print_events(events: &EventObserver<SessionEvent>, language: Language) {
    let language = Rc::new(Cell::new(language));
    events.subscribe(move |event| {
        let lang = language.get();
        match event {
            SessionEvent::ProfileChanged(settings) => language.set(settings.language),
            SessionEvent::SetupRequired => println!("{}: name <NAME>", t(lang, TextKey::EnterName)),
            SessionEvent::SequenceDealt { difficulty, sequence } => {
                println!("{}", difficulty.name(lang));
                for row in sequence.rows(difficulty.size as usize) {
                    let cells: Vec<String> = row.iter().map(|v| format!("{:>3}", v)).collect();
                    println!("{}", cells.join(""));
                }
            }
            SessionEvent::CountdownChanged(remaining) if *remaining > 0 => println!("{}...", remaining),
            SessionEvent::StatusChanged(SessionStatus::Playing) => println!("GO!"),
            SessionEvent::StatusChanged(SessionStatus::Idle) => println!("{}", t(lang, TextKey::Title)),
            SessionEvent::InvalidTap { value, expected } => println!("x {} (next: {})", value, expected),
            SessionEvent::Finished(summary) => {
                println!(
                    "{}  {} {}s  #{}",
                    t(lang, TextKey::Complete),
                    t(lang, TextKey::Time),
                    format_seconds(summary.record.time(), 6),
                    summary.local_rank
                );
                if summary.is_personal_best {
                    println!("{}", t(lang, TextKey::PersonalBestUpdated));
                }
            }
            SessionEvent::SummaryUpdated(summary) => {
                if let GlobalRank::Ranked(rank) = summary.global_rank {
                    println!("{}: #{}", t(lang, TextKey::GlobalRank), rank);
                }
                if let Some(message) = &summary.message {
                    println!("\"{}\"", message);
                }
            }
            SessionEvent::LocalRecordsChanged(records) => {
                for best in &records.best_per_difficulty {
                    println!(
                        "{} {:<8} {}s",
                        t(lang, TextKey::Best),
                        best.difficulty_id(),
                        format_seconds(best.time(), 6)
                    );
                }
                if records.top.is_empty() {
                    println!("{} ({})", t(lang, TextKey::NoRecords), records.difficulty_id);
                }
                for (index, record) in records.top.iter().take(LOCAL_PREVIEW).enumerate() {
                    println!(
                        "{:>4}. {}s  {}",
                        index + 1,
                        format_seconds(record.time(), 6),
                        record.date_label()
                    );
                }
            }
            SessionEvent::LeaderboardLoaded(snapshot) => {
                println!("{} ({})", t(lang, TextKey::GlobalTop), snapshot.difficulty_id);
                if snapshot.is_empty() {
                    println!("{}", t(lang, TextKey::NoRecords));
                }
                for (index, entry) in snapshot.entries.iter().take(LEADERBOARD_PREVIEW).enumerate() {
                    println!(
                        "{:>4}. {:<10} {}s  {}",
                        index + 1,
                        entry.user_name(),
                        format_seconds(entry.time(), 4),
                        entry.date_label()
                    );
                }
            }
            _ => (),
        }
    });
}

fn main() {
    init_logging();

    let context = glib::MainContext::default();
    let _owner = match context.acquire() {
        Ok(guard) => guard,
        Err(err) => {
            error!("Cannot acquire the main context: {}", err);
            std::process::exit(1);
        }
    };

    let catalog = match DifficultyCatalog::new(
        DifficultyCatalog::standard_difficulties(),
        DifficultyCatalog::STANDARD_DEFAULT_ID,
    ) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("Invalid difficulty catalog: {}", err);
            std::process::exit(1);
        }
    };
    let config = RuntimeConfig::from_env();
    let settings = Settings::load_default();
    let history = LocalHistory::open_default();
    info!("Loaded {} local records for {}", history.len(), settings.user_id);

    let (command_emitter, command_observer) = Channel::<SessionCommand>::new();
    let (event_emitter, event_observer) = Channel::<SessionEvent>::new();

    let ranking = RankingClient::new(Rc::new(InMemoryRankingBackend::default()), config.ranking_timeout);
    let enricher = Enricher::new(Rc::new(CannedEnrichment), config.enrichment_timeout);
    let pipeline = FinishPipeline::new(
        ranking,
        enricher,
        event_emitter.clone(),
        config.leaderboard_limit,
    );

    print_events(&event_observer, settings.language);
    let countdown = CountdownDriver::new(
        event_observer.clone(),
        command_emitter.clone(),
        config.tick_interval,
    );
    let services = SessionServices {
        catalog,
        config,
        clock: Rc::new(MonotonicClock),
        history,
        pipeline,
    };
    let engine = SessionEngine::new(command_observer, event_emitter, settings, services);

    let main_loop = glib::MainLoop::new(Some(&context), false);
    pump_input(spawn_stdin_reader(), command_emitter.clone(), main_loop.clone());
    print_help();
    command_emitter.emit(SessionCommand::InitDisplay);

    main_loop.run();

    countdown.borrow_mut().destroy();
    engine.borrow_mut().destroy();
    if let Some(path) = engine.borrow().history().path() {
        info!("History saved at {:?}", path);
    };
}
