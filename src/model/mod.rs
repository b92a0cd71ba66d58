mod difficulty;
mod language;
mod ranking_snapshot;
mod result_summary;
mod score_record;
mod sequence;
mod session;
mod session_command;
mod session_event;
mod timer_state;

pub use difficulty::{CatalogError, Difficulty, DifficultyCatalog, MAX_GRID_SIZE};
pub use language::{t, Language, TextKey};
pub use ranking_snapshot::RankingSnapshot;
pub use result_summary::{GlobalRank, ResultSummary, SubmissionState};
pub use score_record::ScoreRecord;
pub use sequence::Sequence;
pub use session::{Session, SessionStatus, TapOutcome, TickOutcome};
pub use session_command::SessionCommand;
pub use session_event::SessionEvent;
pub use timer_state::TimerState;
