use crate::game::local_history::LocalRecords;
use crate::game::settings::Settings;

use super::{Difficulty, RankingSnapshot, ResultSummary, Sequence, SessionStatus};

#[derive(Debug, Clone)]
pub enum SessionEvent {
    StatusChanged(SessionStatus),
    CountdownChanged(u32),
    SequenceDealt {
        difficulty: Difficulty,
        sequence: Sequence,
    },
    NextExpectedChanged(u32),
    InvalidTap {
        value: u32,
        expected: u32,
    },
    SetupRequired,
    ProfileChanged(Settings),
    Finished(ResultSummary),
    /// Late completion for a specific run; match on the record id before showing.
    SummaryUpdated(ResultSummary),
    HistoryChanged,
    LocalRecordsChanged(LocalRecords),
    LeaderboardLoaded(RankingSnapshot),
}
