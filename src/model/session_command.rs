use std::time::Instant;

use super::Language;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetPlayerName(String),
    SelectDifficulty(String),
    SetLanguage(Language),
    ToggleAudio,
    OpenSetup,
    Start,
    CountdownTick,
    Tap(u32),
    /// A tap stamped where it was read, ahead of any queueing delay.
    TapAt(u32, Instant),
    Retry,
    Home,
    ShowLeaderboard(String),
    ShowLocalRecords(String),
    InitDisplay,
}
