pub mod clock;
pub mod countdown;
pub mod enrichment;
pub mod finish_pipeline;
pub mod local_history;
pub mod ranking;
pub mod result_board;
pub mod session_engine;
pub mod settings;
pub mod share;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use countdown::CountdownDriver;
pub use enrichment::{CannedEnrichment, Enricher, EnrichmentError, TextEnrichment};
pub use finish_pipeline::FinishPipeline;
pub use local_history::{HistoryStats, LocalHistory, LocalRecords};
pub use ranking::{InMemoryRankingBackend, RankingBackend, RankingClient, RankingError};
pub use result_board::ResultBoard;
pub use session_engine::{SessionEngine, SessionServices};
pub use settings::{RuntimeConfig, Settings};
pub use share::{share_with_fallback, ShareError, SharePayload, ShareSurface, ShareTarget};
