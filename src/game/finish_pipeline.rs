use log::{info, warn};
use uuid::Uuid;

use super::enrichment::Enricher;
use super::ranking::RankingClient;
use super::result_board::ResultBoard;
use crate::events::EventEmitter;
use crate::model::{Language, RankingSnapshot, ResultSummary, SessionEvent, SubmissionState};

/// Background work that follows a finished run. Each completion lands on the
/// summary it was started for and is announced with `SummaryUpdated`.
#[derive(Clone)]
pub struct FinishPipeline {
    ranking: RankingClient,
    enricher: Enricher,
    board: ResultBoard,
    events: EventEmitter<SessionEvent>,
    leaderboard_limit: usize,
}

impl FinishPipeline {
    pub fn new(
        ranking: RankingClient,
        enricher: Enricher,
        events: EventEmitter<SessionEvent>,
        leaderboard_limit: usize,
    ) -> Self {
        Self {
            ranking,
            enricher,
            board: ResultBoard::default(),
            events,
            leaderboard_limit,
        }
    }

    pub fn board(&self) -> &ResultBoard {
        &self.board
    }

    /// Stores the summary and starts its follow-up tasks on the thread-default
    /// main context. Returns immediately.
    pub fn dispatch(&self, summary: &ResultSummary, language: Language) {
        self.board.insert(summary.clone());
        let context = glib::MainContext::ref_thread_default();

        let pipeline = self.clone();
        let run = summary.clone();
        context.spawn_local(async move { pipeline.enrich(&run, language).await });

        let pipeline = self.clone();
        let run = summary.clone();
        context.spawn_local(async move { pipeline.rank(&run).await });
    }

    async fn enrich(&self, summary: &ResultSummary, language: Language) {
        let message = self
            .enricher
            .describe(summary.record.time(), &summary.difficulty_name, language)
            .await;
        self.publish(summary.record_id(), move |s| s.set_message(message));
    }

    async fn rank(&self, summary: &ResultSummary) {
        let record = &summary.record;
        if summary.is_personal_best {
            let submission = match self.ranking.submit(record).await {
                Ok(document_id) => SubmissionState::Submitted(document_id),
                Err(err) => {
                    warn!(target: "finish_pipeline", "Submission of {} failed: {}", record.id(), err);
                    SubmissionState::Failed
                }
            };
            self.publish(summary.record_id(), move |s| s.set_submission(submission));
        }
        let rank = self.ranking.rank_for(record.difficulty_id(), record.time()).await;
        info!(target: "finish_pipeline", "Global rank for {}: {:?}", record.id(), rank);
        self.publish(summary.record_id(), move |s| s.set_global_rank(rank));
    }

    fn publish(&self, id: Uuid, change: impl FnOnce(&mut ResultSummary)) {
        if let Some(updated) = self.board.update(id, change) {
            self.events.emit(SessionEvent::SummaryUpdated(updated));
        }
    }

    pub fn load_leaderboard(&self, difficulty_id: &str) {
        let pipeline = self.clone();
        let difficulty_id = difficulty_id.to_string();
        glib::MainContext::ref_thread_default().spawn_local(async move {
            let entries = pipeline
                .ranking
                .top_n(&difficulty_id, pipeline.leaderboard_limit)
                .await;
            pipeline
                .events
                .emit(SessionEvent::LeaderboardLoaded(RankingSnapshot::new(&difficulty_id, entries)));
        });
    }
}
