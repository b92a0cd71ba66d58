use uuid::Uuid;

use super::ScoreRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalRank {
    Pending,
    Ranked(u32),
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    NotRequired,
    Pending,
    Submitted(String),
    Failed,
}

/// What the result screen shows for one finished run. Numeric fields are
/// final at creation; the rank, submission and message fill in later.
#[readonly::make]
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSummary {
    pub record: ScoreRecord,
    pub difficulty_name: String,
    pub local_rank: u32,
    pub is_personal_best: bool,
    pub global_rank: GlobalRank,
    pub submission: SubmissionState,
    pub message: Option<String>,
}

impl ResultSummary {
    pub fn new(
        record: ScoreRecord,
        difficulty_name: &str,
        local_rank: u32,
        is_personal_best: bool,
    ) -> Self {
        let submission = if is_personal_best {
            SubmissionState::Pending
        } else {
            SubmissionState::NotRequired
        };
        Self {
            record,
            difficulty_name: difficulty_name.to_string(),
            local_rank,
            is_personal_best,
            global_rank: GlobalRank::Pending,
            submission,
            message: None,
        }
    }

    pub fn record_id(&self) -> Uuid {
        self.record.id()
    }

    pub fn is_settled(&self) -> bool {
        self.global_rank != GlobalRank::Pending
            && self.submission != SubmissionState::Pending
            && self.message.is_some()
    }

    pub(crate) fn set_global_rank(&mut self, rank: Option<u32>) {
        self.global_rank = rank.map_or(GlobalRank::Unknown, GlobalRank::Ranked);
    }

    pub(crate) fn set_submission(&mut self, submission: SubmissionState) {
        self.submission = submission;
    }

    pub(crate) fn set_message(&mut self, message: String) {
        self.message = Some(message);
    }
}
