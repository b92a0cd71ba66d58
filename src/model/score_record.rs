use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac, TimestampMilliSeconds};
use std::time::{Duration, SystemTime};
use uuid::Uuid;

/// One completed run. Serialized with the camelCase field names shared by the
/// local history file and the ranking backend.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    id: Uuid,
    user_id: String,
    difficulty_id: String,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    time: Duration,
    #[serde_as(as = "TimestampMilliSeconds<i64>")]
    date: SystemTime,
    user_name: String,
}

impl ScoreRecord {
    pub fn new(user_id: &str, user_name: &str, difficulty_id: &str, time: Duration) -> Self {
        Self::recorded_at(user_id, user_name, difficulty_id, time, SystemTime::now())
    }

    pub fn recorded_at(
        user_id: &str,
        user_name: &str,
        difficulty_id: &str,
        time: Duration,
        date: SystemTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            difficulty_id: difficulty_id.to_string(),
            time,
            date,
            user_name: user_name.to_string(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn difficulty_id(&self) -> &str {
        &self.difficulty_id
    }

    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn seconds(&self) -> f64 {
        self.time.as_secs_f64()
    }

    pub fn date(&self) -> SystemTime {
        self.date
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn date_label(&self) -> String {
        DateTime::<Local>::from(self.date)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }
}
