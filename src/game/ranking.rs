use async_trait::async_trait;
use log::{debug, trace, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;
use thiserror::Error;

use crate::model::ScoreRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("ranking backend unavailable: {0}")]
    Unavailable(String),
    #[error("ranking index for `{0}` is not available")]
    IndexMissing(String),
    #[error("ranking request timed out after {0:?}")]
    TimedOut(Duration),
}

/// Storage behind the shared leaderboard. Indexed queries may be missing on
/// a fresh deployment; `scan` always works, at a latency cost.
#[async_trait(?Send)]
pub trait RankingBackend {
    async fn upsert(&self, document_id: &str, record: &ScoreRecord) -> Result<(), RankingError>;

    async fn count_faster(&self, difficulty_id: &str, time: Duration) -> Result<usize, RankingError>;

    async fn fastest(&self, difficulty_id: &str, limit: usize) -> Result<Vec<ScoreRecord>, RankingError>;

    /// Unindexed: every document of the difficulty, in no particular order.
    async fn scan(&self, difficulty_id: &str) -> Result<Vec<ScoreRecord>, RankingError>;
}

/// Best-effort leaderboard access for the game loop. Every call has a bounded
/// wait, and failures degrade to `None` or an empty list rather than errors,
/// except `submit` which reports the outcome so it can be shown.
#[derive(Clone)]
pub struct RankingClient {
    backend: Rc<dyn RankingBackend>,
    timeout: Duration,
}

impl RankingClient {
    pub fn new(backend: Rc<dyn RankingBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn document_id(record: &ScoreRecord) -> String {
        format!("{}_{}", record.user_id(), record.difficulty_id())
    }

    async fn bounded<T: 'static>(
        &self,
        request: impl Future<Output = Result<T, RankingError>> + 'static,
    ) -> Result<T, RankingError> {
        glib::future_with_timeout(self.timeout, Box::pin(request))
            .await
            .map_err(|_| RankingError::TimedOut(self.timeout))?
    }

    pub async fn submit(&self, record: &ScoreRecord) -> Result<String, RankingError> {
        let backend = Rc::clone(&self.backend);
        let record = record.clone();
        let document_id = Self::document_id(&record);
        let request = {
            let document_id = document_id.clone();
            async move { backend.upsert(&document_id, &record).await }
        };
        self.bounded(request).await?;
        debug!(target: "ranking", "Submitted {}", document_id);
        Ok(document_id)
    }

    pub async fn rank_for(&self, difficulty_id: &str, time: Duration) -> Option<u32> {
        let backend = Rc::clone(&self.backend);
        let difficulty_id = difficulty_id.to_string();
        let request = async move {
            match backend.count_faster(&difficulty_id, time).await {
                Ok(count) => Ok(count),
                Err(err) => {
                    trace!(target: "ranking", "Indexed rank query failed ({}), scanning", err);
                    backend
                        .scan(&difficulty_id)
                        .await
                        .map(|documents| documents.iter().filter(|r| r.time() < time).count())
                }
            }
        };
        match self.bounded(request).await {
            Ok(count) => Some(count as u32 + 1),
            Err(err) => {
                warn!(target: "ranking", "Global rank unavailable: {}", err);
                None
            }
        }
    }

    pub async fn top_n(&self, difficulty_id: &str, limit: usize) -> Vec<ScoreRecord> {
        let backend = Rc::clone(&self.backend);
        let difficulty_id = difficulty_id.to_string();
        let request = async move {
            match backend.fastest(&difficulty_id, limit).await {
                Ok(records) => Ok(records),
                Err(err) => {
                    trace!(target: "ranking", "Indexed leaderboard query failed ({}), scanning", err);
                    backend.scan(&difficulty_id).await.map(|mut documents| {
                        documents.sort_by_key(|r| r.time());
                        documents.truncate(limit);
                        documents
                    })
                }
            }
        };
        self.bounded(request).await.unwrap_or_else(|err| {
            warn!(target: "ranking", "Leaderboard unavailable: {}", err);
            Vec::new()
        })
    }
}

#[derive(Debug)]
struct InMemoryState {
    documents: BTreeMap<String, ScoreRecord>,
    index_ready: bool,
    online: bool,
}

/// Process-local ranking store with the same query surface as a remote one.
/// Switches simulate a missing index and an outage.
#[derive(Debug)]
pub struct InMemoryRankingBackend {
    state: RefCell<InMemoryState>,
}

impl Default for InMemoryRankingBackend {
    fn default() -> Self {
        Self {
            state: RefCell::new(InMemoryState {
                documents: BTreeMap::new(),
                index_ready: true,
                online: true,
            }),
        }
    }
}

impl InMemoryRankingBackend {
    pub fn set_index_ready(&self, ready: bool) {
        self.state.borrow_mut().index_ready = ready;
    }

    pub fn set_online(&self, online: bool) {
        self.state.borrow_mut().online = online;
    }

    pub fn len(&self) -> usize {
        self.state.borrow().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn document(&self, document_id: &str) -> Option<ScoreRecord> {
        self.state.borrow().documents.get(document_id).cloned()
    }

    fn check_online(&self) -> Result<(), RankingError> {
        if self.state.borrow().online {
            Ok(())
        } else {
            Err(RankingError::Unavailable("in-memory backend is offline".into()))
        }
    }

    fn check_index(&self, difficulty_id: &str) -> Result<(), RankingError> {
        self.check_online()?;
        if self.state.borrow().index_ready {
            Ok(())
        } else {
            Err(RankingError::IndexMissing(difficulty_id.to_string()))
        }
    }

    fn of_difficulty(&self, difficulty_id: &str) -> Vec<ScoreRecord> {
        self.state
            .borrow()
            .documents
            .values()
            .filter(|r| r.difficulty_id() == difficulty_id)
            .cloned()
            .collect()
    }
}

#[async_trait(?Send)]
impl RankingBackend for InMemoryRankingBackend {
    async fn upsert(&self, document_id: &str, record: &ScoreRecord) -> Result<(), RankingError> {
        self.check_online()?;
        self.state
            .borrow_mut()
            .documents
            .insert(document_id.to_string(), record.clone());
        Ok(())
    }

    async fn count_faster(&self, difficulty_id: &str, time: Duration) -> Result<usize, RankingError> {
        self.check_index(difficulty_id)?;
        Ok(self
            .of_difficulty(difficulty_id)
            .iter()
            .filter(|r| r.time() < time)
            .count())
    }

    async fn fastest(&self, difficulty_id: &str, limit: usize) -> Result<Vec<ScoreRecord>, RankingError> {
        self.check_index(difficulty_id)?;
        let mut records = self.of_difficulty(difficulty_id);
        records.sort_by_key(|r| r.time());
        records.truncate(limit);
        Ok(records)
    }

    async fn scan(&self, difficulty_id: &str) -> Result<Vec<ScoreRecord>, RankingError> {
        self.check_online()?;
        Ok(self.of_difficulty(difficulty_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::block_on;
    use std::future::pending;

    fn run(user: &str, difficulty_id: &str, seconds: f64) -> ScoreRecord {
        ScoreRecord::new(user, user, difficulty_id, Duration::from_secs_f64(seconds))
    }

    fn client_with(backend: &Rc<InMemoryRankingBackend>) -> RankingClient {
        RankingClient::new(backend.clone(), Duration::from_secs(2))
    }

    struct StalledBackend;

    #[async_trait(?Send)]
    impl RankingBackend for StalledBackend {
        async fn upsert(&self, _: &str, _: &ScoreRecord) -> Result<(), RankingError> {
            pending().await
        }
        async fn count_faster(&self, _: &str, _: Duration) -> Result<usize, RankingError> {
            pending().await
        }
        async fn fastest(&self, _: &str, _: usize) -> Result<Vec<ScoreRecord>, RankingError> {
            pending().await
        }
        async fn scan(&self, _: &str) -> Result<Vec<ScoreRecord>, RankingError> {
            pending().await
        }
    }

    #[test]
    fn test_submit_keeps_one_document_per_player_and_difficulty() {
        let backend = Rc::new(InMemoryRankingBackend::default());
        let client = client_with(&backend);
        let slow = run("user_a", "easy", 4.0);
        let fast = run("user_a", "easy", 3.0);

        let first_id = block_on(client.submit(&slow)).unwrap();
        let second_id = block_on(client.submit(&fast)).unwrap();
        block_on(client.submit(&run("user_a", "hard", 9.0))).unwrap();

        assert_eq!(first_id, "user_a_easy");
        assert_eq!(first_id, second_id);
        assert_eq!(backend.len(), 2);
        assert_eq!(backend.document("user_a_easy").map(|r| r.id()), Some(fast.id()));
    }

    #[test]
    fn test_rank_counts_strictly_faster() {
        let backend = Rc::new(InMemoryRankingBackend::default());
        let client = client_with(&backend);
        for (user, seconds) in [("a", 2.0), ("b", 3.0), ("c", 3.0), ("d", 5.0)] {
            block_on(client.submit(&run(user, "easy", seconds))).unwrap();
        }
        block_on(client.submit(&run("e", "hard", 1.0))).unwrap();

        assert_eq!(block_on(client.rank_for("easy", Duration::from_secs(1))), Some(1));
        assert_eq!(block_on(client.rank_for("easy", Duration::from_secs(3))), Some(2));
        assert_eq!(block_on(client.rank_for("easy", Duration::from_secs(4))), Some(4));
    }

    #[test]
    fn test_missing_index_falls_back_to_scan() {
        let backend = Rc::new(InMemoryRankingBackend::default());
        let client = client_with(&backend);
        for (user, seconds) in [("a", 6.0), ("b", 2.0), ("c", 4.0)] {
            block_on(client.submit(&run(user, "normal", seconds))).unwrap();
        }
        backend.set_index_ready(false);

        assert_eq!(block_on(client.rank_for("normal", Duration::from_secs(5))), Some(3));
        let top: Vec<String> = block_on(client.top_n("normal", 2))
            .iter()
            .map(|r| r.user_id().to_string())
            .collect();
        assert_eq!(top, vec!["b", "c"]);
    }

    #[test]
    fn test_outage_degrades_to_unknown_and_empty() {
        let backend = Rc::new(InMemoryRankingBackend::default());
        let client = client_with(&backend);
        backend.set_online(false);

        assert_eq!(block_on(client.rank_for("easy", Duration::from_secs(1))), None);
        assert!(block_on(client.top_n("easy", 10)).is_empty());
        assert!(matches!(
            block_on(client.submit(&run("a", "easy", 1.0))),
            Err(RankingError::Unavailable(_))
        ));
    }

    #[test]
    fn test_stalled_backend_times_out() {
        let client = RankingClient::new(Rc::new(StalledBackend), Duration::from_millis(30));

        assert_eq!(block_on(client.rank_for("easy", Duration::from_secs(1))), None);
        assert!(block_on(client.top_n("easy", 10)).is_empty());
        assert_eq!(
            block_on(client.submit(&run("a", "easy", 1.0))),
            Err(RankingError::TimedOut(Duration::from_millis(30)))
        );
    }
}
