use itertools::Itertools;
use log::{trace, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

use super::settings::data_dir;
use crate::model::ScoreRecord;

const HISTORY_FILE_NAME: &str = "history.json";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryStats {
    pub plays: u32,
    pub best: Option<Duration>,
    pub total_time: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocalRecords {
    pub difficulty_id: String,
    pub top: Vec<ScoreRecord>,
    pub best: Option<ScoreRecord>,
    pub best_per_difficulty: Vec<ScoreRecord>,
    pub stats: HistoryStats,
}

/// Append-only log of every run on this device, persisted after each append.
#[derive(Debug)]
pub struct LocalHistory {
    path: Option<PathBuf>,
    records: Vec<ScoreRecord>,
}

impl LocalHistory {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            records: Vec::new(),
        }
    }

    pub fn open_default() -> Self {
        Self::open(data_dir().join(HISTORY_FILE_NAME))
    }

    /// Loads the log at `path`. A file that cannot be parsed is treated as
    /// empty; it is replaced on the next append.
    pub fn open(path: PathBuf) -> Self {
        let records = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Vec<ScoreRecord>>(&contents) {
                Ok(records) => records,
                Err(err) => {
                    warn!(
                        target: "local_history",
                        "History at {:?} is unreadable, starting empty: {}",
                        path,
                        err
                    );
                    Vec::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(target: "local_history", "Cannot read history at {:?}: {}", path, err);
                Vec::new()
            }
        };
        trace!(target: "local_history", "Loaded {} records from {:?}", records.len(), path);
        Self {
            path: Some(path),
            records,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn append(&mut self, record: ScoreRecord) -> std::io::Result<()> {
        self.records.push(record);
        self.save()
    }

    fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let contents = serde_json::to_string_pretty(&self.records)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, contents)?;
        fs::rename(&staging, path)
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    /// All runs of a difficulty, fastest first; ties keep insertion order.
    pub fn records_for(&self, difficulty_id: &str) -> Vec<&ScoreRecord> {
        self.records
            .iter()
            .filter(|r| r.difficulty_id() == difficulty_id)
            .sorted_by_key(|r| r.time())
            .collect()
    }

    pub fn best_for(&self, difficulty_id: &str) -> Option<&ScoreRecord> {
        self.records
            .iter()
            .filter(|r| r.difficulty_id() == difficulty_id)
            .min_by_key(|r| r.time())
    }

    /// 1-based place of `record` among its difficulty. Equal times rank by
    /// insertion, earlier first; a record not in the log ranks after its ties.
    pub fn rank_of(&self, record: &ScoreRecord) -> u32 {
        let position = self.position(record.id());
        let ahead = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, other)| {
                other.difficulty_id() == record.difficulty_id() && other.id() != record.id()
            })
            .filter(|(index, other)| {
                other.time() < record.time()
                    || (other.time() == record.time() && position.map_or(true, |p| *index < p))
            })
            .count();
        ahead as u32 + 1
    }

    /// Strictly faster than every earlier run of the same difficulty. A tie
    /// with the previous best does not count.
    pub fn is_personal_best(&self, record: &ScoreRecord) -> bool {
        let earlier = match self.position(record.id()) {
            Some(position) => &self.records[..position],
            None => &self.records[..],
        };
        earlier
            .iter()
            .filter(|other| other.difficulty_id() == record.difficulty_id())
            .all(|other| record.time() < other.time())
    }

    pub fn best_per_difficulty(&self) -> BTreeMap<&str, &ScoreRecord> {
        self.records.iter().fold(BTreeMap::new(), |mut best, record| {
            best.entry(record.difficulty_id())
                .and_modify(|current| {
                    if record.time() < current.time() {
                        *current = record;
                    }
                })
                .or_insert(record);
            best
        })
    }

    pub fn local_records(&self, difficulty_id: &str, limit: usize) -> LocalRecords {
        LocalRecords {
            difficulty_id: difficulty_id.to_string(),
            top: self
                .records_for(difficulty_id)
                .into_iter()
                .take(limit)
                .cloned()
                .collect(),
            best: self.best_for(difficulty_id).cloned(),
            best_per_difficulty: self.best_per_difficulty().into_values().cloned().collect(),
            stats: self.stats_for(difficulty_id),
        }
    }

    pub fn stats_for(&self, difficulty_id: &str) -> HistoryStats {
        self.records
            .iter()
            .filter(|r| r.difficulty_id() == difficulty_id)
            .fold(HistoryStats::default(), |mut stats, record| {
                stats.plays += 1;
                stats.total_time += record.time();
                stats.best = Some(stats.best.map_or(record.time(), |best| best.min(record.time())));
                stats
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(difficulty_id: &str, seconds: f64) -> ScoreRecord {
        ScoreRecord::new("user_test", "TEST", difficulty_id, Duration::from_secs_f64(seconds))
    }

    fn scratch_path(label: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("zennum-history-{}-{}", label, Uuid::new_v4()))
            .join(HISTORY_FILE_NAME)
    }

    #[test]
    fn test_first_record_is_best_and_first() {
        let mut history = LocalHistory::in_memory();
        let record = run("easy", 5.0);
        history.append(record.clone()).unwrap();

        assert!(history.is_personal_best(&record));
        assert_eq!(history.rank_of(&record), 1);
        assert_eq!(history.best_for("easy").map(|r| r.id()), Some(record.id()));
    }

    #[test]
    fn test_middle_time_ranks_second_and_is_not_best() {
        let mut history = LocalHistory::in_memory();
        history.append(run("easy", 3.0)).unwrap();
        history.append(run("easy", 4.0)).unwrap();
        let record = run("easy", 3.5);
        history.append(record.clone()).unwrap();

        assert_eq!(history.rank_of(&record), 2);
        assert!(!history.is_personal_best(&record));
    }

    #[test]
    fn test_other_difficulties_do_not_count() {
        let mut history = LocalHistory::in_memory();
        history.append(run("hard", 1.0)).unwrap();
        let record = run("easy", 9.0);
        history.append(record.clone()).unwrap();

        assert!(history.is_personal_best(&record));
        assert_eq!(history.rank_of(&record), 1);
        assert!(history.best_for("normal").is_none());
    }

    #[test]
    fn test_ties_rank_by_insertion_and_are_not_a_new_best() {
        let mut history = LocalHistory::in_memory();
        let first = run("easy", 3.0);
        let second = run("easy", 3.0);
        history.append(first.clone()).unwrap();
        history.append(second.clone()).unwrap();

        assert_eq!(history.rank_of(&first), 1);
        assert_eq!(history.rank_of(&second), 2);
        assert!(!history.is_personal_best(&second));

        let sorted: Vec<Uuid> = history.records_for("easy").iter().map(|r| r.id()).collect();
        assert_eq!(sorted, vec![first.id(), second.id()]);
    }

    #[test]
    fn test_rank_grows_with_time() {
        let mut history = LocalHistory::in_memory();
        let records: Vec<ScoreRecord> = [4.0, 1.5, 3.25, 2.0].iter().map(|s| run("normal", *s)).collect();
        for record in &records {
            history.append(record.clone()).unwrap();
        }
        let ranks: Vec<u32> = records.iter().map(|r| history.rank_of(r)).collect();
        assert_eq!(ranks, vec![4, 1, 3, 2]);
    }

    #[test]
    fn test_stats_for_difficulty() {
        let mut history = LocalHistory::in_memory();
        history.append(run("easy", 3.0)).unwrap();
        history.append(run("easy", 2.0)).unwrap();
        history.append(run("hard", 9.0)).unwrap();

        let stats = history.stats_for("easy");
        assert_eq!(stats.plays, 2);
        assert_eq!(stats.best, Some(Duration::from_secs(2)));
        assert_eq!(stats.total_time, Duration::from_secs(5));
        assert_eq!(history.stats_for("normal"), HistoryStats::default());
    }

    #[test]
    fn test_best_per_difficulty() {
        let mut history = LocalHistory::in_memory();
        let easy_best = run("easy", 2.0);
        let hard_best = run("hard", 8.0);
        history.append(run("easy", 3.0)).unwrap();
        history.append(easy_best.clone()).unwrap();
        history.append(hard_best.clone()).unwrap();
        history.append(run("easy", 2.0)).unwrap();

        let best = history.best_per_difficulty();
        assert_eq!(best.len(), 2);
        assert_eq!(best.get("easy").map(|r| r.id()), Some(easy_best.id()));
        assert_eq!(best.get("hard").map(|r| r.id()), Some(hard_best.id()));
        assert!(!best.contains_key("normal"));
    }

    #[test]
    fn test_local_records_view() {
        let mut history = LocalHistory::in_memory();
        for seconds in [4.0, 1.5, 3.0] {
            history.append(run("easy", seconds)).unwrap();
        }
        history.append(run("hard", 7.0)).unwrap();

        let records = history.local_records("easy", 2);
        let top: Vec<Duration> = records.top.iter().map(|r| r.time()).collect();
        assert_eq!(top, vec![Duration::from_secs_f64(1.5), Duration::from_secs(3)]);
        assert_eq!(records.best.map(|r| r.time()), Some(Duration::from_secs_f64(1.5)));
        assert_eq!(records.stats.plays, 3);
        let bests: Vec<&str> = records.best_per_difficulty.iter().map(|r| r.difficulty_id()).collect();
        assert_eq!(bests, vec!["easy", "hard"]);

        let empty = history.local_records("normal", 10);
        assert!(empty.top.is_empty() && empty.best.is_none());
        assert_eq!(empty.best_per_difficulty.len(), 2);
    }

    #[test]
    fn test_survives_restart() {
        let path = scratch_path("restart");
        let record = run("easy", 2.345);
        {
            let mut history = LocalHistory::open(path.clone());
            assert!(history.is_empty());
            history.append(record.clone()).unwrap();
        }
        let reopened = LocalHistory::open(path.clone());
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.records()[0].id(), record.id());
        assert_eq!(reopened.records()[0].difficulty_id(), "easy");
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_resets_to_empty() {
        let path = scratch_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[{\"id\": 12, \"time\": \"fast\"").unwrap();

        let mut history = LocalHistory::open(path.clone());
        assert!(history.is_empty());

        history.append(run("easy", 4.0)).unwrap();
        assert_eq!(LocalHistory::open(path.clone()).len(), 1);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
