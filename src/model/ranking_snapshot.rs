use super::ScoreRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct RankingSnapshot {
    pub difficulty_id: String,
    pub entries: Vec<ScoreRecord>,
}

impl RankingSnapshot {
    pub fn new(difficulty_id: &str, entries: Vec<ScoreRecord>) -> Self {
        Self {
            difficulty_id: difficulty_id.to_string(),
            entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position_of(&self, user_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.user_id() == user_id)
            .map(|index| index + 1)
    }

    pub fn is_podium(position: usize) -> bool {
        (1..=3).contains(&position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_position_of_player() {
        let snapshot = RankingSnapshot::new(
            "easy",
            vec![
                ScoreRecord::new("user_a", "A", "easy", Duration::from_secs(2)),
                ScoreRecord::new("user_b", "B", "easy", Duration::from_secs(3)),
            ],
        );
        assert_eq!(snapshot.position_of("user_b"), Some(2));
        assert_eq!(snapshot.position_of("user_c"), None);
        assert!(RankingSnapshot::is_podium(2));
        assert!(!RankingSnapshot::is_podium(4));
    }
}
