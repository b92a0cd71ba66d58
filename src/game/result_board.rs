use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use uuid::Uuid;

use crate::model::ResultSummary;

/// Result summaries keyed by record id. Late completions update the run they
/// were issued for, whatever session is on screen by then.
#[derive(Clone, Default)]
pub struct ResultBoard {
    summaries: Rc<RefCell<HashMap<Uuid, ResultSummary>>>,
}

impl ResultBoard {
    pub fn insert(&self, summary: ResultSummary) {
        self.summaries.borrow_mut().insert(summary.record_id(), summary);
    }

    pub fn get(&self, id: Uuid) -> Option<ResultSummary> {
        self.summaries.borrow().get(&id).cloned()
    }

    pub fn update(&self, id: Uuid, change: impl FnOnce(&mut ResultSummary)) -> Option<ResultSummary> {
        let mut summaries = self.summaries.borrow_mut();
        let summary = summaries.get_mut(&id)?;
        change(summary);
        Some(summary.clone())
    }

    pub fn len(&self) -> usize {
        self.summaries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
