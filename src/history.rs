use crate::models::{CheckResult, HistoryEntry};
use chrono::Local;

pub const HISTORY_LIMIT: usize = 5;

#[derive(Debug, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn record(&mut self, results: Vec<CheckResult>) {
        self.push(HistoryEntry {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            results,
        });
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        if self.entries.len() > HISTORY_LIMIT {
            let excess = self.entries.len() - HISTORY_LIMIT;
            self.entries.drain(..excess);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: &str) -> HistoryEntry {
        HistoryEntry {
            timestamp: timestamp.to_string(),
            results: Vec::new(),
        }
    }

    #[test]
    fn keeps_only_newest_entries() {
        let mut log = HistoryLog::default();
        for i in 0..8 {
            log.push(entry(&format!("t{i}")));
        }
        assert_eq!(log.entries().len(), HISTORY_LIMIT);
        let stamps: Vec<_> = log.entries().iter().map(|e| e.timestamp.as_str()).collect();
        assert_eq!(stamps, vec!["t3", "t4", "t5", "t6", "t7"]);
    }

    #[test]
    fn clear_empties_log() {
        let mut log = HistoryLog::default();
        log.record(Vec::new());
        assert_eq!(log.entries().len(), 1);
        log.clear();
        assert!(log.entries().is_empty());
    }
}
