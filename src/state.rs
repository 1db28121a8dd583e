use crate::checker::HealthChecker;
use crate::history::HistoryLog;
use crate::metrics::MetricsStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<HealthChecker>,
    pub history: Arc<Mutex<HistoryLog>>,
    pub metrics: Arc<Mutex<MetricsStore>>,
}

impl AppState {
    pub fn new(checker: HealthChecker) -> Self {
        Self {
            checker: Arc::new(checker),
            history: Arc::new(Mutex::new(HistoryLog::default())),
            metrics: Arc::new(Mutex::new(MetricsStore::default())),
        }
    }
}
