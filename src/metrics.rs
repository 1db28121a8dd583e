use crate::models::{IncidentView, UrlDetail, UrlSummary};
use chrono::{Local, NaiveDateTime};
use std::collections::{BTreeMap, VecDeque};

pub const RESPONSE_WINDOW: usize = 100;
pub const RECENT_INCIDENTS: usize = 5;

#[derive(Debug, Clone)]
pub struct DowntimeIncident {
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub duration: Option<f64>,
}

#[derive(Debug, Default)]
pub struct UrlMetrics {
    pub up_count: u64,
    pub total_checks: u64,
    pub response_times: VecDeque<f64>,
    pub last_check: Option<NaiveDateTime>,
    pub downtime_incidents: Vec<DowntimeIncident>,
}

impl UrlMetrics {
    fn availability(&self) -> f64 {
        if self.total_checks == 0 {
            return 0.0;
        }
        round2(self.up_count as f64 / self.total_checks as f64 * 100.0)
    }

    fn avg_response_time(&self) -> f64 {
        if self.response_times.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.response_times.iter().sum();
        round2(sum / self.response_times.len() as f64)
    }
}

/// Per-URL counters, keyed by the URL exactly as it was submitted.
#[derive(Debug, Default)]
pub struct MetricsStore {
    urls: BTreeMap<String, UrlMetrics>,
}

impl MetricsStore {
    pub fn record(&mut self, url: &str, up: bool, response_time: f64) {
        self.record_at(Local::now().naive_local(), url, up, response_time);
    }

    pub fn record_at(&mut self, now: NaiveDateTime, url: &str, up: bool, response_time: f64) {
        let metrics = self.urls.entry(url.to_string()).or_default();
        metrics.total_checks += 1;
        metrics.last_check = Some(now);
        metrics.response_times.push_back(response_time);
        if metrics.response_times.len() > RESPONSE_WINDOW {
            metrics.response_times.pop_front();
        }

        if up {
            metrics.up_count += 1;
            for incident in metrics.downtime_incidents.iter_mut().rev() {
                if incident.end.is_none() {
                    incident.end = Some(now);
                    incident.duration =
                        Some((now - incident.start).num_milliseconds() as f64 / 1000.0);
                }
            }
        } else {
            let ongoing = metrics
                .downtime_incidents
                .last()
                .is_some_and(|incident| incident.end.is_none());
            if !ongoing {
                metrics.downtime_incidents.push(DowntimeIncident {
                    start: now,
                    end: None,
                    duration: None,
                });
            }
        }
    }

    /// Sorted by URL.
    pub fn summaries(&self) -> Vec<UrlSummary> {
        self.urls
            .iter()
            .filter(|(_, metrics)| metrics.total_checks > 0)
            .map(|(url, metrics)| {
                let skip = metrics
                    .downtime_incidents
                    .len()
                    .saturating_sub(RECENT_INCIDENTS);
                UrlSummary {
                    url: url.clone(),
                    availability: metrics.availability(),
                    avg_response_time: metrics.avg_response_time(),
                    total_checks: metrics.total_checks,
                    last_check: metrics.last_check.map(iso_timestamp),
                    downtime_incidents: metrics.downtime_incidents[skip..]
                        .iter()
                        .map(incident_view)
                        .collect(),
                }
            })
            .collect()
    }

    pub fn detail(&self, url: &str) -> Option<UrlDetail> {
        let metrics = self.urls.get(url)?;
        Some(UrlDetail {
            url: url.to_string(),
            availability: metrics.availability(),
            avg_response_time: metrics.avg_response_time(),
            total_checks: metrics.total_checks,
            last_check: metrics.last_check.map(iso_timestamp),
            response_times: metrics.response_times.iter().copied().collect(),
            downtime_incidents: metrics.downtime_incidents.iter().map(incident_view).collect(),
        })
    }
}

fn incident_view(incident: &DowntimeIncident) -> IncidentView {
    IncidentView {
        start: iso_timestamp(incident.start),
        end: incident.end.map(iso_timestamp),
        duration: incident.duration,
    }
}

pub fn iso_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
