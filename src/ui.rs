use crate::models::{CheckResult, HistoryEntry, Notice, UrlSummary};
use crate::panel::build_history_panel;
use chrono::NaiveDateTime;
use url::Url;

pub struct IndexView<'a> {
    pub results: &'a [CheckResult],
    pub history: &'a [HistoryEntry],
    pub now: String,
    pub notice: Option<Notice>,
}

pub fn render_index(view: &IndexView<'_>) -> Result<String, serde_json::Error> {
    let history_data = serde_json::to_string(view.history)?.replace("</", "<\\/");
    let notice = view
        .notice
        .map(|notice| {
            format!(
                r#"<div class="notice notice-{}">{}</div>"#,
                notice.level(),
                escape_html(notice.message())
            )
        })
        .unwrap_or_default();

    Ok(fill(
        INDEX_HTML,
        &[
            ("STYLE", STYLE),
            ("NOTICE", &notice),
            ("NOW", &escape_html(&view.now)),
            ("RESULTS", &render_results(view.results)),
            ("HISTORY_PANEL", &build_history_panel(view.history).to_html()),
            ("HISTORY_DATA", &history_data),
        ],
    ))
}

/// Single-pass `{{KEY}}` substitution, so inserted values are never rescanned.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

fn render_results(results: &[CheckResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let rows: String = results
        .iter()
        .map(|result| {
            let detail = match (&result.error, result.status_code) {
                (Some(error), _) => escape_html(error),
                (None, Some(code)) => code.to_string(),
                (None, None) => String::new(),
            };
            format!(
                r#"<tr><td>{}</td><td class="status {}">{}</td><td>{} ms</td><td>{}</td></tr>"#,
                escape_html(&result.url),
                if result.status.is_up() { "up" } else { "down" },
                result.status,
                result.time,
                detail
            )
        })
        .collect();

    format!(
        r#"<section class="card results">
      <div class="card-header">Latest results</div>
      <table>
        <thead><tr><th>URL</th><th>Status</th><th>Time</th><th>Detail</th></tr></thead>
        <tbody>{rows}</tbody>
      </table>
    </section>"#
    )
}

pub fn render_metrics(summaries: &[UrlSummary]) -> String {
    let body = if summaries.is_empty() {
        r#"<p class="empty">No URLs have been checked yet.</p>"#.to_string()
    } else {
        let rows: String = summaries
            .iter()
            .map(|summary| {
                let incidents: String = summary
                    .downtime_incidents
                    .iter()
                    .map(|incident| {
                        let end = incident
                            .end
                            .as_deref()
                            .map(format_minutes)
                            .unwrap_or_else(|| "ongoing".to_string());
                        format!("<li>{} &rarr; {}</li>", format_minutes(&incident.start), end)
                    })
                    .collect();
                format!(
                    r#"<tr><td><a href="{href}">{url}</a></td><td>{:.2}%</td><td>{:.2} ms</td><td>{}</td><td>{}</td><td><ul>{incidents}</ul></td></tr>"#,
                    summary.availability,
                    summary.avg_response_time,
                    summary.total_checks,
                    summary.last_check.as_deref().map(format_minutes).unwrap_or_default(),
                    href = escape_html(&metrics_href(&summary.url)),
                    url = escape_html(&summary.url),
                )
            })
            .collect();
        format!(
            r#"<table>
        <thead><tr><th>URL</th><th>Availability</th><th>Avg response</th><th>Checks</th><th>Last check</th><th>Recent incidents</th></tr></thead>
        <tbody>{rows}</tbody>
      </table>"#
        )
    };

    fill(METRICS_HTML, &[("STYLE", STYLE), ("BODY", &body)])
}

/// Detail link for a metrics key, with the key percent-encoded as a single
/// path segment.
pub fn metrics_href(key: &str) -> String {
    let Ok(mut link) = Url::parse("http://localhost/metrics") else {
        return "/metrics".to_string();
    };
    if let Ok(mut segments) = link.path_segments_mut() {
        segments.push(key);
    }
    link.path().to_string()
}

/// Shortens an ISO timestamp to minutes; unparsable input is returned as is.
pub fn format_minutes(value: &str) -> String {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|parsed| parsed.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| value.to_string())
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub const MAIN_JS: &str = r#"(() => {
  const historyData = window.historyData || [];

  const showHistoryDetails = (marker) => {
    const checkNumber = historyData.length - parseInt(marker, 10);
    window.alert('History details for check #' + checkNumber);
  };

  document.addEventListener('DOMContentLoaded', () => {
    const container = document.querySelector('.list-group-flush');
    if (!container) {
      return;
    }
    container.addEventListener('click', (event) => {
      const item = event.target.closest('.history-item');
      if (item) {
        showHistoryDetails(item.getAttribute('data-index'));
      }
    });
  });
})();
"#;

const STYLE: &str = r#"<style>
    :root {
      --bg: #f3f5f7;
      --ink: #1f2a33;
      --muted: #6b7580;
      --up: #2d7a4b;
      --down: #c63b2b;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(31, 42, 51, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Helvetica Neue", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
    }

    h1 {
      margin: 0;
      font-size: 1.9rem;
    }

    nav a {
      color: var(--ink);
      margin-left: 16px;
    }

    .card {
      background: var(--card);
      border-radius: 14px;
      box-shadow: var(--shadow);
      overflow: hidden;
    }

    .card-header {
      padding: 14px 18px;
      font-weight: 600;
      border-bottom: 1px solid rgba(31, 42, 51, 0.08);
    }

    form {
      display: grid;
      gap: 12px;
      padding: 18px;
    }

    textarea {
      min-height: 120px;
      font-family: monospace;
      padding: 10px;
    }

    button {
      justify-self: start;
      border: none;
      border-radius: 8px;
      padding: 10px 18px;
      background: var(--ink);
      color: white;
      cursor: pointer;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th, td {
      text-align: left;
      padding: 10px 18px;
      border-bottom: 1px solid rgba(31, 42, 51, 0.06);
    }

    .status.up {
      color: var(--up);
      font-weight: 600;
    }

    .status.down {
      color: var(--down);
      font-weight: 600;
    }

    .list-group {
      list-style: none;
      margin: 0;
      padding: 0;
    }

    .history-item {
      display: flex;
      justify-content: space-between;
      padding: 12px 18px;
      cursor: pointer;
      border-bottom: 1px solid rgba(31, 42, 51, 0.06);
    }

    .history-item:hover {
      background: rgba(31, 42, 51, 0.04);
    }

    .badge {
      color: var(--muted);
    }

    .empty {
      padding: 14px 18px;
      color: var(--muted);
    }

    .notice {
      padding: 12px 18px;
      border-radius: 10px;
    }

    .notice-error {
      background: #fbe4e1;
      color: var(--down);
    }

    .notice-success {
      background: #e1f3e8;
      color: var(--up);
    }

    .hint {
      color: var(--muted);
      font-size: 0.9rem;
      margin: 0;
    }
  </style>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>URL Health Monitor</title>
  {{STYLE}}
</head>
<body>
  <main class="app">
    <header>
      <h1>URL Health Monitor</h1>
      <nav><a href="/">Check</a><a href="/metrics">Metrics</a></nav>
    </header>

    {{NOTICE}}

    <section class="card">
      <div class="card-header">Check URLs</div>
      <form method="post" action="/">
        <textarea name="urls" placeholder="https://example.com&#10;example.org"></textarea>
        <button type="submit">Check</button>
        <p class="hint">One URL per line. Page rendered at {{NOW}}.</p>
      </form>
    </section>

    {{RESULTS}}

    <section>
      {{HISTORY_PANEL}}
      <form method="post" action="/clear_history">
        <button type="submit">Clear history</button>
      </form>
    </section>
  </main>
  <script>window.historyData = {{HISTORY_DATA}};</script>
  <script src="/static/main.js"></script>
</body>
</html>
"#;

const METRICS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>URL Metrics</title>
  {{STYLE}}
</head>
<body>
  <main class="app">
    <header>
      <h1>URL Metrics</h1>
      <nav><a href="/">Check</a><a href="/metrics">Metrics</a></nav>
    </header>
    <section class="card">
      {{BODY}}
    </section>
  </main>
</body>
</html>
"#;
