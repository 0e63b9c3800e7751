use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse an RFC 3339 issue time, or take the current time when absent.
pub fn parse_issued_at(raw: Option<&str>) -> Result<DateTime<Utc>> {
    raw.map_or_else(
        || Ok(Utc::now()),
        |raw| {
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|stamp| stamp.with_timezone(&Utc))
                .with_context(|| format!("invalid --issued-at timestamp: {raw}"))
        },
    )
}
