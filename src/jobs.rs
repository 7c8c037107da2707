use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One scraped job posting. Produced by the external scraper; never mutated
/// here. Every field is required: a listing missing one fails the whole load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub date_posted: String,
    pub description: String,
    pub job_url: String,
}

/// Loads the scraper's JSON export and orders it newest-first. The sort is
/// stable, so listings sharing a date keep the scraper's relative order.
pub fn load_jobs(path: &Path) -> Result<Vec<JobRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading jobs file: {}", path.display()))?;
    let mut jobs: Vec<JobRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing jobs JSON: {}", path.display()))?;
    jobs.sort_by(|a, b| b.date_posted.cmp(&a.date_posted));
    Ok(jobs)
}
