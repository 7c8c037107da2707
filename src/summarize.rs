use crate::batch::{Batch, BatchPlan, MAX_BATCH_SIZE};
use crate::jobs::JobRecord;
use crate::model::ModelClient;
use crate::prompt;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Literal tag inserted into synthesized fallback blocks so a reader can spot
/// batches whose model call failed. Success is tracked via `BatchStatus`, not
/// by searching the rendered text for this string.
pub const FAILURE_MARKER: &str = "[generation failed:";

const BATCH_COOLDOWN: Duration = Duration::from_secs(2);
const INTER_BATCH_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    Ok,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    /// All batch outputs joined with a single newline, in input order.
    pub body: String,
    pub statuses: Vec<BatchStatus>,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.statuses.iter().all(|s| matches!(s, BatchStatus::Ok))
    }

    pub fn failed_batches(&self) -> usize {
        self.statuses
            .iter()
            .filter(|s| matches!(s, BatchStatus::Failed(_)))
            .count()
    }
}

/// Sleeps that keep the endpoint's rate limiter happy. Tests run with `NONE`.
#[derive(Debug, Clone, Copy)]
pub struct Pacing {
    pub batch_cooldown: Duration,
    pub inter_batch_delay: Duration,
}

impl Pacing {
    pub const NONE: Pacing = Pacing {
        batch_cooldown: Duration::ZERO,
        inter_batch_delay: Duration::ZERO,
    };
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            batch_cooldown: BATCH_COOLDOWN,
            inter_batch_delay: INTER_BATCH_DELAY,
        }
    }
}

pub struct Summarizer<C: ModelClient> {
    client: C,
    pacing: Pacing,
}

impl<C: ModelClient> Summarizer<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            pacing: Pacing::default(),
        }
    }

    pub fn with_pacing(client: C, pacing: Pacing) -> Self {
        Self { client, pacing }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    /// Summarizes every batch sequentially, in input order. A batch whose
    /// model call fails after retries is replaced by synthesized per-job
    /// fallback blocks; it never aborts the run. Callers short-circuit empty
    /// input before getting here.
    pub fn summarize(&self, jobs: &[JobRecord]) -> RunSummary {
        let plan = BatchPlan::new(jobs, MAX_BATCH_SIZE);
        let total = plan.batches.len();
        let mut parts = Vec::with_capacity(total);
        let mut statuses = Vec::with_capacity(total);

        for (i, batch) in plan.batches.iter().enumerate() {
            info!(
                "batch {}/{}: jobs {}-{}",
                i + 1,
                total,
                batch.start_index,
                batch.end_index()
            );

            match self.client.complete(&prompt::render(batch)) {
                Ok(text) => {
                    let blocks = text.matches("**Description**:").count();
                    info!("batch {}/{} returned {} summary block(s)", i + 1, total, blocks);
                    parts.push(text);
                    statuses.push(BatchStatus::Ok);
                    if !self.pacing.batch_cooldown.is_zero() {
                        thread::sleep(self.pacing.batch_cooldown);
                    }
                }
                Err(err) => {
                    warn!("batch {}/{} failed after retries: {err}", i + 1, total);
                    parts.push(fallback_blocks(batch, &err.to_string()));
                    statuses.push(BatchStatus::Failed(err.to_string()));
                }
            }

            if i + 1 < total && !self.pacing.inter_batch_delay.is_zero() {
                thread::sleep(self.pacing.inter_batch_delay);
            }
        }

        RunSummary {
            body: parts.join("\n"),
            statuses,
        }
    }
}

/// One raw field dump per job in the batch, each tagged with the failure
/// marker and the causing error.
pub fn fallback_blocks(batch: &Batch, error: &str) -> String {
    let blocks: Vec<String> = batch
        .jobs
        .iter()
        .enumerate()
        .map(|(offset, job)| {
            format!(
                "{}summary: {FAILURE_MARKER} {error}]\n---",
                prompt::job_block(batch.start_index + offset, job)
            )
        })
        .collect();
    blocks.join("\n")
}
