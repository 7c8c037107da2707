use crate::jobs::JobRecord;
use serde_json::json;

/// One model call covers at most this many postings.
pub const MAX_BATCH_SIZE: usize = 20;

#[derive(Debug, Clone)]
pub struct Batch<'a> {
    pub jobs: &'a [JobRecord],
    /// 1-based index of the batch's first job within the whole run.
    pub start_index: usize,
}

impl Batch<'_> {
    /// 1-based inclusive index of the batch's last job.
    pub fn end_index(&self) -> usize {
        self.start_index + self.jobs.len() - 1
    }
}

#[derive(Debug, Clone)]
pub struct BatchPlan<'a> {
    pub job_count: usize,
    pub batch_size: usize,
    pub batches: Vec<Batch<'a>>,
}

impl<'a> BatchPlan<'a> {
    /// Partitions `jobs` into contiguous batches of at most `batch_size`,
    /// preserving order. The batches cover the input exactly; the last one may
    /// be short. A zero `batch_size` is a caller error.
    pub fn new(jobs: &'a [JobRecord], batch_size: usize) -> Self {
        debug_assert!(batch_size > 0, "batch_size must be positive");
        let mut batches = Vec::new();
        let mut start = 0;
        while start < jobs.len() {
            let end = (start + batch_size).min(jobs.len());
            batches.push(Batch {
                jobs: &jobs[start..end],
                start_index: start + 1,
            });
            start = end;
        }
        Self {
            job_count: jobs.len(),
            batch_size,
            batches,
        }
    }

    pub fn describe(&self) -> serde_json::Value {
        json!({
            "job_count": self.job_count,
            "batch_size": self.batch_size,
            "batches": self
                .batches
                .iter()
                .map(|b| {
                    json!({
                        "start_index": b.start_index,
                        "end_index": b.end_index(),
                        "jobs": b.jobs.len(),
                    })
                })
                .collect::<Vec<_>>(),
        })
    }
}
