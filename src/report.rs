use crate::jobs::JobRecord;
use crate::prompt;
use crate::summarize::FAILURE_MARKER;
use std::fmt::Write;

/// Renders the final digest: fixed header, attribution, provenance, a rule,
/// then the summary body verbatim. Never inspects the body.
pub fn render(model: &str, generated_at: &str, body: &str) -> String {
    format!(
        "# Job Digest\n\n\
         - This report was automatically generated by **{model}** at **{generated_at}**.\n\
         - It covers recent tenure-track openings in engineering-related fields from Google, \
         LinkedIn and Indeed.\n\
         - Listings collected with [JobSpy](https://github.com/speedyapply/JobSpy).\n\n\
         ---\n\
         {body}\n"
    )
}

/// Degraded whole-run report: when summarization cannot produce a digest at
/// all, every input job is dumped raw, tagged with the causing error.
pub fn render_degraded(generated_at: &str, jobs: &[JobRecord], error: &str) -> String {
    let mut out = format!(
        "# Job Digest\n\n\
         Generated at: {generated_at}\n\n\
         **An error occurred while generating summaries; the raw job listings follow:**\n\n"
    );
    for (i, job) in jobs.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}summary: {FAILURE_MARKER} {error}]",
            prompt::job_block(i + 1, job)
        );
    }
    out
}
