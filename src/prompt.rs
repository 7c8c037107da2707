use crate::batch::Batch;
use crate::jobs::JobRecord;
use std::fmt::Write;

const PERSONA: &str = "I am a PhD graduate in materials engineering. My research uses electron \
microscopy to characterize materials at the microscale and connect their structure to their \
properties. I am looking for tenure-track faculty positions in North America.";

const INSTRUCTIONS: &str = "\
1. Drop jobs in entirely unrelated fields, e.g. humanities, medical school, or management roles.
2. Drop jobs that are not tenure-track, e.g. teaching faculty or adjunct professor positions.
3. Check whether the institution is R1; if it is not, drop the job.
4. If every job fails these filters, still keep the single most relevant one and summarize it.
5. Score each remaining job from one to three \u{1f31f} by relevance to my background.
6. Extract a one-sentence keyword summary from the description, ideally the specific research \
direction or department the job wants.";

const OUTPUT_FORMAT: &str = "\
**[title](job_url)** \u{1f31f}\u{1f31f}
- **Location**: institution at location
- **Date**: YYYY-MM-DD
- **Description**: summary
---";

const WORKED_EXAMPLE: &str = "\
---
**[Assistant Professor in Materials Science Department](http://linkedin.com/job)** \u{1f31f}\u{1f31f}\u{1f31f}
- **Location**: Harvard University at Boston, USA
- **Date**: 2025-01-11
- **Description**: Department of Materials Science is looking for a TT prof to work on the \
characterization of energy-related materials.
---";

/// Structured field dump for one posting, shared by the prompt and by
/// synthesized fallback output. `index` is the job's 1-based position in the
/// whole run, not within its batch.
pub fn job_block(index: usize, job: &JobRecord) -> String {
    format!(
        "job {index}:\n\
         title: {}\n\
         institution: {}\n\
         location: {}\n\
         posted: {}\n\
         description: {}\n\
         job_url: {}\n",
        job.title, job.company, job.location, job.date_posted, job.description, job.job_url
    )
}

/// Renders the full instruction prompt for one batch.
pub fn render(batch: &Batch) -> String {
    let mut blocks = String::new();
    for (offset, job) in batch.jobs.iter().enumerate() {
        let _ = writeln!(blocks, "{}", job_block(batch.start_index + offset, job));
    }

    format!(
        "{PERSONA} I will provide {count} potential job opportunities. Based on each job's \
description or job_url, generate a markdown-formatted summary per job:\n\
{INSTRUCTIONS}\n\
Answer in English and keep the original formatting. Append a markdown \"---\" separator after \
each job's answer.\n\
Make sure each job's information stays consistent with what was provided.\n\
Your output environment renders both markdown and LaTeX.\n\
The output format is:\n\n\
{OUTPUT_FORMAT}\n\
......\n\
{OUTPUT_FORMAT}\n\n\
The above is the summary format for each job. Keep your output format identical to it. Do not \
add anything extra; produce only summaries in the prescribed format.\n\n\
Here is an example:\n\n\
{WORKED_EXAMPLE}\n\n\
Generate summaries for the following jobs:\n\
{blocks}",
        count = batch.jobs.len(),
    )
}
