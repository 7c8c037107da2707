use job_digest::{jobs::JobRecord, report, summarize::FAILURE_MARKER};

fn mk_job(i: usize) -> JobRecord {
    JobRecord {
        title: format!("Professor {i}"),
        company: format!("College {i}"),
        location: "City, USA".into(),
        date_posted: "2025-05-01".into(),
        description: format!("teaching and research {i}"),
        job_url: format!("https://jobs.example.com/{i}"),
    }
}

#[test]
fn render_is_byte_stable_for_identical_inputs() {
    let body = "**[Some Job](https://x)** \u{1f31f}\n---";
    let a = report::render("gemini-2.5-flash", "2025-06-01 12:00:00", body);
    let b = report::render("gemini-2.5-flash", "2025-06-01 12:00:00", body);
    assert_eq!(a, b);
}

#[test]
fn render_keeps_body_verbatim_under_fixed_header() {
    let body = "line one\n\nweird **markers** and --- rules\n";
    let doc = report::render("stub-model", "2025-06-01 12:00:00", body);

    assert!(doc.starts_with("# Job Digest\n"));
    assert!(doc.contains("**stub-model**"));
    assert!(doc.contains("**2025-06-01 12:00:00**"));
    assert!(doc.contains("---\n"));
    assert!(doc.contains(body));
}

#[test]
fn degraded_report_dumps_every_job_with_the_error() {
    let jobs: Vec<JobRecord> = (0..3).map(mk_job).collect();
    let doc = report::render_degraded("2025-06-01 12:00:00", &jobs, "connection refused");

    assert!(doc.starts_with("# Job Digest\n"));
    for (i, job) in jobs.iter().enumerate() {
        assert!(doc.contains(&format!("job {}:", i + 1)));
        assert!(doc.contains(&job.title));
        assert!(doc.contains(&job.job_url));
    }
    assert!(doc.contains(FAILURE_MARKER));
    assert!(doc.contains("connection refused"));
}
