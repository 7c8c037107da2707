use job_digest::jobs::load_jobs;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("job-digest-test-{}-{name}", std::process::id()));
    std::fs::write(&path, contents).expect("write temp jobs file");
    path
}

#[test]
fn loads_and_sorts_newest_first() {
    let raw = r#"[
        {"title": "A", "company": "U1", "location": "X", "date_posted": "2025-01-01",
         "description": "d", "job_url": "https://a"},
        {"title": "B", "company": "U2", "location": "X", "date_posted": "2025-03-01",
         "description": "d", "job_url": "https://b"},
        {"title": "C", "company": "U3", "location": "X", "date_posted": "2025-02-01",
         "description": "d", "job_url": "https://c"},
        {"title": "D", "company": "U4", "location": "X", "date_posted": "2025-03-01",
         "description": "d", "job_url": "https://d"}
    ]"#;
    let path = temp_file("sort.json", raw);
    let jobs = load_jobs(&path).expect("load jobs");
    let _ = std::fs::remove_file(&path);

    let titles: Vec<&str> = jobs.iter().map(|j| j.title.as_str()).collect();
    // Stable sort: B and D share a date and keep their scraper order.
    assert_eq!(titles, vec!["B", "D", "C", "A"]);
}

#[test]
fn missing_field_fails_the_load() {
    let raw = r#"[
        {"title": "A", "company": "U1", "location": "X", "date_posted": "2025-01-01",
         "job_url": "https://a"}
    ]"#;
    let path = temp_file("missing.json", raw);
    let result = load_jobs(&path);
    let _ = std::fs::remove_file(&path);
    assert!(result.is_err());
}

#[test]
fn extra_scraper_fields_are_ignored() {
    let raw = r#"[
        {"title": "A", "company": "U1", "location": "X", "date_posted": "2025-01-01",
         "description": "d", "job_url": "https://a", "salary_min": 90000, "is_remote": false}
    ]"#;
    let path = temp_file("extra.json", raw);
    let jobs = load_jobs(&path).expect("load jobs");
    let _ = std::fs::remove_file(&path);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].title, "A");
}
