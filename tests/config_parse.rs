use job_digest::config::Config;

#[test]
fn parse_example_config() {
    let raw = include_str!("../job-digest.example.toml");
    let cfg: Config = toml::from_str(raw).expect("parse TOML");
    assert!(cfg.model.retry_count >= 1);
    assert!(!cfg.model.model.is_empty());
    assert!(!cfg.output.out_dir.is_empty());
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg: Config = toml::from_str("").expect("parse empty TOML");
    assert_eq!(cfg.model.model, "gemini-2.5-flash");
    assert_eq!(cfg.model.retry_count, 5);
    assert_eq!(cfg.model.retry_delay_seconds, 5);
    assert_eq!(cfg.model.timeout_seconds, 600);
    assert_eq!(cfg.output.report_filename, "jobs-daily.md");
    assert_eq!(cfg.logging.level, "info");
}
