use job_digest::model::{ModelError, RetryPolicy};
use std::time::Duration;

fn timeout() -> ModelError {
    ModelError::Timeout {
        timeout_seconds: 30,
        attempts: 1,
    }
}

#[test]
fn retries_timeouts_with_exponential_backoff() {
    let base = Duration::from_secs(5);
    let policy = RetryPolicy::new(5, base).unwrap();

    let mut calls = 0u32;
    let mut sleeps = Vec::new();
    let result = policy.run(
        || {
            calls += 1;
            if calls <= 4 { Err(timeout()) } else { Ok("done") }
        },
        |d| sleeps.push(d),
    );

    assert_eq!(result.unwrap(), "done");
    assert_eq!(calls, 5);
    assert_eq!(sleeps, vec![base, base * 2, base * 4, base * 8]);
}

#[test]
fn exhausted_timeouts_report_attempt_count() {
    let policy = RetryPolicy::new(2, Duration::from_secs(1)).unwrap();

    let mut calls = 0u32;
    let mut sleeps = Vec::new();
    let result: Result<(), _> = policy.run(
        || {
            calls += 1;
            Err(timeout())
        },
        |d| sleeps.push(d),
    );

    assert_eq!(calls, 2);
    assert_eq!(sleeps, vec![Duration::from_secs(1)]);
    match result.unwrap_err() {
        ModelError::Timeout { attempts, .. } => assert_eq!(attempts, 2),
        other => panic!("expected timeout error, got {other}"),
    }
}

#[test]
fn non_timeout_errors_share_the_backoff_schedule() {
    let base = Duration::from_secs(3);
    let policy = RetryPolicy::new(3, base).unwrap();

    let mut sleeps = Vec::new();
    let result: Result<(), _> = policy.run(
        || {
            Err(ModelError::Status {
                status: 500,
                body: "boom".into(),
            })
        },
        |d| sleeps.push(d),
    );

    assert_eq!(sleeps, vec![base, base * 2]);
    match result.unwrap_err() {
        ModelError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other}"),
    }
}

#[test]
fn success_on_first_attempt_never_sleeps() {
    let policy = RetryPolicy::new(5, Duration::from_secs(5)).unwrap();
    let mut sleeps = Vec::new();
    let result = policy.run(|| Ok(42), |d| sleeps.push(d));
    assert_eq!(result.unwrap(), 42);
    assert!(sleeps.is_empty());
}

#[test]
fn zero_attempts_is_rejected() {
    assert!(RetryPolicy::new(0, Duration::from_secs(1)).is_err());
}
