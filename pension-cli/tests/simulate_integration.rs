use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use mockito::Matcher;
use pension_cli::answers_file::AnswersFile;
use pension_cli::session::{SessionError, run_session};
use pension_core::{AnswerUpdate, StepKind};
use pension_http::HttpBackend;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(name: &str) -> AnswerUpdate {
    let dir = fixtures();
    AnswersFile::load(&dir.join(name))
        .expect("fixture should parse")
        .into_update(&dir)
        .expect("fixture jobs should import")
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 4, 9, 15, 0).unwrap()
}

#[test]
fn answers_fixture_pulls_in_jobs_csv_in_file_order() {
    let update = load("answers.toml");

    let jobs = update.jobs.expect("jobs from CSV");
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].company_name(), Some("Orlen"));
    assert_eq!(jobs[1].base_salary(), dec!(4150.49));
}

#[tokio::test]
async fn simulate_posts_assembled_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/calculations")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "calculationDate": "2025-10-04",
            "calculationTime": "09:15:00",
            "sex": "male",
            "age": 45,
            "salary": "8500.00",
            "isSickLeaveIncluded": true,
            "yearWorkStart": 2002,
            "yearDesiredRetirement": 2047,
            "postalCode": "00-950",
            "jobs": [
                {"startDate": "01-09-2002", "endDate": "28-02-2011", "baseSalary": 4150},
                {"startDate": "01-03-2011", "baseSalary": 8500}
            ],
            "leaves": []
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"calculationId":"c-1","nominalPension":"6120.00","realPension":"4010.55","replacementRate":"52.3"}"#,
        )
        .create_async()
        .await;
    let backend = HttpBackend::new(&server.url(), Duration::from_secs(5)).unwrap();

    let report = run_session(load("answers.toml"), &backend, Duration::from_secs(10), now())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(report.steps.len(), 9);
    assert_eq!(report.steps[5].kind, StepKind::JobsManager);
    assert!(!report.results.is_demo);
    assert_eq!(report.results.real_pension, dec!(4010.55));
    assert_eq!(report.job_summary.as_ref().map(|s| s.count), Some(2));
}

#[tokio::test]
async fn simulate_falls_back_when_service_errors() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/calculations")
        .with_status(500)
        .create_async()
        .await;
    let backend = HttpBackend::new(&server.url(), Duration::from_secs(5)).unwrap();

    let report = run_session(load("answers.toml"), &backend, Duration::from_secs(10), now())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(report.results.is_demo);
    assert!(report.to_string().contains("demo figures"));
}

#[tokio::test]
async fn invalid_answers_never_reach_the_service() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/calculations")
        .expect(0)
        .create_async()
        .await;
    let backend = HttpBackend::new(&server.url(), Duration::from_secs(5)).unwrap();

    let err = run_session(load("invalid_answers.toml"), &backend, Duration::from_secs(10), now())
        .await
        .unwrap_err();

    mock.assert_async().await;
    match err {
        SessionError::Incomplete { step, errors, .. } => {
            assert_eq!(step, 2);
            assert_eq!(errors.errors()[0].field, "age");
        }
        other => panic!("expected Incomplete, got {other:?}"),
    }
}
