use std::sync::Arc;
use std::time::Duration;

use jiff::{SignedDuration, Timestamp};
use sqlx::postgres::PgPoolOptions;
use tinylink_core::{NewLink, ShortCode};
use tinylink_storage::{PgRepository, ReadRepository, Repository, StorageError};
use tinylink_test_infra::postgres::{PostgresConfig, PostgresServer};

struct Fixture {
    _postgres: PostgresServer,
    repo: PgRepository,
}

impl Fixture {
    async fn start() -> Self {
        let postgres = PostgresServer::new(PostgresConfig::builder().build())
            .await
            .expect("start postgres");
        let url = postgres.database_url().await.expect("postgres url");
        let pool = connect_with_retry(&url).await;

        let repo = PgRepository::new(pool);
        repo.migrate().await.expect("create schema");
        // applying twice must be harmless
        repo.migrate().await.expect("re-apply schema");

        Self {
            _postgres: postgres,
            repo,
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::PgPool {
    let mut last_error = None;

    for _ in 0..20 {
        match PgPoolOptions::new().max_connections(5).connect(url).await {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect postgres: {last_error:?}");
}

fn code(value: &str) -> ShortCode {
    ShortCode::new_unchecked(value)
}

fn new_link(c: &str, url: &str, created_at: Timestamp) -> NewLink {
    NewLink {
        code: code(c),
        target_url: url.to_string(),
        created_at,
    }
}

#[tokio::test]
async fn insert_and_get_record() {
    let fixture = Fixture::start().await;
    let created = Timestamp::now();

    let inserted = fixture
        .repo
        .insert(new_link("abc123", "https://example.com", created))
        .await
        .unwrap();
    assert_eq!(inserted.code.as_str(), "abc123");
    assert_eq!(inserted.total_clicks, 0);
    assert_eq!(inserted.last_clicked, None);

    let got = fixture.repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(got, inserted);
    // microsecond storage keeps the timestamp exact at that precision
    assert_eq!(got.created_at.as_microsecond(), created.as_microsecond());
}

#[tokio::test]
async fn insert_conflicts_when_code_already_exists() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(new_link("abc123", "https://one.example", Timestamp::now()))
        .await
        .unwrap();

    let err = fixture
        .repo
        .insert(new_link("abc123", "https://two.example", Timestamp::now()))
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::Conflict(_)));
}

#[tokio::test]
async fn unique_constraint_settles_concurrent_inserts() {
    let fixture = Fixture::start().await;
    let repo = Arc::new(fixture.repo.clone());

    let mut handles = vec![];
    for i in 0..8 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.insert(new_link(
                "race00",
                &format!("https://example{i}.com"),
                Timestamp::now(),
            ))
            .await
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(err) => assert!(matches!(err, StorageError::Conflict(_))),
        }
    }
    assert_eq!(succeeded, 1);
}

#[tokio::test]
async fn list_orders_newest_first() {
    let fixture = Fixture::start().await;
    let base = Timestamp::now();

    for (c, offset) in [("aaaaaa", 0), ("cccccc", 20), ("bbbbbb", 10)] {
        fixture
            .repo
            .insert(new_link(
                c,
                "https://example.com",
                base + SignedDuration::from_secs(offset),
            ))
            .await
            .unwrap();
    }

    let codes: Vec<String> = fixture
        .repo
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.code.to_string())
        .collect();
    assert_eq!(codes, ["cccccc", "bbbbbb", "aaaaaa"]);
}

#[tokio::test]
async fn record_click_is_a_relative_increment() {
    let fixture = Fixture::start().await;
    fixture
        .repo
        .insert(new_link("abc123", "https://example.com", Timestamp::now()))
        .await
        .unwrap();

    let repo = Arc::new(fixture.repo.clone());
    let mut handles = vec![];
    for _ in 0..20 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.record_click(&code("abc123"), Timestamp::now())
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().as_deref(), Some("https://example.com"));
    }

    let record = fixture.repo.get(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(record.total_clicks, 20);
    assert!(record.last_clicked.is_some());
}

#[tokio::test]
async fn record_click_unknown_code_touches_nothing() {
    let fixture = Fixture::start().await;

    let target = fixture
        .repo
        .record_click(&code("nope00"), Timestamp::now())
        .await
        .unwrap();
    assert!(target.is_none());
}

#[tokio::test]
async fn delete_returns_prior_state_and_removes_row() {
    let fixture = Fixture::start().await;

    fixture
        .repo
        .insert(new_link("abc123", "https://example.com", Timestamp::now()))
        .await
        .unwrap();
    fixture
        .repo
        .record_click(&code("abc123"), Timestamp::now())
        .await
        .unwrap();

    let deleted = fixture.repo.delete(&code("abc123")).await.unwrap().unwrap();
    assert_eq!(deleted.total_clicks, 1);

    assert!(fixture.repo.get(&code("abc123")).await.unwrap().is_none());
    assert!(!fixture.repo.exists(&code("abc123")).await.unwrap());
    assert!(fixture.repo.delete(&code("abc123")).await.unwrap().is_none());
}
