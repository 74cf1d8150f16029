//! Tests for CLI commands run against a JSON file store

mod common;

use clap::Parser;
use common::{ENV_MUTEX, EnvVarGuard, USER_A, USER_B, clock_at, temp_store};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use subtrack::cli::Cli;
use subtrack::commands::CommandContext;
use subtrack::config::Config;
use subtrack::error::SubtrackError;
use subtrack::store::JsonFileRepository;

/// Parse `args` as a command line and run it against `store`
async fn run(store: &Arc<JsonFileRepository>, args: &[&str]) -> Result<String, SubtrackError> {
    let cli = Cli::parse_from(std::iter::once("subtrack").chain(args.iter().copied()));
    CommandContext::new(store.clone(), cli.json)
        .with_clock(clock_at("10-2025"))
        .execute(&cli.command)
        .await
}

async fn run_json(store: &Arc<JsonFileRepository>, args: &[&str]) -> Value {
    let output = run(store, args).await.unwrap();
    serde_json::from_str(&output).unwrap()
}

#[tokio::test]
async fn test_add_then_total() {
    let (_dir, store) = temp_store();

    let created = run_json(
        &store,
        &[
            "--json",
            "add",
            "--service",
            "Yandex Plus",
            "--price",
            "400",
            "--user",
            USER_A,
            "--start",
            "07-2025",
        ],
    )
    .await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["start_month"], "07-2025");

    let total = run_json(
        &store,
        &[
            "--json",
            "total",
            "--start",
            "01-2025",
            "--end",
            "12-2025",
            "--user",
            USER_A,
            "--service",
            "Yandex Plus",
        ],
    )
    .await;
    assert_eq!(total, serde_json::json!({ "total_price": 1600 }));

    let table = run(&store, &["total", "--start", "01-2025", "--end", "12-2025"])
        .await
        .unwrap();
    assert!(table.contains("1,600"));
}

#[tokio::test]
async fn test_list_pagination() {
    let (_dir, store) = temp_store();
    for (service, user) in [("A", USER_A), ("B", USER_B), ("C", USER_A)] {
        run(
            &store,
            &[
                "add", "--service", service, "--price", "100", "--user", user, "--start",
                "01-2025",
            ],
        )
        .await
        .unwrap();
    }

    let page = run_json(&store, &["--json", "list", "--page", "2", "--limit", "2"]).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["data"][0]["service_name"], "C");

    let err = run(&store, &["list", "--limit", "101"]).await.unwrap_err();
    assert!(matches!(err, SubtrackError::InvalidPage(_)));
}

#[tokio::test]
async fn test_update_keeps_owner_and_delete_removes() {
    let (_dir, store) = temp_store();
    run(
        &store,
        &[
            "add", "--service", "Kinopoisk", "--price", "300", "--user", USER_B, "--start",
            "01-2025",
        ],
    )
    .await
    .unwrap();

    let updated = run_json(
        &store,
        &[
            "--json", "update", "1", "--service", "Kinopoisk", "--price", "350", "--start",
            "02-2025", "--end", "04-2025",
        ],
    )
    .await;
    assert_eq!(updated["user_id"], USER_B);
    assert_eq!(updated["price"], 350);

    let breakdown = run_json(
        &store,
        &[
            "--json",
            "total",
            "--start",
            "01-2025",
            "--end",
            "12-2025",
            "--breakdown",
        ],
    )
    .await;
    assert_eq!(breakdown["total_price"], 1050);

    let deleted = run(&store, &["delete", "1"]).await.unwrap();
    assert!(deleted.contains("Deleted subscription"));
    let err = run(&store, &["get", "1"]).await.unwrap_err();
    assert!(matches!(err, SubtrackError::NotFound(_)));
}

#[tokio::test]
async fn test_invalid_input_leaves_store_unchanged() {
    let (dir, store) = temp_store();

    let err = run(
        &store,
        &[
            "add", "--service", "  ", "--price", "100", "--user", USER_A, "--start", "01-2025",
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SubtrackError::InvalidSubscription(_)));

    let err = run(
        &store,
        &[
            "add", "--service", "A", "--price", "100", "--user", "nobody", "--start", "01-2025",
        ],
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SubtrackError::InvalidUserId(_)));

    let err = run(&store, &["total", "--start", "2025-01", "--end", "12-2025"])
        .await
        .unwrap_err();
    assert!(matches!(err, SubtrackError::InvalidWindow(_)));

    assert!(!dir.path().join("subscriptions.json").exists());
}

#[tokio::test]
async fn test_data_file_from_environment() {
    let _lock = ENV_MUTEX.lock().await;
    let mut guard = EnvVarGuard::new();
    guard.set("SUBTRACK_DATA_FILE", "/tmp/subtrack-env/subs.json");

    let cli = Cli::parse_from(["subtrack", "list"]);
    let config = Config::from_cli(cli.data_file.as_deref()).unwrap();
    assert_eq!(config.data_file, PathBuf::from("/tmp/subtrack-env/subs.json"));

    // An explicit flag beats the environment
    let cli = Cli::parse_from(["subtrack", "--data-file", "/tmp/flag.json", "list"]);
    assert_eq!(cli.data_file, Some(PathBuf::from("/tmp/flag.json")));
}

#[tokio::test]
async fn test_default_data_file_without_environment() {
    let _lock = ENV_MUTEX.lock().await;
    let mut guard = EnvVarGuard::new();
    guard.remove("SUBTRACK_DATA_FILE");

    let cli = Cli::parse_from(["subtrack", "list"]);
    assert!(cli.data_file.is_none());
    if let Ok(config) = Config::from_cli(None) {
        assert!(config.data_file.ends_with("subtrack/subscriptions.json"));
    }
}
