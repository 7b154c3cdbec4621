//! Integration tests for the locator public API.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use httpmock::prelude::*;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use workflow_dispatch::config::Settings;
use workflow_dispatch::github::{GitHubClient, Repository};
use workflow_dispatch::locator::{LocalLocator, Locator, RemoteLocator};
use workflow_dispatch::DispatchError;

const DEPLOY: &str = r#"
on:
  workflow_dispatch:
    inputs:
      target:
        type: choice
        options: [staging, production]
        default: staging
"#;

fn client_for(server: &MockServer) -> GitHubClient {
    let settings = Settings::for_api_url(&server.base_url()).with_timeout(Duration::from_secs(5));
    GitHubClient::new(&settings).unwrap()
}

fn listing(server: &MockServer, paths: &[&str]) {
    let workflows: Vec<serde_json::Value> = paths
        .iter()
        .map(|p| serde_json::json!({"name": p, "path": p}))
        .collect();
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/widgets/actions/workflows");
        then.status(200).json_body(serde_json::json!({
            "total_count": workflows.len(),
            "workflows": workflows
        }));
    });
}

fn content(server: &MockServer, path: &str, yaml: &str) {
    let path = format!("/repos/octo/widgets/contents/{}", path);
    let encoded = STANDARD.encode(yaml);
    server.mock(|when, then| {
        when.method(GET).path(path);
        then.status(200).json_body(serde_json::json!({
            "content": encoded,
            "encoding": "base64"
        }));
    });
}

#[test]
fn remote_locator_over_http() {
    let server = MockServer::start();
    listing(
        &server,
        &[
            ".github/workflows/deploy.yml",
            ".github/workflows/ci.yml",
            ".github/workflows/gone.yml",
        ],
    );
    content(&server, ".github/workflows/deploy.yml", DEPLOY);
    content(&server, ".github/workflows/ci.yml", "on: push\n");
    // gone.yml has no mock and answers 404.

    let client = client_for(&server);
    let catalog = RemoteLocator::new(&client, Repository::new("octo", "widgets"), None)
        .list_workflows()
        .unwrap();

    assert_eq!(catalog.keys().collect::<Vec<_>>(), ["deploy.yml"]);
    let target = &catalog["deploy.yml"].inputs[0];
    assert_eq!(target.options().unwrap(), ["staging", "production"]);
    assert_eq!(target.default, "staging");
}

#[test]
fn remote_locator_reads_at_ref() {
    let server = MockServer::start();
    listing(&server, &[".github/workflows/deploy.yml"]);
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/widgets/contents/.github/workflows/deploy.yml")
            .query_param("ref", "refs/heads/release");
        then.status(200).json_body(serde_json::json!({
            "content": STANDARD.encode(DEPLOY),
            "encoding": "base64"
        }));
    });

    let client = client_for(&server);
    let catalog = RemoteLocator::new(
        &client,
        Repository::new("octo", "widgets"),
        Some("refs/heads/release".to_string()),
    )
    .list_workflows()
    .unwrap();

    mock.assert();
    assert!(catalog.contains_key("deploy.yml"));
}

#[test]
fn remote_locator_fails_on_server_error() {
    let server = MockServer::start();
    listing(
        &server,
        &[".github/workflows/deploy.yml", ".github/workflows/broken.yml"],
    );
    content(&server, ".github/workflows/deploy.yml", DEPLOY);
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/widgets/contents/.github/workflows/broken.yml");
        then.status(500)
            .json_body(serde_json::json!({"message": "Server Error"}));
    });

    let client = client_for(&server);
    let err = RemoteLocator::new(&client, Repository::new("octo", "widgets"), None)
        .list_workflows()
        .unwrap_err();

    assert!(matches!(err, DispatchError::Api { status: 500, .. }));
}

#[test]
fn local_and_remote_agree() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join(".git")).unwrap();
    let workflows = temp.path().join(".github/workflows");
    fs::create_dir_all(&workflows).unwrap();
    fs::write(workflows.join("deploy.yml"), DEPLOY).unwrap();
    fs::write(workflows.join("ci.yml"), "on: push\n").unwrap();

    let local = LocalLocator::new(temp.path()).list_workflows().unwrap();

    let server = MockServer::start();
    listing(
        &server,
        &[".github/workflows/deploy.yml", ".github/workflows/ci.yml"],
    );
    content(&server, ".github/workflows/deploy.yml", DEPLOY);
    content(&server, ".github/workflows/ci.yml", "on: push\n");
    let client = client_for(&server);
    let remote = RemoteLocator::new(&client, Repository::new("octo", "widgets"), None)
        .list_workflows()
        .unwrap();

    assert_eq!(local, remote);
}

#[test]
fn remote_locator_skips_null_paths() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/octo/widgets/actions/workflows");
        then.status(200).json_body(serde_json::json!({
            "total_count": 2,
            "workflows": [
                {"name": "Dependabot Updates", "path": null},
                {"name": "Deploy", "path": ".github/workflows/deploy.yml"}
            ]
        }));
    });
    content(&server, ".github/workflows/deploy.yml", DEPLOY);

    let client = client_for(&server);
    let catalog = RemoteLocator::new(&client, Repository::new("octo", "widgets"), None)
        .list_workflows()
        .unwrap();

    assert_eq!(catalog.keys().collect::<Vec<_>>(), ["deploy.yml"]);
}
