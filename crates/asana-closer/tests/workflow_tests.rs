//! End-to-end runs of the closer against a mock Asana API.

use asana_closer::workflow::connect_asana;
use asana_closer::{
    run, ClientConfig, Config, Credential, Invocation, Outcome, PushEvent, StepStatus,
};
use clap::Parser;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "1/1234567890:test-token";

fn push(message: &str) -> PushEvent {
    PushEvent {
        commit_message: message.to_string(),
        branch: "main".to_string(),
        repository: "demo".to_string(),
        commit_url: "http://x/1".to_string(),
        actor: Some("alice".to_string()),
    }
}

fn invocation(message: &str) -> Invocation {
    Invocation {
        event: push(message),
        credential: Credential::new(TOKEN),
        dry_run: false,
    }
}

async fn run_against(server: &MockServer, invocation: Invocation) -> Outcome {
    let config = ClientConfig {
        api_url: server.uri(),
        timeout_secs: 2,
    };
    run(invocation, |credential| async move {
        connect_asana(credential, &config).await
    })
    .await
    .unwrap()
}

async fn mount_me(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "gid": "55", "name": "Asana Bot" }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_fixes_comments_then_closes() {
    let server = MockServer::start().await;
    mount_me(&server).await;
    Mock::given(method("POST"))
        .and(path("/tasks/123/stories"))
        .and(body_json(json!({
            "data": { "text": "alice pushed to branch main of demo (http://x/1): Fixes #123" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "gid": "900", "text": "alice pushed to branch main of demo (http://x/1): Fixes #123" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/123"))
        .and(body_json(json!({ "data": { "completed": true } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "gid": "123", "completed": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run_against(&server, invocation("Fixes #123")).await;

    let Outcome::Processed(report) = &outcome else {
        panic!("expected processed outcome, got {outcome:?}");
    };
    assert_eq!(report.task.as_str(), "123");
    assert!(report.is_complete());
    assert_eq!(outcome.exit_code(true), 0);

    let requests = server.received_requests().await.unwrap();
    let calls: Vec<(String, String)> = requests
        .iter()
        .map(|r| (r.method.to_string(), r.url.path().to_string()))
        .collect();
    assert_eq!(
        calls,
        vec![
            ("GET".to_string(), "/users/me".to_string()),
            ("POST".to_string(), "/tasks/123/stories".to_string()),
            ("PUT".to_string(), "/tasks/123".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_no_reference_makes_no_requests() {
    let server = MockServer::start().await;

    let outcome = run_against(&server, invocation("Refactored login flow")).await;

    assert_eq!(outcome, Outcome::NoReference);
    assert_eq!(outcome.exit_code(true), 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_credential_makes_no_requests() {
    let server = MockServer::start().await;
    let mut invocation = invocation("Fixes #123");
    invocation.credential = None;

    let outcome = run_against(&server, invocation).await;

    assert_eq!(outcome, Outcome::MissingCredential);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_credential_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "message": "Not Authorized" }]
        })))
        .mount(&server)
        .await;

    let config = ClientConfig {
        api_url: server.uri(),
        timeout_secs: 2,
    };
    let err = run(invocation("Fixes #123"), |credential| async move {
        connect_asana(credential, &config).await
    })
    .await
    .unwrap_err();

    assert!(err.is_authentication());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "only the authentication call is made");
}

#[tokio::test]
async fn test_comment_failure_still_closes() {
    let server = MockServer::start().await;
    mount_me(&server).await;
    Mock::given(method("POST"))
        .and(path("/tasks/77/stories"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errors": [{ "message": "Forbidden" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "gid": "77", "completed": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = run_against(&server, invocation("closed: #77")).await;

    let Outcome::Processed(report) = &outcome else {
        panic!("expected processed outcome, got {outcome:?}");
    };
    assert!(matches!(report.comment, StepStatus::Failed(ref m) if m.contains("Forbidden")));
    assert_eq!(report.close, StepStatus::Done);
    assert_eq!(outcome.exit_code(false), 0);
    assert_eq!(outcome.exit_code(true), 1);
}

#[tokio::test]
async fn test_event_payload_drives_run() {
    let server = MockServer::start().await;
    mount_me(&server).await;
    Mock::given(method("POST"))
        .and(path("/tasks/4242/stories"))
        .and(body_json(json!({
            "data": {
                "text": "carol pushed to branch release/1.2 of demo (https://github.com/acme/demo/commit/abc): Solved #4242"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "gid": "1" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tasks/4242"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "gid": "4242", "completed": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = json!({
        "ref": "refs/heads/release/1.2",
        "repository": { "name": "demo", "full_name": "acme/demo" },
        "pusher": { "name": "carol", "email": "carol@example.com" },
        "head_commit": {
            "id": "abc",
            "message": "Solved #4242",
            "url": "https://github.com/acme/demo/commit/abc"
        }
    });
    let event_path = std::env::temp_dir().join(format!(
        "asana-closer-event-{}.json",
        std::process::id()
    ));
    std::fs::write(&event_path, payload.to_string()).unwrap();

    let event_arg = event_path.to_string_lossy().to_string();
    let uri = server.uri();
    let config = Config::try_parse_from([
        "asana-closer",
        "--asana-pat",
        TOKEN,
        "--event-path",
        event_arg.as_str(),
        "--api-url",
        uri.as_str(),
        "--ref",
        "refs/heads/release/1.2",
        "--repository",
        "acme/demo",
        "--actor",
        "carol",
    ])
    .unwrap();

    let invocation = config.invocation().unwrap();
    std::fs::remove_file(&event_path).ok();
    let outcome = run_against(&server, invocation).await;

    assert!(matches!(outcome, Outcome::Processed(ref r) if r.is_complete()));
}
