use std::io::{
    Read,
    Write,
};
use std::net::{
    TcpListener,
    TcpStream,
};
use std::thread;

use std::time::Duration;

use runboard_api::RetryPolicy;
use runboard_github::{
    ActionsBackend,
    GitHubActionsClient,
    GitHubError,
    GitHubSettings,
};
use secrecy::SecretString;

fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Reads one full request (headers plus `Content-Length` bytes of body).
fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buffer = [0u8; 1024];

    loop {
        let read = stream.read(&mut buffer).unwrap_or(0);
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..read]);

        let text = String::from_utf8_lossy(&data).into_owned();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                return text;
            }
        }
    }

    String::from_utf8_lossy(&data).into_owned()
}

fn respond(stream: &mut TcpStream, status_line: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\n\
         Content-Type: application/json\r\nConnection: close\r\n\r\n{body}",
        body.len(),
    );
    stream.write_all(response.as_bytes()).unwrap();
}

fn serve_once(
    status_line: &'static str, body: &'static str,
) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let request = read_request(&mut stream);
        respond(&mut stream, status_line, body);
        request
    });

    (format!("http://{addr}"), server)
}

/// Closes the first `dropped` connections without answering, then serves
/// `body` with a 200. Returns every request it read.
fn serve_after_dropping(
    dropped: usize, body: &'static str,
) -> (String, thread::JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let addr = listener.local_addr().unwrap();
    let server = thread::spawn(move || {
        let mut requests = Vec::new();
        for _ in 0..dropped {
            let (mut stream, _) = listener.accept().expect("accept");
            requests.push(read_request(&mut stream));
        }
        let (mut stream, _) = listener.accept().expect("accept");
        requests.push(read_request(&mut stream));
        respond(&mut stream, "200 OK", body);
        requests
    });

    (format!("http://{addr}"), server)
}

const RUNS_BODY: &str = r#"{
    "total_count": 2,
    "workflow_runs": [
        {"id": 12, "name": "Deploy", "status": "in_progress", "run_number": 8},
        {"id": 11, "name": "Deploy", "status": "completed", "run_number": 7}
    ]
}"#;

fn client_for(api_url: &str) -> GitHubActionsClient {
    install_crypto_provider();
    let settings = GitHubSettings::new(
        api_url,
        "acme/site",
        "",
        "deploy.yml",
        "main",
        SecretString::from("ghp_test".to_string()),
    )
    .unwrap();
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    GitHubActionsClient::with_http(settings, http)
        .unwrap()
        .with_retry_policy(RetryPolicy::none())
}

#[tokio::test]
async fn dispatch_posts_ref_with_bearer_token() {
    let (api_url, server) = serve_once("204 No Content", "");
    let client = client_for(&api_url);

    client.dispatch().await.unwrap();

    let request = server.join().unwrap();
    let mut lines = request.lines();
    assert_eq!(
        lines.next().unwrap(),
        "POST /repos/acme/site/actions/workflows/deploy.yml/dispatches HTTP/1.1"
    );

    let lowered = request.to_ascii_lowercase();
    assert!(lowered.contains("authorization: bearer ghp_test"));
    assert!(lowered.contains("accept: application/vnd.github.v3+json"));
    assert!(request.ends_with(r#"{"ref":"main"}"#));
}

#[tokio::test]
async fn dispatch_without_trigger_is_rejected_with_422() {
    let (api_url, server) = serve_once(
        "422 Unprocessable Entity",
        r#"{
            "message": "Workflow does not have 'workflow_dispatch' trigger",
            "documentation_url": "https://docs.github.com/rest"
        }"#,
    );
    let client = client_for(&api_url);

    let err = client.dispatch().await.unwrap_err();
    server.join().unwrap();

    assert_eq!(
        err,
        GitHubError::Rejected {
            status: 422,
            message: "Workflow does not have 'workflow_dispatch' trigger".to_string(),
        }
    );
    assert_eq!(err.http_status(), 422);
}

#[tokio::test]
async fn dispatch_to_closed_port_is_a_transport_error() {
    let client = client_for("http://127.0.0.1:9");

    let err = client.dispatch().await.unwrap_err();
    assert!(matches!(err, GitHubError::Transport(_)));
    assert_eq!(err.http_status(), 502);
}

#[tokio::test]
async fn listing_from_closed_port_is_a_transport_error() {
    let client = client_for("http://127.0.0.1:9");

    let err = client.list_runs().await.unwrap_err();
    assert!(matches!(err, GitHubError::Transport(_)));
}

#[tokio::test]
async fn listing_requests_the_workflow_runs_route_with_per_page() {
    let (api_url, server) = serve_once("200 OK", RUNS_BODY);
    let client = client_for(&api_url);

    let runs = client.list_runs().await.unwrap();

    let request = server.join().unwrap();
    assert_eq!(
        request.lines().next().unwrap(),
        "GET /repos/acme/site/actions/workflows/deploy.yml/runs?per_page=20 HTTP/1.1"
    );
    assert_eq!(runs.total_count, Some(2));
    assert_eq!(runs.workflow_runs.len(), 2);
    assert_eq!(runs.workflow_runs[0].run_number, Some(8));
}

#[tokio::test]
async fn listing_retries_after_a_dropped_connection() {
    let (api_url, server) = serve_after_dropping(1, RUNS_BODY);
    let client = client_for(&api_url).with_retry_policy(RetryPolicy::new(
        2,
        Duration::from_millis(10),
        false,
    ));

    let runs = client.list_runs().await.unwrap();

    let requests = server.join().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests
        .iter()
        .all(|r| r.starts_with("GET /repos/acme/site/actions/workflows/deploy.yml/runs")));
    assert_eq!(runs.workflow_runs.len(), 2);
}

#[tokio::test]
async fn listing_without_retries_fails_on_a_dropped_connection() {
    let (api_url, _server) = serve_after_dropping(1, RUNS_BODY);
    let client = client_for(&api_url);

    let err = client.list_runs().await.unwrap_err();
    assert!(matches!(err, GitHubError::Transport(_)));
}
