//! Integration tests for CLI behavior against a scripted transfer server.
//!
//! The default behavior is quiet (no logs). Use -v/--verbose to enable logs.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Serve the scripted status bodies in order (repeating the last) on a background thread.
fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            let index = counter.fetch_add(1, Ordering::SeqCst);
            let (code, body) = responses[index.min(responses.len() - 1)];

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let response = format!(
                "HTTP/1.1 {} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                code,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    (base_url, hits)
}

/// Run xferwatch with an isolated HOME and working directory so no real config is picked up.
fn run_xferwatch(args: &[&str]) -> Output {
    let home = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_xferwatch"))
        .args(args)
        .env("HOME", home.path())
        .current_dir(home.path())
        .output()
        .expect("Failed to execute xferwatch")
}

fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}", listener.local_addr().unwrap())
}

#[test]
fn test_status_prints_current_transfer() {
    let (url, _) = serve(vec![(
        200,
        r#"{"active": true, "type": "send", "progress": 25, "message": "Connecting to server...", "filename": "report.pdf", "error": null}"#,
    )]);

    let output = run_xferwatch(&["status", "--url", &url]);
    assert!(
        output.status.success(),
        "status failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Transfer in progress: Connecting to server..."));
    assert!(stdout.contains("File: report.pdf"));
    assert!(stdout.contains("Progress: 25%"));
    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
}

#[test]
fn test_status_json_output() {
    let (url, _) = serve(vec![(200, r#"{"active": false, "message": "Ready"}"#)]);

    let output = run_xferwatch(&["status", "--url", &url, "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(json["active"], false);
    assert_eq!(json["message"], "Ready");
}

#[test]
fn test_status_unreachable_server_fails() {
    let output = run_xferwatch(&["status", "--url", &refused_url()]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to fetch status"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_url_is_rejected() {
    let output = run_xferwatch(&["status", "--url", "ftp://box"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("server.base_url"), "stderr: {}", stderr);
}

#[test]
fn test_clear_resets_and_prints_status() {
    let (url, hits) = serve(vec![
        (302, ""),
        (200, r#"{"active": false, "progress": 0, "message": "Ready"}"#),
    ]);

    let output = run_xferwatch(&["clear", "--url", &url]);
    assert!(
        output.status.success(),
        "clear failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Transfer status cleared."));
    assert!(stdout.contains("Ready"));
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_clear_server_error_fails() {
    let (url, hits) = serve(vec![(500, "Internal Server Error")]);

    let output = run_xferwatch(&["clear", "--url", &url]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to clear status"), "stderr: {}", stderr);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_watch_without_transfer_exits_immediately() {
    let (url, hits) = serve(vec![(200, r#"{"active": false, "message": "Ready"}"#)]);

    let output = run_xferwatch(&["watch", "--url", &url]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No transfer in progress."));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_watch_until_transfer_completes() {
    let (url, hits) = serve(vec![
        (200, r#"{"active": true, "progress": 25, "message": "Sending report.pdf..."}"#),
        (200, r#"{"active": true, "progress": 25, "message": "Connecting to server..."}"#),
        (
            200,
            r#"{"active": false, "progress": 100, "message": "File report.pdf sent successfully!"}"#,
        ),
    ]);

    let output = run_xferwatch(&[
        "watch",
        "--url",
        &url,
        "--interval-ms",
        "50",
        "--reload-delay-ms",
        "20",
        "--json",
    ]);
    assert!(
        output.status.success(),
        "watch failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(report["outcome"], "completed");
    assert_eq!(report["ticks"], 2);
    assert_eq!(report["reloaded"], true);
    assert_eq!(report["status"]["progress"], 100);

    // Detection, two ticks, and the reload refresh.
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[test]
fn test_watch_stops_when_status_breaks() {
    let (url, _) = serve(vec![
        (200, r#"{"active": true}"#),
        (500, "Internal Server Error"),
    ]);

    let output = run_xferwatch(&[
        "watch",
        "--url",
        &url,
        "--interval-ms",
        "50",
    ]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Stopped polling: Status endpoint returned HTTP 500"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_verbose_emits_json_logs_on_stderr() {
    let (url, _) = serve(vec![(200, r#"{"active": false}"#)]);

    let output = run_xferwatch(&["-v", "status", "--url", &url]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(r#""event":"cli.status_started""#),
        "verbose stderr should contain JSON logs, got: {}",
        stderr
    );
}
