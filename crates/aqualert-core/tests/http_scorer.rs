//! HttpScorer against a throwaway local listener standing in for the
//! prediction service.

use aqualert_core::model::{Contaminant, Measurements};
use aqualert_core::scorer::{HttpScorer, Scorer, ScorerError, ScorerStatus};
use rust_decimal_macros::dec;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Read one HTTP request (headers plus Content-Length body) and return the body.
fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(end) = text.find("\r\n\r\n") {
            let content_length = text[..end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= end + 4 + content_length {
                return String::from_utf8_lossy(&buf[end + 4..end + 4 + content_length])
                    .to_string();
            }
        }
    }
    String::new()
}

/// Serve a single canned response; the request body is sent back on the channel.
fn serve_once(status_line: &'static str, body: &'static str) -> (SocketAddr, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request(&mut stream);
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        let _ = tx.send(request);
    });
    (addr, rx)
}

fn panel() -> Measurements {
    [
        (Contaminant::Arsenic, dec!(0.5)),
        (Contaminant::Ph, dec!(7)),
    ]
    .into_iter()
    .collect()
}

#[test]
fn well_formed_prediction_is_parsed() {
    let (addr, rx) = serve_once(
        "200 OK",
        r#"{"status":"Unsafe","predicted_disease":"Cholera","safety_confidence":0.8}"#,
    );
    let scorer = HttpScorer::new(&format!("http://{addr}/"), Duration::from_secs(2)).unwrap();
    assert_eq!(scorer.endpoint(), format!("http://{addr}/predict"));

    let assessment = scorer.score(&panel()).unwrap();
    assert_eq!(assessment.status, ScorerStatus::Unsafe);
    assert_eq!(assessment.predicted_condition.as_deref(), Some("Cholera"));
    assert_eq!(assessment.safety_confidence, Some(0.8));

    let request: serde_json::Value = serde_json::from_str(&rx.recv().unwrap()).unwrap();
    let features = request["features"].as_object().unwrap();
    assert_eq!(features.len(), 20);
    assert_eq!(features["arsenic"], 0.5);
    assert_eq!(features["uranium"], 0.0);
}

#[test]
fn malformed_body_is_reported() {
    let (addr, _rx) = serve_once("200 OK", "not json");
    let scorer = HttpScorer::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    assert!(matches!(
        scorer.score(&panel()),
        Err(ScorerError::Malformed(_))
    ));
}

#[test]
fn server_error_is_reported_as_status() {
    let (addr, _rx) = serve_once("500 Internal Server Error", r#"{"detail":"Models not loaded"}"#);
    let scorer = HttpScorer::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    assert_eq!(scorer.score(&panel()), Err(ScorerError::Status(500)));
}

#[test]
fn hung_scorer_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(3));
    });

    let scorer = HttpScorer::new(&format!("http://{addr}"), Duration::from_millis(200)).unwrap();
    assert_eq!(scorer.score(&panel()), Err(ScorerError::Timeout(200)));
}

#[test]
fn unreachable_scorer_is_transport_error() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let scorer = HttpScorer::new(&format!("http://{addr}"), Duration::from_secs(1)).unwrap();
    assert!(matches!(
        scorer.score(&panel()),
        Err(ScorerError::Transport(_))
    ));
}

#[test]
fn https_scorer_url_is_supported() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let scorer = HttpScorer::new(&format!("https://{addr}"), Duration::from_secs(1)).unwrap();
    assert_eq!(scorer.endpoint(), format!("https://{addr}/predict"));
    match scorer.score(&panel()) {
        Err(ScorerError::Transport(msg)) => assert!(!msg.contains("scheme is not http"), "{msg}"),
        other => panic!("expected a connection failure, got {other:?}"),
    }
}
