use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;

use super::core::PageSession;
use super::dom::parse_text_probe;
use super::js::selector_script;
use super::navigation::{same_document, IdleTracker};
use crate::cdp::CdpError;

#[test]
fn test_quad_center() {
    let quad = vec![0.0, 0.0, 100.0, 0.0, 100.0, 100.0, 0.0, 100.0];
    let (x, y) = PageSession::quad_center(&quad);
    assert_eq!(x, 50.0);
    assert_eq!(y, 50.0);
}

#[test]
fn test_quad_center_offset_box() {
    let quad = vec![10.0, 20.0, 30.0, 20.0, 30.0, 60.0, 10.0, 60.0];
    assert_eq!(PageSession::quad_center(&quad), (20.0, 40.0));
}

#[test]
fn test_quad_center_short_quad() {
    assert_eq!(PageSession::quad_center(&[1.0, 2.0]), (0.0, 0.0));
}

#[test]
fn test_selector_is_embedded_as_literal() {
    let script = selector_script(r#"td[title="a\b"]"#, "return el !== null;");
    assert!(script.contains(r#"document.querySelector("td[title=\"a\\b\"]")"#));
    assert!(script.ends_with("})()"));
}

#[test]
fn test_text_probe_found() {
    let probe = json!({"found": true, "text": "Tu. 01.10.2024"});
    assert_eq!(
        parse_text_probe("td", &probe).unwrap(),
        Some("Tu. 01.10.2024".to_string())
    );
}

#[test]
fn test_text_probe_found_without_text() {
    let probe = json!({"found": true, "text": null});
    assert_eq!(parse_text_probe("td", &probe).unwrap(), None);
}

#[test]
fn test_text_probe_missing_element() {
    let probe = json!({"found": false});
    assert!(matches!(
        parse_text_probe("#appointmentDetails", &probe),
        Err(CdpError::ElementNotFound(s)) if s == "#appointmentDetails"
    ));
}

#[tokio::test(start_paused = true)]
async fn test_idle_after_quiet_period() {
    let mut tracker = IdleTracker::new(Duration::from_millis(500));
    let start = Instant::now();

    assert!(!tracker.observe(true, 12, start));
    assert!(!tracker.observe(true, 12, start + Duration::from_millis(300)));
    assert!(tracker.observe(true, 12, start + Duration::from_millis(500)));
}

#[tokio::test(start_paused = true)]
async fn test_new_resource_restarts_quiet_period() {
    let mut tracker = IdleTracker::new(Duration::from_millis(500));
    let start = Instant::now();

    tracker.observe(true, 12, start);
    assert!(!tracker.observe(true, 13, start + Duration::from_millis(400)));
    assert!(!tracker.observe(true, 13, start + Duration::from_millis(800)));
    assert!(tracker.observe(true, 13, start + Duration::from_millis(900)));
}

#[tokio::test(start_paused = true)]
async fn test_loading_document_is_never_idle() {
    let mut tracker = IdleTracker::new(Duration::from_millis(500));
    let start = Instant::now();

    tracker.observe(false, 3, start);
    assert!(!tracker.observe(false, 3, start + Duration::from_secs(5)));
    assert!(tracker.observe(true, 3, start + Duration::from_secs(6)));
}

#[test]
fn test_same_session_url_is_same_document() {
    let url = "https://booking.example.org/#/session?token=abc";
    assert!(same_document(url, url));
}

#[test]
fn test_fragment_only_change_is_same_document() {
    assert!(same_document(
        "https://booking.example.org/#/appointment",
        "https://booking.example.org/#/session?token=abc"
    ));
    assert!(same_document(
        "https://booking.example.org",
        "https://booking.example.org/#/session"
    ));
}

#[test]
fn test_other_document_is_not_same() {
    assert!(!same_document(
        "https://booking.example.org/login#/session",
        "https://booking.example.org/#/session"
    ));
    assert!(!same_document("about:blank", "https://booking.example.org/#/session"));
    assert!(!same_document("", "https://booking.example.org/"));
}
