use std::collections::HashMap;

use chrono::{Duration, TimeZone, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::client::{CaClient, ClientOptions};
use crate::controller::{CertificateListController, SortOrder};
use crate::model::{mock, CertDate, Certificate};
use crate::output::{self, DashboardView};

const SAMPLE_NAMES: [&str; 8] = [
    "www.tinyca.lan",
    "api.tinyca.lan",
    "grafana.lan",
    "portainer.lan",
    "vault.lan",
    "gitlab.lan",
    "jenkins.lan",
    "nas.lan",
];

/// Serves canned `(status, body)` responses keyed by request path, one
/// connection at a time, until the test ends.
async fn serve(routes: HashMap<&'static str, (u16, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let request = String::from_utf8_lossy(&buf);
            let path = request
                .split_whitespace()
                .nth(1)
                .unwrap_or("/")
                .to_string();
            let (status, body) = routes.get(path.as_str()).copied().unwrap_or((404, "{}"));
            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{addr}")
}

async fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn client_for(base_url: String) -> CaClient {
    CaClient::new(&ClientOptions {
        base_url,
        timeout_seconds: 5,
        system_proxy: false,
        ..ClientOptions::default()
    })
    .unwrap()
}

#[tokio::test]
async fn unreachable_admin_api_falls_back_to_samples() {
    let client = client_for(unreachable_base().await);
    let certs = client.load_certificates(Utc::now()).await;
    let names: Vec<_> = certs.iter().filter_map(|c| c.display_name()).collect();
    assert_eq!(names, SAMPLE_NAMES);
}

#[tokio::test]
async fn unreachable_ca_still_reports_online() {
    let client = client_for(unreachable_base().await);
    let info = client.load_ca_info().await;
    assert_eq!(info.status, "Online");
    assert!(!info.health_ok);
    assert_eq!(info.fingerprint.as_deref(), Some("See step-ca logs"));
    assert_eq!(info.valid_until, "~10 years from init");
}

#[tokio::test]
async fn loads_certificates_and_root_from_api() {
    let base = serve(HashMap::from([
        ("/api/health", (200, r#"{"status":"ok"}"#)),
        (
            "/api/roots",
            (200, r#"{"crts":["-----BEGIN CERTIFICATE-----\nMIIBszCCAVmgAwIBAgIRAK"]}"#),
        ),
        (
            "/api/admin/certificates",
            (
                200,
                r#"{"certificates":[{"commonName":"git.lan","serialNumber":"0A","validFrom":"2026-01-01T00:00:00Z","validUntil":"2026-04-01T00:00:00Z"},{"subject":"ci.lan","serial":"0B","notBefore":"2026-01-01","notAfter":"2026-02-01"}]}"#,
            ),
        ),
    ]))
    .await;
    let client = client_for(base);

    let info = client.load_ca_info().await;
    assert!(info.health_ok);
    assert_eq!(
        info.fingerprint.as_deref(),
        Some("-----BEGIN CERTIFICATE-----\nMIIB...")
    );

    let certs = client.load_certificates(Utc::now()).await;
    assert_eq!(certs.len(), 2);
    assert_eq!(certs[1].display_name(), Some("ci.lan"));
    assert_eq!(certs[1].serial(), Some("0B"));
}

#[tokio::test]
async fn error_status_and_bad_json_fall_back() {
    let base = serve(HashMap::from([
        ("/api/health", (503, "{}")),
        ("/api/roots", (200, "not json")),
        ("/api/admin/certificates", (500, r#"{"error":"boom"}"#)),
    ]))
    .await;
    let client = client_for(base);

    let info = client.load_ca_info().await;
    assert_eq!(info.status, "Online");
    assert!(!info.health_ok);
    assert_eq!(info.fingerprint.as_deref(), Some("See step-ca logs"));
    assert_eq!(info.valid_until, "~10 years");

    assert_eq!(client.load_certificates(Utc::now()).await.len(), 8);
}

#[tokio::test]
async fn wrong_shaped_certificate_list_falls_back_to_samples() {
    for body in [
        r#"{"total":3}"#,
        r#"{"certificates":null}"#,
        "null",
        "7",
        r#"[{"commonName":"ok.lan"},null]"#,
    ] {
        let base = serve(HashMap::from([("/api/admin/certificates", (200, body))])).await;
        let certs = client_for(base).load_certificates(Utc::now()).await;
        let names: Vec<_> = certs.iter().filter_map(|c| c.display_name()).collect();
        assert_eq!(names, SAMPLE_NAMES, "body {body}");
    }
}

#[tokio::test]
async fn empty_list_is_not_a_fallback() {
    for body in ["[]", r#"{"certificates":[]}"#] {
        let base = serve(HashMap::from([("/api/admin/certificates", (200, body))])).await;
        let certs = client_for(base).load_certificates(Utc::now()).await;
        assert!(certs.is_empty(), "body {body}");
    }
}

#[tokio::test]
async fn null_roots_leave_fingerprint_pending() {
    let base = serve(HashMap::from([("/api/roots", (200, r#"{"crts":null}"#))])).await;
    let info = client_for(base).load_ca_info().await;
    assert_eq!(info.fingerprint, None);
    assert_eq!(info.valid_until, "~10 years from init");
}

#[tokio::test]
async fn roots_without_certificates_leave_fingerprint_pending() {
    let base = serve(HashMap::from([
        ("/api/health", (200, "{}")),
        ("/api/roots", (200, r#"{"crts":[]}"#)),
        ("/api/admin/certificates", (200, "[]")),
    ]))
    .await;
    let client = client_for(base);
    let info = client.load_ca_info().await;
    assert_eq!(info.fingerprint, None);

    let mut controller = CertificateListController::default();
    let page = controller.load(client.load_certificates(Utc::now()).await);
    let view = DashboardView::build(&info, &page, Utc::now());
    assert_eq!(view.fingerprint, "Loading...");
    assert!(view.domains_body.contains("No certificates issued yet"));
}

#[test]
fn sample_set_paginates_five_then_three() {
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
    let mut controller = CertificateListController::new(SortOrder::Ascending);
    let first = controller.load(mock::default_certificates(now));
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.items[0].display_name(), Some("jenkins.lan"));
    let second = controller.next_page();
    assert_eq!(second.items.len(), 3);
    assert_eq!(second.items[2].display_name(), Some("nas.lan"));

    let rows = output::build_rows(&first, now);
    let statuses: Vec<_> = rows.iter().map(|r| r.status_text.as_str()).collect();
    assert_eq!(
        statuses,
        ["Expires in 7d", "Expires in 15d", "Expires in 30d", "Valid", "Valid"]
    );
}

#[test]
fn html_document_exposes_page_element_ids() {
    let now = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
    let hostile = Certificate {
        common_name: Some("<img src=x onerror=alert(1)>.lan".to_string()),
        serial_number: Some("A&B".to_string()),
        valid_from: CertDate::Parsed(now),
        valid_until: CertDate::Parsed(now + Duration::days(400)),
    };
    let mut controller = CertificateListController::default();
    let page = controller.load(vec![hostile]);
    let view = DashboardView::build(&crate::client::CaInfo::default(), &page, now);
    let html = String::from_utf8(output::render_html(&view)).unwrap();

    for id in [
        "fingerprint",
        "validUntil",
        "caStatus",
        "domainsBody",
        "searchInput",
        "sortLabel",
        "thSortIndicator",
        "sortIcon",
        "prevBtn",
        "nextBtn",
        "pageInfo",
        "totalItems",
    ] {
        assert!(html.contains(&format!(r#"id="{id}""#)), "missing id {id}");
    }
    assert!(!html.contains("<img"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;.lan"));
    assert!(html.contains(r#"<button id="prevBtn" type="button" disabled>"#));
    assert!(html.contains("Valid Until ↓"));
}

#[test]
fn search_then_clear_restores_full_view() {
    let now = Utc::now();
    let mut controller = CertificateListController::default();
    controller.load(mock::default_certificates(now));
    let page = controller.search("LAN");
    assert_eq!(page.total_items, 8);
    let page = controller.search("tinyca");
    assert_eq!(page.total_items, 2);
    assert_eq!(page.page_info(), "Page 1 of 1");
    let page = controller.search("   ");
    assert_eq!(page.total_items, 8);
    assert_eq!(page.total_pages, 2);
}
