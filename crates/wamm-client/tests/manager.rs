use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use url::Url;
use wamm_client::{ClientError, ClientSettings, ManagerClient};
use wamm_core::{BulkSendRequest, Contact, Dispatcher, FailureKind, MessageBackend, SendRequest};

/// Serves one canned response per entry, returning the raw requests seen.
fn serve(responses: Vec<(u16, &'static str)>) -> (Url, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().expect("accept");
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .expect("timeout");
            seen.push(read_request(&mut stream));
            let reply = format!(
                "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(reply.as_bytes()).expect("write");
            stream.flush().expect("flush");
        }
        seen
    });
    let url = Url::parse(&format!("http://{addr}")).expect("url");
    (url, handle)
}

fn read_request(stream: &mut impl Read) -> String {
    let mut data = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let read = stream.read(&mut buf).expect("read");
        if read == 0 {
            break;
        }
        data.extend_from_slice(&buf[..read]);
        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn client(url: Url) -> ManagerClient {
    let mut settings = ClientSettings::new(url);
    settings.timeout = Duration::from_secs(5);
    settings.connect_timeout = Duration::from_secs(2);
    settings.api_key = Some("test-key".to_string());
    ManagerClient::new(settings).expect("client")
}

#[test]
fn send_posts_json_payload() {
    let (url, server) = serve(vec![(
        200,
        r#"{"success":true,"message_id":"3EB0C767","sent_to":"+5511999999999"}"#,
    )]);
    let client = client(url);

    let response = client
        .send(&SendRequest {
            name: "Ada",
            phone: "+5511999999999",
            message: "hi",
        })
        .expect("response");
    assert_eq!(response.status, 200);
    assert!(response.body.contains("3EB0C767"));

    let requests = server.join().expect("server");
    let request = &requests[0];
    assert!(request.starts_with("POST /api/send-message "));
    assert!(request.to_ascii_lowercase().contains("apikey: test-key"));
    assert!(request.contains(r#""phone":"+5511999999999""#));
    assert!(request.contains(r#""name":"Ada""#));
}

#[test]
fn dispatcher_reports_backend_errors_from_service() {
    let (url, server) = serve(vec![
        (200, r#"{"success":true,"message_id":"one"}"#),
        (500, r#"{"detail":"Erro interno: instance offline"}"#),
    ]);
    let client = client(url);
    let mut dispatcher = Dispatcher::new(&client);

    let request = BulkSendRequest::new(
        vec![
            Contact::new("Ada", "11999999991"),
            Contact::new("Nope", "abc"),
            Contact::new("Grace", "11999999992"),
        ],
        "hi",
    )
    .with_delay_ms(0);
    let report = dispatcher.send_bulk(&request).expect("report");
    server.join().expect("server");

    assert_eq!(report.total_contacts, 3);
    assert_eq!(report.successful_sends, 1);
    assert_eq!(report.results[0].message_id.as_deref(), Some("one"));
    assert_eq!(report.results[1].error_kind, Some(FailureKind::Validation));
    assert_eq!(report.results[2].error_kind, Some(FailureKind::Backend));
    assert_eq!(
        report.results[2].error.as_deref(),
        Some("Erro interno: instance offline")
    );
}

#[test]
fn unreachable_service_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = client(Url::parse(&format!("http://{addr}")).expect("url"));
    let dispatcher = Dispatcher::new(&client);
    let outcome = dispatcher.send_one(&Contact::new("Ada", "11999999999"), "hi");

    assert!(!outcome.success);
    assert_eq!(outcome.error_kind, Some(FailureKind::Transport));
    assert!(!outcome.error.unwrap_or_default().is_empty());
}

#[test]
fn probes_parse_service_payloads() {
    let (url, server) = serve(vec![
        (
            200,
            r#"{"status":"healthy","service":"WhatsApp Message Manager","version":"1.0.0"}"#,
        ),
        (200, r#"{"success":false,"error":"Erro de conexão"}"#),
    ]);
    let client = client(url);

    assert!(client.health().expect("health").is_healthy());
    let connection = client.test_connection().expect("test connection");
    assert!(!connection.success);
    assert_eq!(connection.error.as_deref(), Some("Erro de conexão"));

    let requests = server.join().expect("server");
    assert!(requests[0].starts_with("GET /api/health "));
    assert!(requests[1].starts_with("GET /api/test-connection "));
}

#[test]
fn probe_error_status_carries_detail() {
    let (url, server) = serve(vec![(503, r#"{"detail":"maintenance"}"#)]);
    let client = client(url);

    let err = client.list_instances().unwrap_err();
    server.join().expect("server");
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other}"),
    }
}
