//! Jellyfin HTTP client response handling
//!
//! Each test serves canned HTTP/1.1 responses from a local listener and
//! checks how the client maps them: auth failures, error statuses, empty
//! bodies, bare-array and paged payloads, and undecodable JSON.

use std::sync::Arc;

use jellyhome_client::infra::services::MediaRepository;
use jellyhome_client::infra::{ClientConfig, JellyfinClient, RepositoryError};
use jellyhome_model::{ItemId, ItemKind, UserId, ViewId};
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const USER: &str = "5b9d0d8b2ad4b7f8a0ba4aa3e4b5f9c3";
const VIEW: &str = "0c41907140d802bb58430fed7e2cd79e";
const ITEM: &str = "f137a2dd21bbc1b99aa5c0f6bf02a805";

struct Canned {
    status: u16,
    reason: &'static str,
    body: String,
}

fn respond(status: u16, reason: &'static str, body: impl Into<String>) -> Canned {
    Canned {
        status,
        reason,
        body: body.into(),
    }
}

/// Serves one canned response per connection and records raw requests.
struct CannedServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    async fn start(responses: Vec<Canned>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            for canned in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                let request = read_request(&mut stream).await;
                log.lock().push(request);
                let reply = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    canned.status,
                    canned.reason,
                    canned.body.len(),
                    canned.body
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        Self { base_url, requests }
    }

    fn client(&self) -> JellyfinClient {
        JellyfinClient::new(&ClientConfig {
            server_url: self.base_url.clone(),
            user_id: Some(USER.parse::<UserId>().unwrap()),
            access_token: Some("tok".into()),
            ..ClientConfig::default()
        })
        .unwrap()
    }

    fn request(&self, index: usize) -> String {
        self.requests.lock()[index].clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(head_end) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|len| len.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }
        let read = stream.read(&mut chunk).await.unwrap();
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[tokio::test]
async fn unauthorized_status_maps_to_unauthorized() {
    let server = CannedServer::start(vec![respond(401, "Unauthorized", "")]).await;

    let err = server.client().user_views().await.unwrap_err();

    assert_eq!(err, RepositoryError::Unauthorized);
    assert!(server.request(0).starts_with(&format!("GET /Users/{USER}/Views ")));
}

#[tokio::test]
async fn error_status_keeps_code_and_body() {
    let server = CannedServer::start(vec![respond(
        500,
        "Internal Server Error",
        "database is locked",
    )])
    .await;

    let err = server.client().resume_items().await.unwrap_err();

    assert_eq!(
        err,
        RepositoryError::Status {
            status: 500,
            body: "database is locked".into(),
        }
    );
}

#[tokio::test]
async fn no_content_is_accepted_for_unit_results() {
    let server = CannedServer::start(vec![
        respond(204, "No Content", ""),
        respond(204, "No Content", ""),
    ])
    .await;
    let client = server.client();
    let item: ItemId = ITEM.parse().unwrap();

    client.mark_played(item).await.unwrap();
    client.post_capabilities().await.unwrap();

    let mark = server.request(0);
    assert!(mark.starts_with(&format!("POST /Users/{USER}/PlayedItems/{ITEM} ")));
    assert!(
        mark.to_ascii_lowercase()
            .contains("authorization: mediabrowser client=\"jellyhome\"")
    );
    assert!(mark.contains("Token=\"tok\""));

    let capabilities = server.request(1);
    assert!(capabilities.starts_with("POST /Sessions/Capabilities/Full "));
    assert!(capabilities.contains("\"PlayableMediaTypes\":[\"Video\"]"));
}

#[tokio::test]
async fn latest_media_decodes_a_bare_array() {
    let body = format!(
        r#"[{{ "Id": "{ITEM}", "Name": "Dune", "Type": "Movie", "ProductionYear": 2021 }}]"#
    );
    let server = CannedServer::start(vec![respond(200, "OK", body)]).await;
    let view: ViewId = VIEW.parse().unwrap();

    let items = server.client().latest_media(view).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Dune");
    assert_eq!(items[0].kind, ItemKind::Movie);
    assert_eq!(items[0].production_year, Some(2021));
    let request = server.request(0);
    assert!(request.starts_with(&format!("GET /Users/{USER}/Items/Latest?")));
    assert!(request.contains(&format!("ParentId={VIEW}")));
}

#[tokio::test]
async fn next_up_decodes_a_paged_envelope() {
    let body = format!(
        r#"{{ "Items": [{{ "Id": "{ITEM}", "Name": "Pilot", "Type": "Episode",
             "ParentIndexNumber": 1, "IndexNumber": 1 }}],
             "TotalRecordCount": 1 }}"#
    );
    let server = CannedServer::start(vec![respond(200, "OK", body)]).await;

    let items = server.client().next_up().await.unwrap();

    assert_eq!(items[0].display_title(), "S01E01 - Pilot");
    assert!(server.request(0).contains(&format!("UserId={USER}")));
}

#[tokio::test]
async fn undecodable_body_is_a_deserialization_error() {
    let server =
        CannedServer::start(vec![respond(200, "OK", "<html>login</html>")]).await;

    let err = server.client().user_views().await.unwrap_err();

    assert!(matches!(err, RepositoryError::Deserialization(_)));
}
