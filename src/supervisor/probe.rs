//! Remote sourcetable probe
//!
//! Asks a remote caster for its sourcetable and returns the parsed
//! mountpoint list. Used by the admin surface to discover what an
//! upstream offers before configuring stations against it.

use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::auth::encode_basic_auth;
use crate::config::SERVER_IDENT;
use crate::error::{Error, Result};
use crate::sourcetable::{parse_body, MountpointInfo};

/// Overall probe deadline
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Response accumulator cap; a sourcetable bigger than this is not one
const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Fetch and parse a remote caster's sourcetable.
///
/// Enforces a single 10 s deadline over dial, request and response.
/// `Unauthorized` and `Timeout` surface as distinct error kinds.
pub async fn probe_source(
    host: &str,
    port: u16,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<Vec<MountpointInfo>> {
    probe_with_deadline(host, port, username, password, PROBE_TIMEOUT).await
}

/// [`probe_source`] with a caller-chosen deadline
pub async fn probe_with_deadline(
    host: &str,
    port: u16,
    username: Option<&str>,
    password: Option<&str>,
    deadline: Duration,
) -> Result<Vec<MountpointInfo>> {
    timeout(deadline, fetch(host, port, username, password))
        .await
        .map_err(|_| Error::Timeout)?
}

async fn fetch(
    host: &str,
    port: u16,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<Vec<MountpointInfo>> {
    let mut stream = TcpStream::connect((host, port)).await?;

    let mut request = format!(
        "GET / HTTP/1.1\r\nHost: {host}:{port}\r\nUser-Agent: {SERVER_IDENT}\r\n"
    );
    if let (Some(user), Some(pass)) = (username, password) {
        request.push_str(&format!(
            "Authorization: {}\r\n",
            encode_basic_auth(user, pass)
        ));
    }
    request.push_str("\r\n");
    stream.write_all(request.as_bytes()).await?;

    let mut buf = BytesMut::with_capacity(4096);
    loop {
        let n = stream.read_buf(&mut buf).await?;
        if n == 0 {
            break;
        }
        // casters that keep the socket open still terminate the table
        if buf.windows(14).any(|w| w == b"ENDSOURCETABLE") {
            break;
        }
        if buf.len() > MAX_RESPONSE_BYTES {
            return Err(Error::protocol("sourcetable response exceeds limit"));
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let (head, body) = text
        .split_once("\r\n\r\n")
        .ok_or_else(|| Error::protocol("response has no header terminator"))?;

    let status = head.lines().next().unwrap_or_default();
    if status.contains("401") {
        return Err(Error::AuthRejected);
    }
    if !status.starts_with("SOURCETABLE 200 OK") {
        return Err(Error::protocol(format!("unexpected status: {status}")));
    }

    Ok(parse_body(body))
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use crate::config::RelayConfig;
    use crate::model::{SourcetableMeta, Station, StationStatus};
    use crate::sourcetable::render_sourcetable;

    use super::*;

    fn station(mountpoint: &str, lat: f64, lon: f64) -> Station {
        Station {
            id: 1,
            mountpoint: mountpoint.into(),
            description: String::new(),
            latitude: lat,
            longitude: lon,
            source_host: "upstream.example".into(),
            source_port: 2101,
            source_mountpoint: "SRC".into(),
            source_username: None,
            source_password: None,
            status: StationStatus::Active,
            meta: SourcetableMeta::default(),
        }
    }

    /// Serve one canned response to the first connection
    async fn serve_once(response: Vec<u8>) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut discard = [0u8; 1024];
            let _ = stream.read(&mut discard).await;
            let _ = stream.write_all(&response).await;
        });
        addr
    }

    #[tokio::test]
    async fn test_probe_round_trip() {
        let stations = vec![
            station("VRS01", 21.0285, 105.8542),
            station("VRS02", -33.8688, 151.2093),
        ];
        let rendered = render_sourcetable(&stations, &RelayConfig::default());
        let addr = serve_once(rendered.to_vec()).await;

        let mut mounts = probe_source("127.0.0.1", addr.port(), None, None)
            .await
            .unwrap();
        mounts.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(mounts.len(), 2);
        assert_eq!(mounts[0].name, "VRS01");
        assert_eq!(mounts[0].latitude, Some(21.0285));
        assert_eq!(mounts[0].longitude, Some(105.8542));
        assert_eq!(mounts[1].name, "VRS02");
        assert_eq!(mounts[1].latitude, Some(-33.8688));
        assert_eq!(mounts[1].longitude, Some(151.2093));
    }

    #[tokio::test]
    async fn test_probe_unauthorized() {
        let addr = serve_once(b"HTTP/1.1 401 Unauthorized\r\n\r\n".to_vec()).await;

        let err = probe_source("127.0.0.1", addr.port(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AuthRejected));
    }

    #[tokio::test]
    async fn test_probe_unexpected_status() {
        let addr = serve_once(b"ICY 200 OK\r\n\r\nbinary".to_vec()).await;

        let err = probe_source("127.0.0.1", addr.port(), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[tokio::test]
    async fn test_probe_timeout() {
        // accepts but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let err = probe_with_deadline(
            "127.0.0.1",
            addr.port(),
            None,
            None,
            Duration::from_millis(100),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Timeout));
    }

    #[tokio::test]
    async fn test_probe_sends_credentials() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (seen_tx, seen_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = BytesMut::new();
            loop {
                stream.read_buf(&mut buf).await.unwrap();
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let _ = seen_tx.send(String::from_utf8_lossy(&buf).into_owned());
            let rendered = render_sourcetable(&[], &RelayConfig::default());
            let _ = stream.write_all(&rendered).await;
        });

        let mounts = probe_source("127.0.0.1", addr.port(), Some("user"), Some("secret"))
            .await
            .unwrap();
        assert!(mounts.is_empty());

        let request = seen_rx.await.unwrap();
        assert!(request.contains("Authorization: Basic dXNlcjpzZWNyZXQ=\r\n"));
    }
}
