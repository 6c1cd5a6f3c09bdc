//! NTRIP request parsing
//!
//! Hand-rolled HTTP/1-style request reading. The parser must not
//! consume the socket past the header terminator: whatever follows
//! `\r\n\r\n` in the same segment belongs to the streaming phase
//! (typically the rover's first GGA sentence) and is handed back to
//! the caller untouched.

use std::collections::HashMap;

use bytes::{Bytes, BytesMut};
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::error::{Error, Result};

/// Header section cap; anything larger is answered with 400
pub const MAX_HEADER_BYTES: usize = 16 * 1024;

/// A parsed NTRIP/HTTP request head
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method, upper-case as sent
    pub method: String,
    /// Request target, e.g. `/VRS01` or `/`
    pub target: String,
    /// Protocol version token, possibly empty for bare NTRIP v1 lines
    pub version: String,
    /// Header map with lower-cased keys
    pub headers: HashMap<String, String>,
}

impl Request {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(|v| v.as_str())
    }

    /// The mountpoint named by the target; empty for the root path
    pub fn mountpoint(&self) -> &str {
        self.target.trim_start_matches('/')
    }
}

/// Read one request head from the socket.
///
/// Accumulates until `\r\n\r\n`, refusing to buffer more than
/// [`MAX_HEADER_BYTES`] first. Returns the parsed head and the
/// residual bytes that arrived beyond the terminator.
pub async fn read_request(stream: &mut TcpStream) -> Result<(Request, Bytes)> {
    let mut buf = BytesMut::with_capacity(1024);

    loop {
        if let Some(pos) = find_terminator(&buf) {
            let residual = buf.split_off(pos + 4).freeze();
            let request = parse_head(&buf[..pos])?;
            return Ok((request, residual));
        }
        if buf.len() > MAX_HEADER_BYTES {
            return Err(Error::protocol("header section exceeds limit"));
        }

        let n = stream.read_buf(&mut buf).await?;
        if n == 0 {
            return Err(Error::protocol("connection closed before header terminator"));
        }
    }
}

fn find_terminator(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Parse the request line and header lines of a head section.
pub fn parse_head(head: &[u8]) -> Result<Request> {
    let text = std::str::from_utf8(head)
        .map_err(|_| Error::protocol("request head is not valid UTF-8"))?;
    let mut lines = text.split("\r\n");

    let request_line = lines
        .next()
        .ok_or_else(|| Error::protocol("empty request"))?;
    let mut parts = request_line.split_whitespace();
    let method = parts
        .next()
        .ok_or_else(|| Error::protocol("missing method"))?
        .to_string();
    let target = parts
        .next()
        .ok_or_else(|| Error::protocol("missing request target"))?
        .to_string();
    let version = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
        // header lines without a colon are ignored
    }

    Ok(Request {
        method,
        target,
        version,
        headers,
    })
}
