//! Minimal HTTP/1.0 framing for the gateway.
//!
//! Only the request line is interpreted. Headers are read off the socket and
//! discarded.

use chrono::Utc;
use std::path::Path;
use thiserror::Error;

pub const COMMAND_PREFIX: &str = "/game/";
pub const SERVER_NAME: &str = "bones/0.1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("empty request")]
    EmptyRequest,
    #[error("request line is missing a path")]
    MissingPath,
    #[error("request exceeds {0} bytes")]
    TooLarge(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
}

pub fn parse_request(raw: &str) -> Result<Request, GatewayError> {
    let request_line = raw
        .split("\r\n")
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or(GatewayError::EmptyRequest)?;

    let mut parts = request_line.split(' ');
    let method = match parts.next().map(|m| m.trim().to_ascii_uppercase()) {
        Some(m) if m == "GET" => Method::Get,
        Some(m) if m == "POST" => Method::Post,
        Some(m) => Method::Other(m),
        None => return Err(GatewayError::EmptyRequest),
    };
    let path = parts
        .next()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(GatewayError::MissingPath)?
        .to_string();

    Ok(Request { method, path })
}

/// Splits `/game/<name>/<arg>/...` into a command name and its arguments.
pub fn command_from_path(path: &str) -> Option<(String, Vec<String>)> {
    let rest = path.strip_prefix(COMMAND_PREFIX)?;
    let mut segments = rest
        .split('/')
        .flat_map(str::split_whitespace)
        .map(str::to_string);
    let name = segments.next()?;
    Some((name, segments.collect()))
}

pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("pdf") => "application/pdf",
        Some("jpg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("html") => "text/html",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub reason: &'static str,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, reason: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn json(body: String) -> Self {
        Self::new(200, "OK", body).with_header("Content-Type", "application/json")
    }

    pub fn text(body: &str) -> Self {
        Self::new(200, "OK", body).with_header("Content-Type", "text/plain")
    }

    pub fn bad_request() -> Self {
        Self::new(400, "Bad Request", Vec::new())
    }

    pub fn not_found() -> Self {
        Self::new(404, "Not Found", Vec::new())
    }

    pub fn unavailable() -> Self {
        Self::new(503, "Service Unavailable", Vec::new())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.0 {} {}\r\nDate: {}\r\nConnection: close\r\nServer: {}\r\nContent-Length: {}\r\n",
            self.status,
            self.reason,
            Utc::now().format("%a, %d %b %Y %H:%M:%S GMT"),
            SERVER_NAME,
            self.body.len()
        );
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_request() {
        let req = parse_request("GET /game/get_game_state HTTP/1.0\r\nHost: x\r\n\r\n").unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/game/get_game_state");

        let with_headers = parse_request(
            "GET /game/reset_game HTTP/1.0\r\nHost: x\r\nUser-Agent: y\r\n\r\n",
        )
        .unwrap();
        assert_eq!(
            with_headers,
            Request {
                method: Method::Get,
                path: "/game/reset_game".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_method_is_case_insensitive() {
        let req = parse_request("post /upload HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(req.method, Method::Post);

        let req = parse_request("DELETE /x HTTP/1.0\r\n\r\n").unwrap();
        assert_eq!(req.method, Method::Other("DELETE".to_string()));
    }

    #[test]
    fn test_parse_malformed_requests() {
        assert_eq!(parse_request(""), Err(GatewayError::EmptyRequest));
        assert_eq!(parse_request("\r\n\r\n"), Err(GatewayError::EmptyRequest));
        assert_eq!(parse_request("GET\r\n\r\n"), Err(GatewayError::MissingPath));
    }

    #[test]
    fn test_command_from_path() {
        assert_eq!(
            command_from_path("/game/collect_gem/player_black/black_gem_0"),
            Some((
                "collect_gem".to_string(),
                vec!["player_black".to_string(), "black_gem_0".to_string()]
            ))
        );
        assert_eq!(
            command_from_path("/game/get_game_state/"),
            Some(("get_game_state".to_string(), vec![]))
        );
        assert_eq!(command_from_path("/game/"), None);
        assert_eq!(command_from_path("/index.html"), None);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("a/b.html")), "text/html");
        assert_eq!(content_type_for(Path::new("photo.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("blob")), "application/octet-stream");
    }

    #[test]
    fn test_response_bytes() {
        let bytes = Response::json("{}".to_string()).to_bytes();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\n{}"));
    }
}
