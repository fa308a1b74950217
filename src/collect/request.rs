//! Per-request HTTP metadata for `/whoami`.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use http::{HeaderMap, Method, Uri, Version};
use serde::Serialize;

use super::{env_or_empty, hostname_or_empty, timestamp_now, LocalAddressProvider};
use crate::config::ENV_HOST_IP;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";
pub const X_REAL_IP: &str = "x-real-ip";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhoAmIDetailResponse {
    pub headers: BTreeMap<String, Vec<String>>,
    pub client_ip: String,
    pub remote_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pod_ip: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host_ip: String,
    pub hostname: String,
    pub method: String,
    pub path: String,
    pub protocol: String,
    pub timestamp: String,
}

/// The parts of an incoming request the detail view reports.
#[derive(Debug, Clone, Copy)]
pub struct RequestParts<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub version: Version,
    pub headers: &'a HeaderMap,
    pub remote_addr: SocketAddr,
}

/// Build the detail view for one request. Nothing is cached between calls.
pub fn collect_request_detail(
    parts: RequestParts<'_>,
    addresses: &dyn LocalAddressProvider,
) -> WhoAmIDetailResponse {
    let remote_ip = parts.remote_addr.to_string();

    WhoAmIDetailResponse {
        headers: header_map(parts.headers),
        client_ip: client_ip(parts.headers, &remote_ip),
        remote_ip,
        pod_ip: addresses.pod_ip(),
        host_ip: env_or_empty(ENV_HOST_IP),
        hostname: hostname_or_empty(),
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        protocol: protocol_name(parts.version),
        timestamp: timestamp_now(),
    }
}

/// Client address by precedence: first `X-Forwarded-For` hop, then
/// `X-Real-IP`, then the connection peer. Empty headers count as absent.
pub fn client_ip(headers: &HeaderMap, remote_addr: &str) -> String {
    let forwarded = header_str(headers, X_FORWARDED_FOR);
    let real_ip = header_str(headers, X_REAL_IP);

    let candidate = match (forwarded, real_ip) {
        (Some(forwarded), _) => forwarded.split(',').next().unwrap_or_default(),
        (None, Some(real_ip)) => real_ip,
        (None, None) => remote_addr,
    };
    candidate.trim().to_string()
}

/// First value of `name`, if present, non-empty and printable.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
}

/// Every header with all of its values, in arrival order per name. Names are
/// lower-case since the HTTP stack does not keep the case sent by the client.
fn header_map(headers: &HeaderMap) -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    for name in headers.keys() {
        let values = headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();
        map.insert(name.as_str().to_string(), values);
    }
    map
}

/// Protocol in request-line form; HTTP/2 and HTTP/3 keep a `.0` minor version.
fn protocol_name(version: Version) -> String {
    let name = if version == Version::HTTP_09 {
        "HTTP/0.9"
    } else if version == Version::HTTP_10 {
        "HTTP/1.0"
    } else if version == Version::HTTP_2 {
        "HTTP/2.0"
    } else if version == Version::HTTP_3 {
        "HTTP/3.0"
    } else {
        "HTTP/1.1"
    };
    name.to_string()
}
