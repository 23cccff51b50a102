//! Table code resolution for customer requests
//!
//! Priority: `mesa`, `m`, `table` query parameters, then the path segment,
//! then the `mesa_codigo` cookie set on an earlier visit.

use http::HeaderMap;
use http::header::COOKIE;
use serde::Deserialize;
use shared::util::normalize_table_code;

pub const TABLE_COOKIE: &str = "mesa_codigo";

/// Cookie lifetime: twelve hours covers one service
const COOKIE_MAX_AGE_SECS: u64 = 12 * 60 * 60;

#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub mesa: Option<String>,
    pub m: Option<String>,
    pub table: Option<String>,
}

impl TableQuery {
    pub fn code(&self) -> Option<String> {
        [&self.mesa, &self.m, &self.table]
            .into_iter()
            .flatten()
            .find_map(|raw| normalize_table_code(raw))
    }
}

/// Where a resolved code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeSource {
    Query,
    Path,
    Cookie,
}

/// Resolve the table code for a request
pub fn resolve(
    query: &TableQuery,
    path: Option<&str>,
    headers: &HeaderMap,
) -> Option<(String, CodeSource)> {
    if let Some(code) = query.code() {
        return Some((code, CodeSource::Query));
    }
    if let Some(code) = path.and_then(normalize_table_code) {
        return Some((code, CodeSource::Path));
    }
    cookie_code(headers).map(|code| (code, CodeSource::Cookie))
}

/// Table code stored in the request cookies
pub fn cookie_code(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TABLE_COOKIE)
        .and_then(|(_, value)| normalize_table_code(&percent_decode(value)))
}

/// `Set-Cookie` value remembering `code`
pub fn set_cookie_value(code: &str) -> String {
    format!(
        "{TABLE_COOKIE}={}; Path=/; Max-Age={COOKIE_MAX_AGE_SECS}; SameSite=Lax",
        percent_encode(code)
    )
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = value.get(i + 1..i + 3)
            && let Ok(b) = u8::from_str_radix(hex, 16)
        {
            out.push(b);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
