//! Cookie header glue for carrying session ids.
//!
//! The facade itself never touches HTTP headers; this module owns the
//! translation between `Cookie`/`Set-Cookie` headers and session ids.

use axum::http::{header, HeaderMap};

use crate::session::{CookieParams, SessionId};

/// Extract the session id value from the request `Cookie` header(s).
pub fn request_session_id(headers: &HeaderMap, name: &str) -> Option<String> {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((key, value)) = pair.trim().split_once('=') {
                if key == name && !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Build a `Set-Cookie` value carrying `id` under the session name.
pub fn session_cookie(name: &str, id: &SessionId, params: &CookieParams) -> String {
    let mut cookie = format!("{}={}", name, id);
    if let Some(max_age) = params.max_age() {
        cookie.push_str(&format!("; Max-Age={}", max_age.as_secs()));
    }
    push_attributes(&mut cookie, params);
    cookie
}

/// Build a `Set-Cookie` value that tells the client to drop the cookie.
pub fn expired_cookie(name: &str, params: &CookieParams) -> String {
    let mut cookie = format!("{}=deleted; Max-Age=0", name);
    push_attributes(&mut cookie, params);
    cookie
}

fn push_attributes(cookie: &mut String, params: &CookieParams) {
    cookie.push_str("; Path=");
    cookie.push_str(&params.path);
    if let Some(domain) = &params.domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }
    if params.secure {
        cookie.push_str("; Secure");
    }
    if params.http_only {
        cookie.push_str("; HttpOnly");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn sid(raw: &str) -> SessionId {
        SessionId::parse(raw).unwrap()
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_request_session_id() {
        let headers = headers_with_cookie("SBSESSID=abc123");
        assert_eq!(
            request_session_id(&headers, "SBSESSID"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_request_session_id_among_others() {
        let headers = headers_with_cookie("theme=dark; SBSESSID=abc123; lang=en");
        assert_eq!(
            request_session_id(&headers, "SBSESSID"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn test_request_session_id_missing() {
        let headers = headers_with_cookie("theme=dark");
        assert_eq!(request_session_id(&headers, "SBSESSID"), None);
    }

    #[test]
    fn test_request_session_id_empty_value() {
        let headers = headers_with_cookie("SBSESSID=");
        assert_eq!(request_session_id(&headers, "SBSESSID"), None);
    }

    #[test]
    fn test_request_session_id_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(header::COOKIE, HeaderValue::from_static("SBSESSID=xyz"));
        assert_eq!(
            request_session_id(&headers, "SBSESSID"),
            Some("xyz".to_string())
        );
    }

    #[test]
    fn test_session_cookie_defaults() {
        let cookie = session_cookie("SBSESSID", &sid("abc123"), &CookieParams::default());
        assert_eq!(cookie, "SBSESSID=abc123; Path=/; HttpOnly");
    }

    #[test]
    fn test_session_cookie_full_params() {
        let params = CookieParams {
            lifetime_secs: 3600,
            path: "/app".to_string(),
            domain: Some("example.test".to_string()),
            secure: true,
            http_only: true,
        };
        let cookie = session_cookie("SID", &sid("abc"), &params);
        assert_eq!(
            cookie,
            "SID=abc; Max-Age=3600; Path=/app; Domain=example.test; Secure; HttpOnly"
        );
    }

    #[test]
    fn test_expired_cookie() {
        let cookie = expired_cookie("SBSESSID", &CookieParams::default());
        assert_eq!(cookie, "SBSESSID=deleted; Max-Age=0; Path=/; HttpOnly");
    }
}
