//! Session Reference Tracker
//!
//! Binds the most recent upload to the caller's browser session. The whole
//! binding travels in one signed cookie, so there is no server-side session
//! table and nothing to lock.

use axum::http::{
    header::{COOKIE, SET_COOKIE},
    HeaderMap, HeaderValue,
};

use super::codec::CookieSigner;
use super::types::{ResolveError, SessionError, SessionVideoBinding, MAX_COOKIE_SIZE};
use crate::config::SessionConfig;

/// Reads and writes the per-session video binding
pub struct SessionTracker {
    signer: CookieSigner,
    cookie_name: String,
    max_age_secs: u64,
    secure: bool,
}

impl SessionTracker {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            signer: CookieSigner::new(config.secret.as_bytes()),
            cookie_name: config.cookie_name.clone(),
            max_age_secs: config.max_age_secs,
            secure: config.secure,
        }
    }

    /// Bind `reference` to the session by setting the cookie on `response_headers`
    ///
    /// Replaces any binding the session had before. Must run before the
    /// response body is produced.
    pub fn bind(
        &self,
        response_headers: &mut HeaderMap,
        reference: &str,
        display_name: &str,
    ) -> Result<(), SessionError> {
        let binding = SessionVideoBinding {
            reference: reference.to_string(),
            display_name: display_name.to_string(),
        };
        let value = self.signer.encode(&binding)?;

        let mut cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.cookie_name, value, self.max_age_secs
        );
        if self.secure {
            cookie.push_str("; Secure");
        }

        if cookie.len() > MAX_COOKIE_SIZE {
            return Err(SessionError::CookieTooLarge {
                size: cookie.len(),
                max: MAX_COOKIE_SIZE,
            });
        }

        // One binding per session: a later bind in the same response wins
        response_headers.insert(SET_COOKIE, HeaderValue::from_str(&cookie)?);

        tracing::debug!(
            reference = %reference,
            display_name = %display_name,
            "Bound video to session"
        );

        Ok(())
    }

    /// Recover the binding carried by the request's session cookie
    pub fn resolve(&self, request_headers: &HeaderMap) -> Result<SessionVideoBinding, ResolveError> {
        let value = find_cookie(request_headers, &self.cookie_name).ok_or(ResolveError::NotBound)?;

        self.signer.decode(value).map_err(|e| {
            tracing::warn!(error = %e, "Rejected session cookie");
            ResolveError::Session(e)
        })
    }
}

/// First non-empty value of cookie `name` across all `Cookie` headers
fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with_secret(secret: &str) -> SessionTracker {
        SessionTracker::new(&SessionConfig {
            secret: secret.to_string(),
            ..SessionConfig::default()
        })
    }

    /// Turn a response's Set-Cookie into the Cookie header of a follow-up request
    fn follow_up(response: &HeaderMap) -> HeaderMap {
        let set_cookie = response.get(SET_COOKIE).unwrap().to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap();

        let mut request = HeaderMap::new();
        request.insert(COOKIE, HeaderValue::from_str(pair).unwrap());
        request
    }

    #[test]
    fn test_bind_then_resolve() {
        let tracker = tracker_with_secret("secret");
        let mut response = HeaderMap::new();

        tracker
            .bind(&mut response, "./uploads/abc.mp4", "clip.mp4")
            .unwrap();

        let binding = tracker.resolve(&follow_up(&response)).unwrap();
        assert_eq!(binding.reference, "./uploads/abc.mp4");
        assert_eq!(binding.display_name, "clip.mp4");
    }

    #[test]
    fn test_cookie_attributes() {
        let tracker = SessionTracker::new(&SessionConfig {
            secure: true,
            ..SessionConfig::default()
        });
        let mut response = HeaderMap::new();
        tracker.bind(&mut response, "./uploads/a", "a").unwrap();

        let set_cookie = response.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("app="));
        assert!(set_cookie.contains("; Path=/"));
        assert!(set_cookie.contains("; HttpOnly"));
        assert!(set_cookie.contains("; SameSite=Lax"));
        assert!(set_cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_second_bind_overwrites() {
        let tracker = tracker_with_secret("secret");

        let mut first = HeaderMap::new();
        tracker.bind(&mut first, "./uploads/first.mp4", "first.mp4").unwrap();

        // A later upload in the same session
        let mut second = HeaderMap::new();
        tracker
            .bind(&mut second, "./uploads/second.mp4", "second.mp4")
            .unwrap();

        let binding = tracker.resolve(&follow_up(&second)).unwrap();
        assert_eq!(binding.reference, "./uploads/second.mp4");
        assert_eq!(binding.display_name, "second.mp4");

        // Binding twice into the same response keeps only the last cookie
        let mut response = HeaderMap::new();
        tracker.bind(&mut response, "./uploads/a", "a").unwrap();
        tracker.bind(&mut response, "./uploads/b", "b").unwrap();
        assert_eq!(response.get_all(SET_COOKIE).iter().count(), 1);
        assert_eq!(
            tracker.resolve(&follow_up(&response)).unwrap().reference,
            "./uploads/b"
        );
    }

    #[test]
    fn test_unbound_session() {
        let tracker = tracker_with_secret("secret");

        let result = tracker.resolve(&HeaderMap::new());
        assert!(matches!(result, Err(ResolveError::NotBound)));

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; app="));
        assert!(matches!(
            tracker.resolve(&headers),
            Err(ResolveError::NotBound)
        ));
    }

    #[test]
    fn test_foreign_secret_is_session_error() {
        let mut response = HeaderMap::new();
        tracker_with_secret("one")
            .bind(&mut response, "./uploads/a", "a")
            .unwrap();

        let result = tracker_with_secret("two").resolve(&follow_up(&response));
        assert!(matches!(
            result,
            Err(ResolveError::Session(SessionError::InvalidSignature))
        ));
    }

    #[test]
    fn test_oversized_binding_rejected() {
        let tracker = tracker_with_secret("secret");
        let mut response = HeaderMap::new();
        let long_name = "x".repeat(MAX_COOKIE_SIZE);

        let result = tracker.bind(&mut response, "./uploads/a", &long_name);
        assert!(matches!(result, Err(SessionError::CookieTooLarge { .. })));
        assert!(response.get(SET_COOKIE).is_none());
    }

    #[test]
    fn test_find_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("lang=en;  app=value.sig ; x=y"));

        assert_eq!(find_cookie(&headers, "app"), Some("value.sig"));
        assert_eq!(find_cookie(&headers, "missing"), None);
    }
}
