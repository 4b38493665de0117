//! Signed cookie codec
//!
//! Cookie values are `base64url(json(binding)).hex(mac)` where the MAC is a
//! BLAKE3 keyed hash of the encoded payload. The key is derived from the
//! configured secret, so changing the secret invalidates every cookie.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use super::types::{SessionError, SessionVideoBinding};

const KEY_CONTEXT: &str = "reel-server session cookie v1 signing key";

/// Signs and verifies session cookie values
pub struct CookieSigner {
    key: [u8; 32],
}

impl CookieSigner {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, secret),
        }
    }

    /// Serialize and sign a binding
    pub fn encode(&self, binding: &SessionVideoBinding) -> Result<String, SessionError> {
        let json = serde_json::to_vec(binding).map_err(|e| SessionError::Encode(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);
        let mac = blake3::keyed_hash(&self.key, payload.as_bytes());

        Ok(format!("{}.{}", payload, mac.to_hex()))
    }

    /// Verify and deserialize a cookie value
    pub fn decode(&self, value: &str) -> Result<SessionVideoBinding, SessionError> {
        let (payload, mac) = value
            .rsplit_once('.')
            .ok_or_else(|| SessionError::Malformed("missing signature".to_string()))?;

        let mac = blake3::Hash::from_hex(mac).map_err(|_| SessionError::InvalidSignature)?;

        // blake3::Hash equality is constant time
        if mac != blake3::keyed_hash(&self.key, payload.as_bytes()) {
            return Err(SessionError::InvalidSignature);
        }

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| SessionError::Malformed(e.to_string()))?;

        serde_json::from_slice(&json).map_err(|e| SessionError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> SessionVideoBinding {
        SessionVideoBinding {
            reference: "./uploads/abc.mp4".to_string(),
            display_name: "Ünïcode clip; \"quoted\".mp4".to_string(),
        }
    }

    #[test]
    fn test_encode_decode() {
        let signer = CookieSigner::new(b"secret");
        let value = signer.encode(&binding()).unwrap();

        // Must be a valid cookie value without quoting
        assert!(value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b'.'));
        assert_eq!(signer.decode(&value).unwrap(), binding());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = CookieSigner::new(b"secret");
        let value = signer.encode(&binding()).unwrap();

        let (_, mac) = value.rsplit_once('.').unwrap();
        let forged_payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&SessionVideoBinding {
                reference: "/etc/passwd".to_string(),
                display_name: "x".to_string(),
            })
            .unwrap(),
        );
        let forged = format!("{}.{}", forged_payload, mac);

        assert!(matches!(
            signer.decode(&forged),
            Err(SessionError::InvalidSignature)
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let value = CookieSigner::new(b"old secret").encode(&binding()).unwrap();
        let result = CookieSigner::new(b"new secret").decode(&value);

        assert!(matches!(result, Err(SessionError::InvalidSignature)));
    }

    #[test]
    fn test_garbage_rejected() {
        let signer = CookieSigner::new(b"secret");

        assert!(matches!(
            signer.decode("no-signature-here"),
            Err(SessionError::Malformed(_))
        ));
        assert!(matches!(
            signer.decode("payload.nothex"),
            Err(SessionError::InvalidSignature)
        ));
    }
}
