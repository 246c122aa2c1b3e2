//! Coinbase Exchange request signing

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

use crate::exchange::GatewayError;

type HmacSha256 = Hmac<Sha256>;

/// API key triple issued by the venue
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    /// Base64-encoded signing secret
    pub api_secret: String,
    pub passphrase: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

fn redact(value: &str) -> String {
    let prefix: String = value.chars().take(6).collect();
    if prefix.is_empty() {
        "<empty>".to_string()
    } else {
        format!("{}…", prefix)
    }
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Key and secret are present
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_secret.trim().is_empty()
    }

    /// `CB-ACCESS-SIGN` value: base64(HMAC-SHA256(secret, timestamp + method + path + body))
    pub fn sign(
        &self,
        timestamp: &str,
        method: &str,
        request_path: &str,
        body: &str,
    ) -> Result<String, GatewayError> {
        let key = BASE64
            .decode(self.api_secret.trim())
            .map_err(|e| GatewayError::Credentials(format!("secret is not valid base64: {}", e)))?;
        let mut mac = HmacSha256::new_from_slice(&key)
            .map_err(|e| GatewayError::Credentials(e.to_string()))?;

        mac.update(timestamp.as_bytes());
        mac.update(method.to_uppercase().as_bytes());
        mac.update(request_path.as_bytes());
        mac.update(body.as_bytes());

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}
