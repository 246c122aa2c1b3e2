use thiserror::Error;

/// Failure talking to the venue
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("authentication rejected (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("venue rejected request (HTTP {status}): {message}")]
    Venue { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{0} is not supported by this venue")]
    Unsupported(&'static str),

    #[error("no USD or USDC balance on the account")]
    CollateralUnavailable,

    #[error("invalid credentials: {0}")]
    Credentials(String),

    #[error("order quantity {0} is not submittable")]
    InvalidQuantity(f64),

    #[error("symbol {0} is not listed on this venue")]
    UnknownSymbol(String),
}

impl GatewayError {
    /// Whether the venue refused our credentials
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. } | Self::Credentials(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
