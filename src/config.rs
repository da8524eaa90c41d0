use std::net::SocketAddr;

pub const PUBLIC_KEY_ENV: &str = "WEB_PUSH_PUBLIC_KEY";
pub const SUBJECT_ENV: &str = "WEB_PUSH_EMAIL";
pub const PRIVATE_KEY_ENV: &str = "WEB_PUSH_PRIVATE_KEY";

pub const DEFAULT_APP_NAME: &str = "Web Push";
pub const APP_DESCRIPTION: &str = "Web Push Experiments";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen: SocketAddr,
    pub app_name: String,
    /// `None` leaves the send endpoint answering with a configuration error.
    pub vapid: Option<VapidConfig>,
}

/// Credentials that passed [`crate::push::load_vapid_config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VapidConfig {
    pub private_key: String,
    pub public_key: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing push credential {0}")]
    MissingCredential(&'static str),
    #[error("invalid VAPID private key: {0}")]
    InvalidPrivateKey(String),
    #[error("invalid VAPID public key")]
    InvalidPublicKey,
    #[error("VAPID public key does not match the private key")]
    KeyMismatch,
    #[error("invalid VAPID subject '{0}'; expected an email address, mailto: or https: URI")]
    InvalidSubject(String),
}

#[cfg(test)]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            app_name: DEFAULT_APP_NAME.to_string(),
            vapid: None,
        }
    }
}
