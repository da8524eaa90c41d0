use base64::{URL_SAFE_NO_PAD, decode_config, encode_config};
use jwt_simple::prelude::ES256KeyPair;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::config::{self, ConfigError, VapidConfig};

#[derive(Debug, Clone)]
pub struct VapidCredentials {
    pub private_key: String,
    pub public_key: String,
}

/// Validates the three delivery credentials once, at startup.
///
/// The public key is checked against the one derived from the private key:
/// browsers subscribe with the public key, so a mismatch would make every
/// delivery fail with an authorization error.
pub fn load_vapid_config(
    public_key: Option<&str>,
    subject: Option<&str>,
    private_key: Option<&str>,
) -> Result<VapidConfig, ConfigError> {
    let public_key = required(public_key, config::PUBLIC_KEY_ENV)?;
    let subject = required(subject, config::SUBJECT_ENV)?;
    let private_key = required(private_key, config::PRIVATE_KEY_ENV)?;

    let derived = web_push::VapidSignatureBuilder::from_base64_no_sub(private_key, URL_SAFE_NO_PAD)
        .map_err(|err| ConfigError::InvalidPrivateKey(err.to_string()))?
        .get_public_key();
    if decode_key(public_key)? != derived {
        return Err(ConfigError::KeyMismatch);
    }

    Ok(VapidConfig {
        private_key: private_key.to_string(),
        public_key: encode_config(derived, URL_SAFE_NO_PAD),
        subject: normalize_subject(subject)?,
    })
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingCredential(name))
}

/// Accepts standard or URL-safe alphabets, with or without padding.
fn decode_key(raw: &str) -> Result<Vec<u8>, ConfigError> {
    let normalized: String = raw
        .trim_end_matches('=')
        .chars()
        .map(|ch| match ch {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    decode_config(normalized, URL_SAFE_NO_PAD).map_err(|_| ConfigError::InvalidPublicKey)
}

/// Push services require the `sub` claim to be a `mailto:` or `https:` URI.
fn normalize_subject(subject: &str) -> Result<String, ConfigError> {
    if subject.starts_with("mailto:") || subject.starts_with("https://") {
        return Ok(subject.to_string());
    }
    match subject.split_once('@') {
        Some((user, host)) if !user.is_empty() && !host.is_empty() && !subject.contains(' ') => {
            Ok(format!("mailto:{subject}"))
        }
        _ => Err(ConfigError::InvalidSubject(subject.to_string())),
    }
}

pub fn generate_vapid_credentials() -> Result<VapidCredentials, web_push::WebPushError> {
    let mut rng = OsRng;
    generate_vapid_credentials_with_rng(&mut rng)
}

pub(crate) fn generate_vapid_credentials_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<VapidCredentials, web_push::WebPushError> {
    let key_pair = generate_es256_keypair_with_rng(rng);
    let private_key = encode_config(key_pair.to_bytes(), URL_SAFE_NO_PAD);
    let public_key =
        web_push::VapidSignatureBuilder::from_base64_no_sub(&private_key, URL_SAFE_NO_PAD)?
            .get_public_key();
    let public_key = encode_config(public_key, URL_SAFE_NO_PAD);

    Ok(VapidCredentials {
        private_key,
        public_key,
    })
}

fn generate_es256_keypair_with_rng<R: RngCore + CryptoRng>(rng: &mut R) -> ES256KeyPair {
    let mut key_bytes = [0u8; 32];
    loop {
        rng.fill_bytes(&mut key_bytes);
        if let Ok(key_pair) = ES256KeyPair::from_bytes(&key_bytes) {
            return key_pair;
        }
    }
}
