//! State token signing and verification
//!
//! The state parameter is an HS256 JWS over [`StateClaims`]. Any decode
//! failure is reported as `InvalidState`; the concrete reason only survives
//! in the error source.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::claims::StateClaims;
use crate::config::StateConfig;
use crate::error::{CallbackError, Result};

/// State token codec
pub struct StateCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl_seconds: u64,
}

impl StateCodec {
    /// Create codec from state configuration
    #[must_use]
    pub fn new(config: &StateConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = config.leeway_seconds;

        Self {
            encoding_key,
            decoding_key,
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// 为提供商签发新的 claims
    #[must_use]
    pub fn claims_for(&self, provider: &str) -> StateClaims {
        StateClaims::for_provider(provider, self.ttl_seconds)
    }

    /// Sign claims into an opaque state string
    pub fn encode(&self, claims: &StateClaims) -> Result<String> {
        let mut claims = claims.clone();
        claims.iss.clone_from(&self.issuer);
        claims.aud.clone_from(&self.audience);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CallbackError::internal_with_source("state signing failed", e))
    }

    /// Verify signature, issuer, audience and expiry, then return the claims
    pub fn decode(&self, opaque: &str) -> Result<StateClaims> {
        if opaque.is_empty() {
            return Err(CallbackError::invalid_state(anyhow::anyhow!(
                "empty state token"
            )));
        }

        decode::<StateClaims>(opaque, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(CallbackError::invalid_state)
    }
}

impl std::fmt::Debug for StateCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}
