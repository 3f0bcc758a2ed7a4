use std::sync::Arc;

use chirpy_types::{Clock, SystemClock, UserId};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{SessionError, SessionResult};

/// Longest lifetime the server will ever grant a token, in seconds.
pub const MAX_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Issuer name stamped into every token unless configured otherwise.
pub const DEFAULT_ISSUER: &str = "chirpy";

/// The only algorithm tokens are signed or accepted with.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Clamp a requested lifetime into `(0, MAX_TOKEN_TTL_SECS]`.
///
/// `None` and `0` select the maximum.
pub fn clamp_ttl(requested: Option<u64>) -> u64 {
    match requested {
        None | Some(0) => MAX_TOKEN_TTL_SECS,
        Some(secs) => secs.min(MAX_TOKEN_TTL_SECS),
    }
}

/// Process-wide symmetric signing key.
#[derive(Clone)]
pub struct SigningSecret(Arc<[u8]>);

impl SigningSecret {
    pub fn new(bytes: impl AsRef<[u8]>) -> SessionResult<Self> {
        let bytes = bytes.as_ref();
        if bytes.is_empty() {
            return Err(SessionError::InvalidSecret);
        }
        Ok(Self(Arc::from(bytes)))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret(<redacted>)")
    }
}

/// Registered claims carried by a session token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub iss: String,
    /// Decimal user id.
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Mints and validates bearer tokens binding a request to one user until
/// an expiry time.
///
/// Tokens are stateless: validity is a pure function of the signing secret
/// and the current time. There is no revocation.
pub struct SessionIssuer {
    issuer: String,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl SessionIssuer {
    /// Issuer using the system clock and [`DEFAULT_ISSUER`].
    pub fn new(secret: &SigningSecret) -> Self {
        Self::with_clock(secret, DEFAULT_ISSUER, Arc::new(SystemClock))
    }

    pub fn with_clock(secret: &SigningSecret, issuer: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        let issuer = issuer.into();

        // Expiry and not-before are checked against the injected clock below,
        // so the library's own wall-clock checks are switched off.
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        Self {
            issuer,
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Sign a token for `user` valid for the clamped `ttl_secs` from now.
    pub fn issue(&self, user: UserId, ttl_secs: Option<u64>) -> SessionResult<String> {
        let iat = self.clock.now();
        let claims = SessionClaims {
            iss: self.issuer.clone(),
            sub: user.to_string(),
            iat,
            exp: iat.saturating_add(clamp_ttl(ttl_secs)),
        };
        jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| SessionError::Signing(e.to_string()))
    }

    /// Validate a token and return the user it was issued to.
    ///
    /// Any failure (bad signature, wrong algorithm, wrong issuer, malformed
    /// token, outside `[iat, exp)`, unparsable subject) is `Unauthorized`.
    pub fn validate(&self, token: &str) -> SessionResult<UserId> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "token rejected");
                SessionError::Unauthorized
            })?;
        let claims = data.claims;

        let now = self.clock.now();
        if now < claims.iat || now >= claims.exp {
            tracing::debug!(now, iat = claims.iat, exp = claims.exp, "token outside validity window");
            return Err(SessionError::Unauthorized);
        }

        claims.sub.parse::<UserId>().map_err(|_| {
            tracing::debug!("token subject is not a user id");
            SessionError::Unauthorized
        })
    }
}

impl std::fmt::Debug for SessionIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIssuer")
            .field("issuer", &self.issuer)
            .field("algorithm", &ALGORITHM)
            .finish_non_exhaustive()
    }
}
