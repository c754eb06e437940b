//! Lightweight authentication facade used by the backend service.
//!
//! Provides:
//! - JWT token issuance and verification (HS256)
//! - Password hashing with Argon2id
//! - Authentication context and error types

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier,
        SaltString,
    },
    Argon2,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Authentication Context
// ============================================================================

/// Captures the outcome of an authentication attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Option<i64>,
}

impl AuthContext {
    /// Build a new context describing the currently authenticated subject.
    #[inline]
    pub fn new(user_id: Option<i64>) -> Self {
        Self { user_id }
    }

    /// Helper for anonymous requests.
    #[inline]
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// Indicates if the request represents an authenticated user.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Authentication errors that can surface during request processing.
#[derive(Debug, Error, Clone)]
pub enum AuthError {
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("token expired")]
    TokenExpired,
    #[error("missing bearer token")]
    MissingToken,
    #[error("authentication subsystem is unavailable: {0}")]
    Subsystem(String),
}

/// Password-related errors.
#[derive(Debug, Error, Clone)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    HashingFailed(String),
    #[error("password verification failed")]
    VerificationFailed,
    #[error("invalid hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Authenticator Trait
// ============================================================================

/// Trait for authentication backends. Implement this for production and test authenticators.
#[async_trait::async_trait]
pub trait AuthenticatorTrait: Send + Sync + 'static {
    async fn authenticate(&self, token: Option<&str>) -> Result<AuthContext, AuthError>;
}

// ============================================================================
// Test Authenticator
// ============================================================================

/// Test-only authenticator that accepts any non-empty token as a fixed user.
#[derive(Debug, Default)]
pub struct TestAuthenticator {
    pub user_id: Option<i64>,
}

impl TestAuthenticator {
    pub fn user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}

#[async_trait::async_trait]
impl AuthenticatorTrait for TestAuthenticator {
    async fn authenticate(&self, token: Option<&str>) -> Result<AuthContext, AuthError> {
        match token {
            Some(t) if !t.trim().is_empty() => Ok(AuthContext::new(self.user_id)),
            _ => Err(AuthError::MissingToken),
        }
    }
}

// ============================================================================
// JWT Authenticator
// ============================================================================

/// JWT-based authenticator verifying HS256 signatures against a shared secret.
#[derive(Debug, Clone)]
pub struct JwtAuthenticator {
    secret: String,
    /// Grace period in seconds for token expiration (default: 60)
    exp_grace_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Option<String>,
    exp: Option<u64>,
}

impl JwtAuthenticator {
    pub fn new_hs256(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            exp_grace_seconds: 60,
        }
    }

    /// Set the grace period for token expiration checks.
    pub fn with_exp_grace(mut self, seconds: u64) -> Self {
        self.exp_grace_seconds = seconds;
        self
    }

    fn process_claims(&self, claims: Claims) -> Result<AuthContext, AuthError> {
        if let Some(exp) = claims.exp {
            let now = chrono::Utc::now().timestamp() as u64;
            if exp < now.saturating_sub(self.exp_grace_seconds) {
                return Err(AuthError::TokenExpired);
            }
        }

        let sub = claims.sub.and_then(|s| s.parse::<i64>().ok());
        Ok(AuthContext::new(sub))
    }

    /// Strip the "Bearer " prefix from a token if present.
    #[inline]
    fn strip_bearer(token: &str) -> &str {
        let token = token.trim();
        if token.len() > 7 && token[..7].eq_ignore_ascii_case("bearer ") {
            &token[7..]
        } else {
            token
        }
    }
}

#[async_trait::async_trait]
impl AuthenticatorTrait for JwtAuthenticator {
    async fn authenticate(&self, token: Option<&str>) -> Result<AuthContext, AuthError> {
        let token = match token {
            Some(t) if !t.trim().is_empty() => Self::strip_bearer(t),
            _ => return Err(AuthError::MissingToken),
        };

        use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

        let decoding = DecodingKey::from_secret(self.secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false; // We handle exp manually for grace period
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &decoding, &validation)
            .map_err(|_| AuthError::AuthenticationFailed)?;

        self.process_claims(data.claims)
    }
}

/// Issue an HS256 token asserting `user_id`, expiring `ttl_hours` from now.
pub fn issue_token(secret: &str, user_id: i64, ttl_hours: i64) -> Result<String, AuthError> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let exp = (chrono::Utc::now().timestamp() + ttl_hours * 3600) as u64;
    let claims = Claims {
        sub: Some(user_id.to_string()),
        exp: Some(exp),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Subsystem(format!("jwt encode failed: {e}")))
}

// ============================================================================
// Password Hashing
// ============================================================================

/// Password hasher using Argon2id (the recommended variant for password hashing).
#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    m_cost: u32,
    /// Time cost / iterations (default: 2)
    t_cost: u32,
    /// Parallelism factor (default: 1)
    p_cost: u32,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        // OWASP recommended minimum parameters for Argon2id
        Self {
            m_cost: 19456, // 19 MiB
            t_cost: 2,
            p_cost: 1,
        }
    }
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure memory cost in KiB.
    pub fn with_memory_cost(mut self, kib: u32) -> Self {
        self.m_cost = kib;
        self
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            argon2::Params::new(self.m_cost, self.t_cost, self.p_cost, None)
                .expect("valid argon2 params"),
        )
    }

    /// Hash a password, returning the PHC-format hash string.
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored PHC-format hash.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<(), PasswordError> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|_| PasswordError::InvalidHashFormat)?;

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| PasswordError::VerificationFailed)
    }
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Hash a password using default Argon2id parameters.
#[inline]
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    Argon2Hasher::new().hash(password)
}

/// Verify a password against a stored hash using default parameters.
#[inline]
pub fn verify_password(password: &str, stored_hash: &str) -> Result<(), PasswordError> {
    Argon2Hasher::new().verify(password, stored_hash)
}

// ============================================================================
// Tests
// ============================================================================
