use std::sync::Arc;

use postpilot_auth::AuthenticatorTrait;
use postpilot_db::DbPool;
use postpilot_dispatch::{DeepSeekClient, DispatchBridge};

use crate::registrar::JobRegistrar;

/// Shared application state, passed to handlers via `Extension<Arc<AppState>>`.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub authenticator: Arc<dyn AuthenticatorTrait>,
    pub bridge: Arc<dyn DispatchBridge>,
    pub ai: Option<DeepSeekClient>,
    pub registrar: JobRegistrar,
    pub uploads_dir: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
}

impl AppState {
    pub fn new(
        db_pool: DbPool,
        authenticator: Arc<dyn AuthenticatorTrait>,
        bridge: Arc<dyn DispatchBridge>,
        ai: Option<DeepSeekClient>,
        uploads_dir: impl Into<String>,
        jwt_secret: impl Into<String>,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            db_pool,
            authenticator,
            bridge,
            ai,
            registrar: JobRegistrar::new(),
            uploads_dir: uploads_dir.into(),
            jwt_secret: jwt_secret.into(),
            token_ttl_hours,
        }
    }
}
