use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use postpilot_auth::{AuthenticatorTrait, JwtAuthenticator};
use postpilot_db::{create_pool, DbConnectionConfig, DbPool};
use postpilot_dispatch::{DeepSeekClient, DispatchBridge, HttpBridge, PythonBridge};
use postpilot_server::{app, state::AppState, tracing_setup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("POSTPILOT_CONFIG").ok());
    let cfg = postpilot_config::load_config(config_path.as_deref())
        .context("failed to load configuration")?;

    tracing_setup::init(&cfg.logging);

    let url = cfg.database.connection_url()?;
    let db_cfg = DbConnectionConfig::new(url).with_max_connections(cfg.database.max_connections);
    let pool = create_pool(&db_cfg)
        .await
        .context("failed to open database pool")?;
    run_migrations(&pool).await?;

    let jwt_secret = cfg
        .auth
        .jwt_secret
        .clone()
        .context("auth.jwt_secret (or POSTPILOT_JWT_SECRET) must be set")?;
    let authenticator: Arc<dyn AuthenticatorTrait> =
        Arc::new(JwtAuthenticator::new_hs256(jwt_secret.clone()));

    let bridge: Arc<dyn DispatchBridge> = match cfg.dispatch.worker_url {
        Some(ref worker) => {
            tracing::info!(%worker, "dispatching to remote worker");
            Arc::new(HttpBridge::with_timeout_secs(
                worker.clone(),
                cfg.dispatch.timeout_secs,
            )?)
        }
        None => {
            tracing::info!(script_root = %cfg.dispatch.script_root, "dispatching to local scripts");
            Arc::new(
                PythonBridge::new(&cfg.dispatch.script_root)
                    .with_python_bin(cfg.dispatch.python_bin.clone())
                    .with_timeout_secs(cfg.dispatch.timeout_secs),
            )
        }
    };

    let ai = match cfg.ai.deepseek_api_key {
        Some(ref key) => Some(DeepSeekClient::new(
            key.clone(),
            cfg.ai.deepseek_api_url.clone(),
            cfg.ai.context_path.clone().map(PathBuf::from),
        )?),
        None => None,
    };

    let state = Arc::new(AppState::new(
        pool,
        authenticator,
        bridge,
        ai,
        cfg.uploads.directory.clone(),
        jwt_secret,
        cfg.auth.token_ttl_hours,
    ));
    let router = app::build_router_with_cors(state, &cfg.cors);

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, router).await?;
    Ok(())
}

async fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    #[cfg(feature = "postgres")]
    postpilot_migrations::postgres_migrator().run(pool).await?;
    #[cfg(not(feature = "postgres"))]
    postpilot_migrations::sqlite_migrator().run(pool).await?;
    tracing::debug!("migrations applied");
    Ok(())
}
