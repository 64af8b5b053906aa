use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use hub_core::{
    config::Config,
    shopping::{ListStore, ShoppingService},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    hub_core::logging::init("hub")?;

    let cfg = Arc::new(Config::load()?);
    let shopping = ShoppingService::new(ListStore::new(cfg.shopping_list_file.clone()));
    tracing::info!(
        path = %cfg.shopping_list_file.display(),
        "shopping list record"
    );

    let cancel = CancellationToken::new();

    // The bot runs on its own task; it never returns an error into the HTTP side.
    let bot_task = if cfg.telegram_bot_token.is_some() {
        let cfg = cfg.clone();
        let shopping = shopping.clone();
        let cancel = cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = hub_telegram::router::run_polling(cfg, shopping, cancel).await {
                tracing::error!(error = %e, "telegram bot could not start");
            }
        }))
    } else {
        tracing::warn!("TELEGRAM_BOT_TOKEN not set; shopping bot disabled");
        None
    };

    let app = hub_http::build_app(shopping);
    let listener = tokio::net::TcpListener::bind(cfg.http_bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.http_bind_addr))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    let shutdown = cancel.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
            shutdown.cancel();
        })
        .await
        .context("http server failed")?;

    cancel.cancel();
    if let Some(task) = bot_task {
        let _ = task.await;
    }
    Ok(())
}
