use std::env;
use std::sync::Arc;

use anyhow::Context;
use tako::app::App;
use tako::config;
use tako::handlers;
use tako::state::set_state;
use tako::{Method, lifecycle, router::Router, serve, tracing as app_tracing};
use tokio::net::TcpListener;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app_tracing::init_tracing();

    let server_config_path =
        env::var("SERVER_CONFIG").unwrap_or_else(|_| "./config/server.json".to_string());
    let kvs_config_path =
        env::var("KVS_CONFIG").unwrap_or_else(|_| "./config/kvs.json".to_string());
    let mime_config_path =
        env::var("MIME_CONFIG").unwrap_or_else(|_| "./config/mime.json".to_string());

    let server_config = config::load_server_config(&server_config_path)
        .await
        .context("loading server config")?;
    let kvs_config = config::load_kvs_config(&kvs_config_path)
        .await
        .context("loading kvs config")?;
    let mime_map = config::load_mime_map(&mime_config_path)
        .await
        .context("loading mime map")?;

    let bind_addr = format!("{}{}", server_config.server_ip, server_config.server_port);

    let app = App::new(server_config, kvs_config, mime_map)
        .await
        .context("building application state")?;

    let app: Arc<App> = set_state(app);

    app.logger.daily_line("server start! welcome").await;

    let mut router = Router::new();
    router.route(Method::GET, "/download", handlers::download);
    router.route(Method::GET, "/greet", handlers::greet);
    router.route(Method::GET, "/flush", handlers::flush);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server_task = tokio::spawn(serve(listener, router, shutdown_rx));

    lifecycle::run(app, shutdown_tx).await;

    let _ = server_task.await;

    println!("server close! Bye Bye");
    Ok(())
}
