use anyhow::Context;
use hitler_engine::config::Config;
use hitler_engine::session::{run_clock, Session};
use hitler_engine::{api, ws::accept_connection};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

// FIXME: Implement TLS support

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::try_init().ok();

    if let Err(err) = run().await {
        log::error!("{:#}", err);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let db = sled::open(&config.db_path).with_context(|| format!("could not open database at {}", config.db_path))?;
    let session = Session::open(&db, config.options, config.seed)
        .map_err(|err| anyhow::anyhow!("could not load the game: {}", err))?;
    let session = Arc::new(Mutex::new(session));

    tokio::spawn(run_clock(session.clone(), config.tick_interval));

    if let Some(port) = config.api_port {
        let listener = api::listen(port).await?;
        let router = api::make_router(session.clone());
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, router).await {
                log::error!("API server failed: {}", err);
            }
        });
    }

    let addr = SocketAddrV4::new(Ipv4Addr::new(127, 0, 0, 1), config.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind to address {:?}", addr))?;
    log::info!("Listening on: {:?}", addr);

    while let Ok((stream, _)) = listener.accept().await {
        tokio::spawn(accept_connection(stream, session.clone()));
    }
    Ok(())
}
