mod api;
mod trace;

#[cfg(test)]
mod tests;

use libvena::prelude::*;
use tokio::signal;

use crate::api::config::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let config = Config::from_env()?;

  run(config, MemoryDonorStore::new(), MemoryRequestStore::new()).await
}

async fn run<D: DonorStore, R: RequestStore>(config: Config, donors: D, requests: R) -> anyhow::Result<()> {
  let _guards = trace::init_tracing(&config, std::io::stdout());
  let app = api::routes(&config, Vena::new(donors, requests))?;
  let listener = tokio::net::TcpListener::bind(&config.listen_addr).await.expect("could not create listener");

  tracing::info!(vena = env!("CARGO_PKG_VERSION"), "listening on {}", listener.local_addr()?.to_string());

  axum::serve(listener, app).with_graceful_shutdown(shutdown()).await.expect("could not start app");

  Ok(())
}

async fn shutdown() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("failed to install ^C handler");
  };

  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("failed to install terminate signal handler")
      .recv()
      .await;
  };

  tokio::select! {
      () = ctrl_c => tracing::info!("received ^C, initiating shutdown"),
      () = terminate => tracing::info!("received terminate signal, initiating shutdown"),
  }
}
