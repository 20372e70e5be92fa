mod api;

use axum_test::TestServer;
use libvena::prelude::*;

use crate::api::{
  config::{Config, Env},
  routes,
};

pub(crate) fn test_server() -> TestServer {
  let config = Config {
    env: Env::Dev,
    listen_addr: "127.0.0.1:0".to_string(),
    enable_prometheus: false,
    enable_tracing: false,
  };

  let app = routes(&config, Vena::new(MemoryDonorStore::new(), MemoryRequestStore::new())).unwrap();

  TestServer::new(app).unwrap()
}
