use crate::{
    configuration::Configuration, configuration_handler::ConfigurationHandler,
    http::start_server, json_store::JsonStore,
};
use tracing::error;
use tracing_subscriber::EnvFilter;

mod backend;
mod configuration;
mod configuration_handler;
mod engine;
mod error;
mod http;
mod json_store;
mod schedule;
#[cfg(test)]
mod testutils;
mod types;

#[derive(Clone)]
struct AppState<T> {
    backend: T,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("###########################");
    println!("# Availability Calendar   #");
    println!("###########################");

    let configuration = ConfigurationHandler::parse_arguments();

    let backend = match JsonStore::open(configuration.data_file()) {
        Ok(backend) => backend,
        Err(err) => {
            error!(?err, "failed to open availability store");
            std::process::exit(1);
        }
    };

    start_server(backend, configuration).await;
}
