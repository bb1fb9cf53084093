use tracing_subscriber::EnvFilter;

mod config;
mod constants;
mod error;
mod handlers;
mod models;
mod server;
mod store;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(constants::DEFAULT_LOG_FILTER)),
        )
        .init();

    let result = match config::Config::from_env() {
        Ok(config) => server::run(config).await,
        Err(err) => Err(err),
    };

    if let Err(err) = result {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
