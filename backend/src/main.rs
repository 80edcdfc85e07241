use std::error::Error;
use std::sync::Arc;

use env_logger::Env;
use log::info;
use tasksync::{AppContext, Config};

mod api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let context = Arc::new(AppContext::from_config(config)?);
    info!("{}", context.info());

    let listener = tokio::net::TcpListener::bind(&context.config().bind_addr).await?;
    let app = api::router(context);

    info!("Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
