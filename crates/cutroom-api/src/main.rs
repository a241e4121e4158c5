use cutroom_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    cutroom_api::telemetry::init_telemetry();

    let config = Config::from_env()?;

    let (_state, router) = cutroom_api::setup::initialize_app(config.clone()).await?;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Cutroom API listening");

    axum::serve(listener, router).await?;

    Ok(())
}
