pub mod adapters;
pub mod app;
mod assets;
pub mod config;
pub mod ports;
pub mod push;
pub mod state;
pub mod subscription;
mod templates;
pub mod types;
pub mod worker;

#[cfg(test)]
pub(crate) mod testing;

pub use app::app;
pub use push::generate_vapid_credentials;

pub async fn serve(config: config::AppConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(config)).await
}
