pub mod api;
pub mod cache;
pub mod config;
pub mod crawler;
pub mod database;
pub mod declare;
pub mod logging;
pub mod util;

use anyhow::Result;

#[cfg(all(target_os = "linux", target_env = "musl"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let port = config::SETTINGS.system.http_port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    logging::info_file_async(format!("psx_crawler listening on 0.0.0.0:{}", port));

    axum::serve(listener, api::router()).await?;

    Ok(())
}
