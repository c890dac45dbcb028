use pixelforge_core::Config;

// mimalloc as the global allocator for large short-lived image buffers
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    let (_state, router) = pixelforge_api::setup::initialize_app(config.clone()).await?;

    pixelforge_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
