use dotenvy::dotenv;

use authkit_axum::{AuthConfig, authkit_router};

mod server;

use server::{init_tracing, serve};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    init_tracing("demo_api");

    let config = AuthConfig::from_env();
    let bind_address = config.bind_address();
    let context = authkit_axum::init(config).await?;

    serve(&bind_address, authkit_router(context)).await?;
    Ok(())
}
