//! Registers an API from a local OpenAPI document: created if unknown,
//! versioned if the lineage exists without this version, updated in place
//! otherwise. Activates the result.
//!
//! Expects a gateway at `http://localhost:5555` and a
//! `petstore.openapi.json` in the working directory. Run with
//! `RUST_LOG=apigw_client=debug` to watch the individual gateway calls.

use apigw_client::{GatewayClient, SpecResolver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = GatewayClient::connect("http://localhost:5555", "Administrator", "manage")?;
    let resolver = SpecResolver::new()?;

    let spec = resolver.descriptor("petstore.openapi.json").await?;
    println!("registering {} {}", spec.name, spec.version);

    let api = client.reconcile(&spec).await?;
    println!(
        "API {} is now at system version {} (id {})",
        api.name, api.system_version, api.id
    );

    let api = client.activate(&api.id, false).await?;
    println!("active: {}", api.is_active);

    Ok(())
}
