//! Promotes a registered API to the `production` stage.
//!
//! Expects a gateway at `http://localhost:5555` with a `production` stage
//! configured and the Petstore API already registered (see the
//! register-api-version demo).

use apigw_client::{GatewayClient, PromoteOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = GatewayClient::connect("http://localhost:5555", "Administrator", "manage")?;

    let apis = client
        .find_by_name_and_version("Swagger Petstore", Some("1.0.6"))
        .await?;
    let api = &apis[0];

    let stage = client.find_stage("production").await?;
    println!("promoting {} {} to {}", api.name, api.version, stage.name);

    let promotion = client
        .promote("petstore-release", &api.id, &stage.id, PromoteOptions::default())
        .await?;
    println!("promotion accepted: {:?}", promotion.id);

    Ok(())
}
