//! geopir-client binary: privately resolve a coordinate to a street name

use std::sync::Arc;

use clap::Parser;

use geopir_client::ClientBuilder;
use geopir_core::StubEngine;

#[derive(Parser, Debug)]
#[command(name = "geopir-client")]
#[command(about = "Privately resolve GPS coordinates to a street name")]
struct Args {
    /// Latitude, within the service's bounding box
    latitude: f64,

    /// Longitude, within the service's bounding box
    longitude: f64,

    /// Parameter server URL (e.g. localhost:8083)
    server_url: String,

    /// Separate query server URL, if queries use a different port
    query_server_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let mut builder = ClientBuilder::new(&args.server_url, Arc::new(StubEngine));
    if let Some(url) = &args.query_server_url {
        builder = builder.query_url(url);
    }
    let mut client = builder.build()?;

    client.init().await?;
    let street = client.query(args.latitude, args.longitude).await?;
    println!("{}", street);

    Ok(())
}
