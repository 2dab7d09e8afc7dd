//! geopir-server binary: reverse-geocode PIR service

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use geopir_core::{ServiceConfig, StubEngine};
use geopir_server::{metrics, ServerBuilder};

#[derive(Parser, Debug)]
#[command(name = "geopir-server")]
#[command(about = "Privacy-preserving reverse geocoding PIR service")]
struct Args {
    /// Address to listen on (e.g. 0.0.0.0)
    listen_ip: IpAddr,

    /// Port to listen on
    port: u16,

    /// Directory holding the flat binary databases
    #[arg(long, default_value = "./data/database")]
    data_dir: PathBuf,

    /// JSON config file (overrides --data-dir)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ServiceConfig::load(path)?,
        None => ServiceConfig::from_base_dir(&args.data_dir),
    };

    let metrics_handle = metrics::init_prometheus_recorder();

    // The production lattice engine links in behind the same traits; the
    // stub engine serves development setups.
    let server = ServerBuilder::new(config, Arc::new(StubEngine))
        .addr(SocketAddr::new(args.listen_ip, args.port))
        .metrics(metrics_handle)
        .build()?;

    server.run().await?;

    Ok(())
}
