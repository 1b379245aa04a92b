//! Build-time pricing data generator.
//!
//! Downloads the bulk Price List document for every (service, region) pair,
//! strips non-OnDemand terms, and writes one JSON file per pair. Runs at
//! release build time only; the plugin never touches the network.

mod filter;
mod offers;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::info;

#[derive(Parser)]
#[command(name = "pricing-gen", about = "Fetch and filter AWS Price List data")]
struct Args {
    /// Region(s) to fetch; repeat the flag for a multi-region run.
    #[arg(long = "region", required = true)]
    regions: Vec<String>,

    /// Output directory for the {service}_{region}.json files.
    #[arg(long, default_value = "data/pricing")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tokio::fs::create_dir_all(&args.out)
        .await
        .with_context(|| format!("failed to create {}", args.out.display()))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(600))
        .build()
        .context("failed to build HTTP client")?;

    for region in &args.regions {
        for (service, offer_code) in offers::SERVICES.iter().copied() {
            fetch_and_write(&client, service, offer_code, region, &args.out).await?;
        }
    }

    Ok(())
}

async fn fetch_and_write(
    client: &reqwest::Client,
    service: &str,
    offer_code: &str,
    region: &str,
    out_dir: &PathBuf,
) -> Result<()> {
    let url = offers::offer_url(offer_code, region);
    info!(service, region, url = %url, "fetching offer document");

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("request for {service}/{region} failed"))?;
    if !response.status().is_success() {
        bail!("{service}/{region}: upstream returned {}", response.status());
    }

    let mut document: Value = response
        .json()
        .await
        .with_context(|| format!("{service}/{region}: malformed offer document"))?;

    filter::retain_on_demand_terms(&mut document);

    let product_count = filter::product_count(&document);
    if product_count == 0 {
        bail!("{service}/{region}: offer document contains no products");
    }

    let path = out_dir.join(offers::output_file(service, region));
    let serialized = serde_json::to_string(&document)?;
    tokio::fs::write(&path, &serialized)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        service,
        region,
        products = product_count,
        bytes = serialized.len(),
        path = %path.display(),
        "wrote pricing file"
    );
    Ok(())
}
