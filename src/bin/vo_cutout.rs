//
// (C) Copyright IBM 2025
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use vo_cutout::soda::{
    CutoutOptions, CutoutRequest, SodaClient, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL,
};

/// Perform image cutouts with a SODA service.
///
/// IMAGE_IDS are one or more identifiers (e.g. butler URIs) of the images to
/// cut out from.
#[derive(Parser, Debug)]
#[command(name = "vo-cutout", version, about, long_about)]
struct Args {
    #[arg(required = true)]
    image_ids: Vec<String>,

    /// Circle cutout as "RA DEC RADIUS" (repeatable)
    #[arg(short, long)]
    circle: Vec<String>,

    /// Position cutout, e.g. "RANGE ..." (repeatable)
    #[arg(short, long)]
    pos: Vec<String>,

    /// Polygon cutout as a list of vertices (repeatable)
    #[arg(long)]
    polygon: Vec<String>,

    /// Base URL for the SODA service
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Authentication token
    #[arg(long, env = "RUBIN_TOKEN", hide_env_values = true)]
    token: String,

    /// Output directory for cutout files
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Optional client-provided job identifier
    #[arg(long)]
    run_id: Option<String>,

    /// Seconds to wait for the job to finish
    #[arg(long, default_value_t = 3600)]
    timeout: u64,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    vo_cutout::initialize(if args.debug { "debug" } else { "info" });

    let mut request = CutoutRequest::new(args.image_ids);
    request.circle = args.circle;
    request.pos = args.pos;
    request.polygon = args.polygon;
    request.run_id = args.run_id;

    let options = CutoutOptions {
        poll_interval: DEFAULT_POLL_INTERVAL,
        timeout: Duration::from_secs(args.timeout),
    };

    let client = SodaClient::new(&args.base_url, &args.token)?;
    let written = client
        .cutout(&request, &args.output_dir, &options)
        .await
        .context("cutout failed")?;

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
