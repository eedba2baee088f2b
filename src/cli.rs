use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use shotlink::capture::SelectionArea;

#[derive(Parser, Debug)]
#[command(name = "shotlink")]
#[command(about = "Region screenshot share pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the upload/retrieval HTTP server
    Server(ServerArgs),
    /// Crop a captured viewport PNG to a region and upload it
    Capture(CaptureArgs),
}

#[derive(clap::Args, Debug)]
pub struct ServerArgs {
    /// Address to bind the HTTP server to (overrides configuration)
    #[arg(long)]
    pub address: Option<SocketAddr>,
}

#[derive(clap::Args, Debug)]
pub struct CaptureArgs {
    /// PNG file holding the full-viewport capture
    #[arg(long)]
    pub input: PathBuf,

    /// Selected region as x,y,width,height in CSS pixels
    #[arg(long)]
    pub area: String,

    /// Device pixel ratio of the capture relative to the selection
    #[arg(long, default_value_t = 1.0)]
    pub dpr: f64,

    /// Upload server base URL (overrides configuration)
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Parse an `x,y,width,height` selection argument
pub fn parse_area(raw: &str) -> Result<SelectionArea, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected x,y,width,height, got: {raw}"));
    }

    let mut values = [0f64; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid number in area: {part}"))?;
    }

    Ok(SelectionArea::new(values[0], values[1], values[2], values[3]))
}
