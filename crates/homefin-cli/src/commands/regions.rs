use clap::Args;
use serde_json::Value;

use homefin_core::mortgage::{region_defaults, REGIONS};
use homefin_core::HomeFinanceError;

/// Arguments for the regional defaults table
#[derive(Args)]
pub struct RegionsArgs {
    /// Show one state or territory by its two-letter code
    #[arg(long)]
    pub code: Option<String>,
}

pub fn run_regions(args: RegionsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.code {
        Some(code) => {
            let region =
                region_defaults(&code).ok_or_else(|| HomeFinanceError::UnknownRegion(code.clone()))?;
            Ok(serde_json::to_value(region)?)
        }
        None => Ok(serde_json::to_value(&REGIONS[..])?),
    }
}
