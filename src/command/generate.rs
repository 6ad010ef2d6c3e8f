use crate::conf::Conf;
use crate::model::{Campaign, CampaignImage};
use crate::report::{HttpImageSource, ReportAssembler};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const USAGE: &str = "Usage: generate <campaign.json> <images.json> [out_dir]";

pub async fn run(args: &[String], conf: &Conf) -> Result<()> {
    let (Some(campaign_path), Some(images_path)) = (args.first(), args.get(1)) else {
        return Err(Error::CLI(USAGE.into()));
    };
    let out_dir = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let campaign: Campaign = read_json(Path::new(campaign_path))?;
    let images: Vec<CampaignImage> = read_json(Path::new(images_path))?;

    let assembler = ReportAssembler::new(HttpImageSource::new(conf)?, conf.utc_offset);
    let artifact = assembler
        .assemble(Some(&campaign), Some(&images), |progress| {
            info!(
                current = progress.current,
                total = progress.total,
                "Processing image"
            )
        })
        .await?;

    fs::create_dir_all(&out_dir)?;
    let path = out_dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes)?;
    info!(
        path = %path.display(),
        slides = artifact.slide_count(),
        bytes = artifact.bytes.len(),
        "Saved report",
    );
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = fs::read(path).map_err(|e| {
        Error::CLI(format!("Failed to read {}: {e}", path.display()))
    })?;
    Ok(serde_json::from_slice(&file)?)
}
