use crate::campaign_api::{self, CampaignApi};
use crate::conf::Conf;
use crate::report::{HttpImageSource, ReportAssembler};
use crate::{Error, Result};
use tracing::info;

pub async fn run(args: &[String], conf: &Conf) -> Result<()> {
    let Some(campaign_id) = args.first() else {
        return Err(Error::CLI("Usage: send-report <campaign_id>".into()));
    };
    let api = CampaignApi::new(conf)?;

    let campaign = api.campaign(campaign_id).await?;
    if campaign.client_email().is_none() {
        return Err(Error::InvalidInput(format!(
            "Campaign {} has no client email",
            campaign.name
        )));
    }

    let images = api.campaign_images(campaign_id).await?;
    let images = campaign_api::normalize_images(&campaign, images)?;
    info!(campaign = campaign.name, images = images.len(), "Loaded campaign images");

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
    let slides = artifact.slide_count();

    api.send_report(&campaign, artifact).await?;
    info!(campaign = campaign.name, slides, "Report sent");
    Ok(())
}
