use super::deck::Deck;
use super::file_name::report_file_name;
use super::{layout, pptx, ImageError, ImageSource, Picture};
use crate::model::{Campaign, CampaignImage};
use crate::{Error, Result};
use time::{OffsetDateTime, UtcOffset};
use tracing::{info, warn};

pub const AUTHOR: &str = "Campaign Report Generator";

/// Reported once per image, before it is fetched. `current` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

pub struct ReportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub deck: Deck,
}

impl ReportArtifact {
    pub fn slide_count(&self) -> usize {
        self.deck.slides.len()
    }
}

pub struct ReportAssembler<S: ImageSource> {
    source: S,
    utc_offset: UtcOffset,
}

impl<S: ImageSource> ReportAssembler<S> {
    pub fn new(source: S, utc_offset: UtcOffset) -> ReportAssembler<S> {
        ReportAssembler { source, utc_offset }
    }

    /// Builds a title slide plus one slide per image. A broken image turns into
    /// an error slide, it never fails the whole report.
    pub async fn assemble(
        &self,
        campaign: Option<&Campaign>,
        images: Option<&[CampaignImage]>,
        mut progress: impl FnMut(Progress),
    ) -> Result<ReportArtifact> {
        let (Some(campaign), Some(images)) = (campaign, images) else {
            return Err(Error::InvalidInput(
                "Campaign or images data is missing".into(),
            ));
        };
        if images.is_empty() {
            return Err(Error::InvalidInput(
                "No images available for this campaign".into(),
            ));
        }
        info!(campaign = campaign.name, images = images.len(), "Generating report");

        let now = OffsetDateTime::now_utc();
        let mut deck = Deck::new(format!("Campaign Report - {}", campaign.name), AUTHOR, now);
        deck.slides.push(layout::title_slide(campaign, now, self.utc_offset));

        let mut failed = 0;
        for (i, image) in images.iter().enumerate() {
            progress(Progress {
                current: i + 1,
                total: images.len(),
            });
            let outcome = self.load_picture(image).await;
            if let Err(err) = &outcome {
                warn!(
                    image = i + 1,
                    url = image.source_url(),
                    uploader = image.uploader(),
                    %err,
                    "Failed to load image",
                );
                failed += 1;
            }
            deck.slides.push(layout::image_slide(
                i,
                images.len(),
                image,
                outcome,
                self.utc_offset,
            ));
        }

        let bytes = pptx::write(&deck)?;
        info!(
            campaign = campaign.name,
            slides = deck.slides.len(),
            failed,
            bytes = bytes.len(),
            "Report generated",
        );
        Ok(ReportArtifact {
            file_name: report_file_name(&campaign.name),
            bytes,
            deck,
        })
    }

    async fn load_picture(&self, image: &CampaignImage) -> Result<Picture, ImageError> {
        let url = image
            .source_url()
            .ok_or_else(|| ImageError::Fetch("Image URL is missing".into()))?;
        let fetched = self.source.fetch(url).await?;
        let is_image = fetched
            .content_type
            .as_deref()
            .map(|it| it.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(ImageError::Fetch("Invalid image format".into()));
        }
        Picture::decode(fetched.bytes)
    }
}
