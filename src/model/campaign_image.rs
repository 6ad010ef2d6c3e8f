use super::{resolve, DateValue};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

pub const DEFAULT_ROLE: &str = "Tracker";

/// A photo uploaded against a campaign.
///
/// Records come from different upload paths (tracker app, admin upload, older
/// imports), so the same fact may live under several keys. The accessors below
/// resolve them in a fixed order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignImage {
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub path: Option<String>,
    pub image: Option<String>,
    pub uploaded_by: Option<String>,
    pub service_man_email: Option<String>,
    pub location: Option<String>,
    pub live_location: Option<String>,
    pub role: Option<String>,
    pub uploaded_at: Option<DateValue>,
    pub created_at: Option<DateValue>,
    pub timestamp: Option<DateValue>,
    pub date_time: Option<DateValue>,
    pub board_id: Option<String>,
    pub board_details: Option<String>,
    #[serde(deserialize_with = "lenient_quantity")]
    pub board_quantity: Option<i64>,
}

impl CampaignImage {
    /// imageUrl, url, path, image
    pub fn source_url(&self) -> Option<&str> {
        resolve::first_present([
            self.image_url.as_deref(),
            self.url.as_deref(),
            self.path.as_deref(),
            self.image.as_deref(),
        ])
    }

    pub fn uploader(&self) -> Option<&str> {
        resolve::first_present([
            self.uploaded_by.as_deref(),
            self.service_man_email.as_deref(),
        ])
    }

    pub fn location(&self) -> Option<&str> {
        resolve::first_present([self.location.as_deref(), self.live_location.as_deref()])
    }

    pub fn role(&self) -> &str {
        resolve::first_present([self.role.as_deref()]).unwrap_or(DEFAULT_ROLE)
    }

    /// uploadedAt, createdAt, timestamp, dateTime. The first one that is set
    /// wins; if it does not parse there is no date.
    pub fn captured_at(&self) -> Option<OffsetDateTime> {
        resolve::first_where(
            [
                self.uploaded_at.as_ref(),
                self.created_at.as_ref(),
                self.timestamp.as_ref(),
                self.date_time.as_ref(),
            ],
            |it| it.is_present(),
        )
        .and_then(DateValue::parse)
    }

    pub fn board_details(&self) -> Option<&str> {
        resolve::first_present([self.board_details.as_deref()])
    }

    pub fn board_quantity(&self) -> Option<i64> {
        self.board_quantity.filter(|it| *it != 0)
    }

    #[cfg(test)]
    pub fn mock(url: &str) -> CampaignImage {
        CampaignImage {
            image_url: Some(url.into()),
            ..CampaignImage::default()
        }
    }
}

// Admin uploads post form data, so quantities may arrive as strings
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_i64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}
