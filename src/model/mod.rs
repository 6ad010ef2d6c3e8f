pub mod campaign;
pub use campaign::Campaign;

pub mod campaign_image;
pub use campaign_image::CampaignImage;

pub mod date_value;
pub use date_value::DateValue;

pub mod resolve;
