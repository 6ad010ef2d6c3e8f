use crate::{Error, Result};
use std::{env, time::Duration};
use time::{macros::format_description, UtcOffset};
use tracing::info;

#[derive(Clone, Debug)]
pub struct Conf {
    pub bind_addr: String,
    pub campaign_api_url: String,
    pub campaign_list_url: String,
    pub campaign_api_token: Option<String>,
    pub fetch_timeout: Duration,
    pub user_agent: String,
    pub utc_offset: UtcOffset,
    pub max_json_bytes: usize,
    pub max_image_bytes: usize,
}

impl Conf {
    pub fn from_env() -> Result<Conf> {
        Conf::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Conf> {
        let var = |key: &str, default: &str| -> String {
            match lookup(key).filter(|it| !it.trim().is_empty()) {
                Some(value) => value.trim().to_string(),
                None => {
                    if !default.is_empty() {
                        info!(key, default, "Variable is not set, using default");
                    }
                    default.to_string()
                }
            }
        };
        let campaign_api_url = var("CAMPAIGN_API_URL", "")
            .trim_end_matches('/')
            .to_string();
        let default_list_url = if campaign_api_url.is_empty() {
            String::new()
        } else {
            format!("{campaign_api_url}/campaigns")
        };
        let fetch_timeout_sec = var("REPORT_FETCH_TIMEOUT_SEC", "30");
        let max_json_bytes = var("REPORT_MAX_JSON_BYTES", "1048576");
        let max_image_bytes = var("REPORT_MAX_IMAGE_BYTES", "20971520");
        Ok(Conf {
            bind_addr: var("REPORT_BIND_ADDR", "127.0.0.1:8000"),
            campaign_list_url: var("CAMPAIGN_LIST_URL", &default_list_url),
            campaign_api_url,
            campaign_api_token: lookup("CAMPAIGN_API_TOKEN").filter(|it| !it.is_empty()),
            fetch_timeout: Duration::from_secs(fetch_timeout_sec.parse().map_err(|_| {
                Error::InvalidInput(format!(
                    "REPORT_FETCH_TIMEOUT_SEC must be a number of seconds, got {fetch_timeout_sec}"
                ))
            })?),
            user_agent: var(
                "REPORT_USER_AGENT",
                concat!("campaign-report/", env!("CARGO_PKG_VERSION")),
            ),
            utc_offset: parse_utc_offset(&var("REPORT_UTC_OFFSET", "+00:00"))?,
            max_json_bytes: max_json_bytes.parse().map_err(|_| {
                Error::InvalidInput(format!(
                    "REPORT_MAX_JSON_BYTES must be a number of bytes, got {max_json_bytes}"
                ))
            })?,
            max_image_bytes: max_image_bytes.parse().map_err(|_| {
                Error::InvalidInput(format!(
                    "REPORT_MAX_IMAGE_BYTES must be a number of bytes, got {max_image_bytes}"
                ))
            })?,
        })
    }

    pub fn require_campaign_api(&self) -> Result<&str> {
        if self.campaign_api_url.is_empty() {
            return Err(Error::InvalidInput(
                "CAMPAIGN_API_URL is required for this command".into(),
            ));
        }
        Ok(&self.campaign_api_url)
    }

    #[cfg(test)]
    pub fn mock() -> Conf {
        Conf::from_lookup(|_| None).unwrap()
    }
}

fn parse_utc_offset(value: &str) -> Result<UtcOffset> {
    UtcOffset::parse(
        value,
        format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
    )
    .map_err(|_| {
        Error::InvalidInput(format!(
            "REPORT_UTC_OFFSET must look like +05:00, got {value}"
        ))
    })
}
