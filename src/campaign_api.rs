//! Client for the campaign management API: campaign lookup, image listing and
//! report delivery.

use crate::conf::Conf;
use crate::model::{Campaign, CampaignImage};
use crate::report::file_name::attachment_file_name;
use crate::report::{pptx, ReportArtifact};
use crate::{Error, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

pub struct CampaignApi {
    client: Client,
    api_url: String,
    list_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct ImagesEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Vec<CampaignImage>,
}

impl CampaignApi {
    pub fn new(conf: &Conf) -> Result<CampaignApi> {
        let api_url = conf.require_campaign_api()?.to_string();
        let client = Client::builder()
            .timeout(conf.fetch_timeout)
            .user_agent(conf.user_agent.clone())
            .build()?;
        Ok(CampaignApi {
            client,
            api_url,
            list_url: conf.campaign_list_url.clone(),
            token: conf.campaign_api_token.clone(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn campaign(&self, id: &str) -> Result<Campaign> {
        info!(id, url = self.list_url, "Fetching campaign");
        let response = self
            .authorized(self.client.get(&self.list_url))
            .send()
            .await?;
        let body: Value = check(response).await?.json().await?;
        find_campaign(body, id)
    }

    pub async fn campaign_images(&self, campaign_id: &str) -> Result<Vec<CampaignImage>> {
        let url = format!("{}/admin/campaign-images/{campaign_id}", self.api_url);
        info!(campaign_id, url, "Fetching campaign images");
        let response = self.authorized(self.client.get(&url)).send().await?;
        let envelope: ImagesEnvelope = check(response).await?.json().await?;
        if !envelope.success || envelope.data.is_empty() {
            return Err(Error::InvalidInput(
                "No images found for this campaign".into(),
            ));
        }
        Ok(envelope.data)
    }

    pub async fn send_report(&self, campaign: &Campaign, artifact: ReportArtifact) -> Result<()> {
        let client_email = campaign.client_email().ok_or_else(|| {
            Error::InvalidInput("Campaign has no client email".into())
        })?;
        let file_name = attachment_file_name(&campaign.name);
        info!(campaign = campaign.name, client_email, file_name, "Sending report");
        let file = Part::bytes(artifact.bytes)
            .file_name(file_name)
            .mime_str(pptx::CONTENT_TYPE)?;
        let form = Form::new()
            .part("file", file)
            .text("clientEmail", client_email.to_string())
            .text("campaignName", campaign.name.clone());
        let response = self
            .authorized(self.client.post(format!("{}/send-report", self.api_url)))
            .multipart(form)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }
}

async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(Error::CampaignApi(error_message(status, &body)))
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|it| it.get("message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Campaign API responded with {status}"))
}

/// The list comes either as a bare array or wrapped in `{"campaigns": [...]}`.
fn find_campaign(body: Value, id: &str) -> Result<Campaign> {
    let list = match body {
        Value::Array(list) => list,
        Value::Object(mut envelope) => match envelope.remove("campaigns") {
            Some(Value::Array(list)) => list,
            _ => return Err(Error::CampaignApi("Unexpected campaign list format".into())),
        },
        _ => return Err(Error::CampaignApi("Unexpected campaign list format".into())),
    };
    let campaign = list
        .into_iter()
        .find(|it| it.get("_id").and_then(Value::as_str) == Some(id))
        .ok_or_else(|| Error::NotFound(format!("Campaign {id} not found")))?;
    Ok(serde_json::from_value(campaign)?)
}

/// Pins every image to its resolved URL, drops the ones without any, and labels
/// boards the uploader only referenced by id.
pub fn normalize_images(
    campaign: &Campaign,
    images: Vec<CampaignImage>,
) -> Result<Vec<CampaignImage>> {
    let res: Vec<CampaignImage> = images
        .into_iter()
        .filter_map(|mut image| {
            let url = image.source_url()?.to_string();
            image.image_url = Some(url);
            if image.board_details().is_none() {
                let board = image
                    .board_id
                    .as_deref()
                    .and_then(|id| campaign.find_board(id));
                if let Some(board) = board {
                    image.board_details = Some(board.label());
                }
            }
            Some(image)
        })
        .collect();
    if res.is_empty() {
        return Err(Error::InvalidInput(
            "No valid images to generate report".into(),
        ));
    }
    Ok(res)
}
