use crate::model::{Campaign, CampaignImage};
use crate::report::{pptx, ImageSource, ReportAssembler};
use crate::Error;
use actix_web::http::header::ContentDisposition;
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const SLIDES_HEADER: &str = "X-Report-Slides";

#[derive(Serialize, Deserialize)]
pub struct PostArgs {
    #[serde(default)]
    pub campaign: Option<Campaign>,
    #[serde(default)]
    pub images: Option<Vec<CampaignImage>>,
}

/// Registered as `POST /v1/reports`. Generic over the image source so tests can
/// serve images from memory.
pub async fn post<S: ImageSource + 'static>(
    args: Json<PostArgs>,
    assembler: Data<ReportAssembler<S>>,
) -> Result<HttpResponse, Error> {
    let artifact = assembler
        .assemble(args.campaign.as_ref(), args.images.as_deref(), |progress| {
            debug!(
                current = progress.current,
                total = progress.total,
                "Fetching image"
            )
        })
        .await?;
    Ok(HttpResponse::Ok()
        .content_type(pptx::CONTENT_TYPE)
        .insert_header(ContentDisposition::attachment(&artifact.file_name))
        .insert_header((SLIDES_HEADER, artifact.slide_count().to_string()))
        .body(artifact.bytes))
}

#[cfg(test)]
mod test {
    use super::{PostArgs, SLIDES_HEADER};
    use crate::error::json_error_handler;
    use crate::model::{Campaign, CampaignImage};
    use crate::report::picture::test::png;
    use crate::report::{pptx, ReportAssembler};
    use crate::test::{slide_parts, FakeImageSource};
    use crate::{ApiError, Result};
    use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;
    use actix_web::web::{self, scope, Data, JsonConfig};
    use actix_web::{test, App};
    use time::UtcOffset;

    fn source() -> FakeImageSource {
        FakeImageSource::default().with_image("https://cdn/1.png", "image/png", png(640, 480))
    }

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(Data::new(ReportAssembler::new(source(), UtcOffset::UTC)))
                    .app_data(JsonConfig::default().error_handler(json_error_handler))
                    .service(
                        scope("v1").service(
                            web::resource("reports")
                                .route(web::post().to(super::post::<FakeImageSource>)),
                        ),
                    ),
            )
            .await
        };
    }

    #[test]
    async fn post() -> Result<()> {
        let app = app!();
        let req = TestRequest::post()
            .uri("/v1/reports")
            .set_json(PostArgs {
                campaign: Some(Campaign::mock()),
                images: Some(vec![
                    CampaignImage::mock("https://cdn/1.png"),
                    CampaignImage::mock("https://cdn/2.png"),
                ]),
            })
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            pptx::CONTENT_TYPE,
            res.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap()
        );
        assert_eq!(
            r#"attachment; filename="eid_drive_report.pptx""#,
            res.headers().get(CONTENT_DISPOSITION).unwrap().to_str().unwrap()
        );
        assert_eq!("3", res.headers().get(SLIDES_HEADER).unwrap().to_str().unwrap());
        let body = test::read_body(res).await;
        assert_eq!(3, slide_parts(&body).len());
        Ok(())
    }

    #[test]
    async fn post_without_images() -> Result<()> {
        let app = app!();
        let req = TestRequest::post()
            .uri("/v1/reports")
            .set_json(PostArgs {
                campaign: Some(Campaign::mock()),
                images: Some(vec![]),
            })
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res: ApiError = test::read_body_json(res).await;
        assert_eq!(400, res.http_code);
        assert_eq!("No images available for this campaign", res.message);
        Ok(())
    }

    #[test]
    async fn post_without_campaign() -> Result<()> {
        let app = app!();
        let req = TestRequest::post()
            .uri("/v1/reports")
            .set_json(PostArgs {
                campaign: None,
                images: Some(vec![CampaignImage::mock("https://cdn/1.png")]),
            })
            .to_request();
        let res: ApiError = test::call_and_read_body_json(&app, req).await;
        assert_eq!(400, res.http_code);
        assert_eq!("Campaign or images data is missing", res.message);
        Ok(())
    }

    #[test]
    async fn post_malformed_json() -> Result<()> {
        let app = app!();
        let req = TestRequest::post()
            .uri("/v1/reports")
            .insert_header((CONTENT_TYPE, "application/json"))
            .set_payload("{\"campaign\": ")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res: ApiError = test::read_body_json(res).await;
        assert!(res.message.starts_with("Invalid request body"));
        Ok(())
    }
}
