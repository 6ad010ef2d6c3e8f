use crate::conf::Conf;
use crate::error::json_error_handler;
use crate::report::{HttpImageSource, ReportAssembler};
use crate::rest;
use crate::Result;
use actix_web::dev::Service;
use actix_web::web::{self, scope};
use actix_web::{
    middleware::{Compress, NormalizePath},
    web::Data,
    App, HttpServer,
};
use futures_util::future::FutureExt;
use time::OffsetDateTime;
use tracing::info;

pub async fn run(conf: Conf) -> Result<()> {
    // one client for all requests, it keeps the connection pool
    let assembler = Data::new(ReportAssembler::new(
        HttpImageSource::new(&conf)?,
        conf.utc_offset,
    ));
    let max_json_bytes = conf.max_json_bytes;
    info!(bind_addr = conf.bind_addr, max_json_bytes, "Starting server");
    HttpServer::new(move || {
        App::new()
            .wrap_fn(|req, srv| {
                let req_method = req.method().as_str().to_string();
                let req_path = req.path().to_string();
                let req_version = format!("{:?}", req.version());
                let req_time = OffsetDateTime::now_utc();
                let req_ip = req
                    .connection_info()
                    .peer_addr()
                    .unwrap_or_default()
                    .to_string();
                let req_real_ip = req
                    .connection_info()
                    .realip_remote_addr()
                    .unwrap_or_default()
                    .to_string();
                srv.call(req).map(move |res| {
                    if let Ok(res) = res.as_ref() {
                        let res_status = res.status().as_u16();
                        let res_slides = res
                            .headers()
                            .get(rest::reports::SLIDES_HEADER)
                            .and_then(|it| it.to_str().ok())
                            .unwrap_or_default()
                            .to_string();
                        info!(
                            req_method,
                            req_path,
                            req_version,
                            req_ip,
                            req_real_ip,
                            res_status,
                            res_slides,
                            res_time_sec = (OffsetDateTime::now_utc() - req_time).as_seconds_f64(),
                        );
                    }

                    res
                })
            })
            .wrap(NormalizePath::trim())
            .wrap(Compress::default())
            .app_data(assembler.clone())
            .app_data(
                web::JsonConfig::default()
                    .limit(max_json_bytes)
                    .error_handler(json_error_handler),
            )
            .service(
                scope("v1").service(
                    web::resource("reports")
                        .route(web::post().to(rest::reports::post::<HttpImageSource>)),
                ),
            )
    })
    .bind(conf.bind_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
