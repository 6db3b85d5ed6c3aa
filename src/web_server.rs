use crate::{
  config::Config,
  prelude::*,
  request::{ChartRequest, Greeting},
};
use actix_web::{
  http::StatusCode, middleware, web, App, HttpResponse, HttpServer, ResponseError,
};
use image::RgbImage;
use std::{io, sync::Arc};

pub struct AppState {
  pub config: Config,
  pub renderer: Arc<dyn Renderer>,
}

impl ResponseError for ChartError {
  fn status_code(&self) -> StatusCode { StatusCode::UNPROCESSABLE_ENTITY }
}

async fn paint<P, F>(
  state: web::Data<AppState>,
  req: ChartRequest<P>,
  draw: F,
) -> actix_web::Result<HttpResponse>
where
  P: Send + 'static,
  F: FnOnce(&ChartPainter, &ChartRequest<P>) -> Result<RgbImage> + Send + 'static,
{
  let kind = req.options.image_format;
  let bytes = web::block(move || -> Result<Vec<u8>> {
    let painter = ChartPainter::new(state.renderer.as_ref(), &state.config.chart);
    encode(&draw(&painter, &req)?, kind)
  })
  .await??;
  Ok(HttpResponse::Ok().content_type(kind.content_type()).body(bytes))
}

async fn candlestick(
  state: web::Data<AppState>,
  req: web::Json<ChartRequest<OhlcPoint>>,
) -> actix_web::Result<HttpResponse> {
  paint(state, req.into_inner(), |painter, req| {
    painter.paint_candlestick(&req.datas, &req.token_info, &req.options)
  })
  .await
}

async fn chart(
  state: web::Data<AppState>,
  req: web::Json<ChartRequest<SingleValuePoint>>,
) -> actix_web::Result<HttpResponse> {
  paint(state, req.into_inner(), |painter, req| {
    painter.paint_line_chart(&req.datas, &req.token_info, &req.options)
  })
  .await
}

async fn greet(msg: web::Json<Greeting>) -> HttpResponse {
  info!("greeted with {:?}", msg.message);
  HttpResponse::Ok().json(msg.into_inner())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/candlestick", web::post().to(candlestick))
    .route("/chart", web::post().to(chart))
    .route("/greet", web::post().to(greet));
}

#[actix_web::main]
pub async fn run(config: Config, renderer: Arc<dyn Renderer>) -> io::Result<()> {
  let server = config.server.clone();
  let limit = server.max_payload_bytes;
  let state = web::Data::new(AppState { config, renderer });
  info!("listening on {}:{}", server.host, server.port);

  HttpServer::new(move || {
    App::new()
      .app_data(state.clone())
      .app_data(web::JsonConfig::default().limit(limit))
      .wrap(middleware::Logger::default())
      .configure(routes)
  })
  .workers(server.workers)
  .bind((server.host.as_str(), server.port))?
  .run()
  .await
}
