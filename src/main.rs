use graph_painter::{chart::PlottersRenderer, config::Config, web_server};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
  env_logger::Builder::from_env(
    env_logger::Env::default().default_filter_or("graph_painter=info,actix_web=info"),
  )
  .init();

  let config = Config::load()?;
  let renderer = PlottersRenderer::with_font(&config.font_path)?;
  web_server::run(config, Arc::new(renderer))?;
  Ok(())
}
