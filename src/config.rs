use crate::prelude::*;
use anyhow::Context;
use std::{
  env, fs,
  path::{Path, PathBuf},
};

const CONF_FILE: &str = "config.json";
const CONF_ENV: &str = "GRAPH_PAINTER_CONFIG";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
  pub server: ServerConfig,
  pub chart: ChartConfig,
  /// TrueType font used for every label.
  pub font_path: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
  pub workers: usize,
  pub max_payload_bytes: usize,
}

/// Pixel sizes of the painted chart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
  pub width: u32,
  pub height: u32,
  pub banner_height: u32,
  pub border_width: u32,
  // pane heights relative to the whole plot
  pub volume_weight: f64,
  pub rsi_weight: f64,
  pub margin: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server: ServerConfig::default(),
      chart: ChartConfig::default(),
      font_path: "assets/DejaVuSans.ttf".into(),
    }
  }
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host: "0.0.0.0".into(),
      port: 50051,
      workers: num_cpus::get(),
      max_payload_bytes: 32 * 1024 * 1024,
    }
  }
}

impl Default for ChartConfig {
  fn default() -> Self {
    Self {
      width: 3200,
      height: 1800,
      banner_height: 100,
      border_width: 20,
      volume_weight: 0.2,
      rsi_weight: 0.2,
      margin: 30,
    }
  }
}

impl Config {
  /// Where the config lives: `$GRAPH_PAINTER_CONFIG`, else `config.json`.
  pub fn path() -> PathBuf {
    env::var_os(CONF_ENV)
      .map(PathBuf::from)
      .unwrap_or_else(|| CONF_FILE.into())
  }

  pub fn load() -> anyhow::Result<Self> { Self::load_from(&Self::path()) }

  pub fn load_from(path: &Path) -> anyhow::Result<Self> {
    write_default(path)?;
    let raw = fs::read_to_string(path)
      .with_context(|| format!("could not read config file {}", path.display()))?;
    let config = serde_json::from_str(&raw)
      .with_context(|| format!("could not parse config file {}", path.display()))?;
    Ok(config)
  }
}

fn write_default(path: &Path) -> anyhow::Result<()> {
  if path.exists() {
    return Ok(());
  }
  warn!("no config at {}, writing defaults", path.display());
  fs::write(path, serde_json::to_string_pretty(&Config::default())?)
    .with_context(|| format!("could not write default config {}", path.display()))?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scratch(name: &str) -> PathBuf {
    let file = format!("graph_painter_{}_{}.json", name, std::process::id());
    let path = env::temp_dir().join(file);
    let _ = fs::remove_file(&path);
    path
  }

  #[test]
  fn missing_file_is_written_with_defaults() -> anyhow::Result<()> {
    let path = scratch("defaults");
    let config = Config::load_from(&path)?;
    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(config.chart.width, 3200);
    assert_eq!(config.chart.banner_height, 100);
    fs::remove_file(&path)?;
    Ok(())
  }

  #[test]
  fn partial_file_keeps_other_defaults() -> anyhow::Result<()> {
    let path = scratch("partial");
    fs::write(&path, r#"{"server": {"port": 9000}, "chart": {"border_width": 5}}"#)?;
    let config = Config::load_from(&path)?;
    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.chart.border_width, 5);
    assert_eq!(config.chart.height, 1800);
    fs::remove_file(&path)?;
    Ok(())
  }

  #[test]
  fn garbage_is_an_error() -> anyhow::Result<()> {
    let path = scratch("garbage");
    fs::write(&path, "not json")?;
    assert!(Config::load_from(&path).is_err());
    fs::remove_file(&path)?;
    Ok(())
  }
}
