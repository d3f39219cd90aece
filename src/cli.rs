//! Command-line argument parsing
//!
//! Flags override `config.yaml`, which overrides built-in defaults.

use clap::Parser;

use crate::ajax::QueryParam;
use crate::config::LiveGridConfig;
use crate::grid::OutputFormat;
use crate::model::{live_grid::request_name, GridId, GridOptions};

/// Scroll through a server-backed table from the terminal
#[derive(Parser, Debug)]
#[command(name = "livegrid", version, about = "Scroll a server-backed table")]
pub struct CliArgs {
    /// Row data endpoint (absolute, or relative to --base-url)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Base for relative request URLs
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Grid id, sent as `id=` and used to name the grid's request
    #[arg(long, default_value = "grid")]
    pub grid_id: String,

    /// Rows on the visible page
    #[arg(long, value_name = "N")]
    pub page_size: Option<usize>,

    /// Rows in the whole dataset
    #[arg(long, value_name = "N")]
    pub total_rows: usize,

    /// Height of the visible table in pixels
    #[arg(long, value_name = "PX")]
    pub visible_height: Option<f64>,

    /// Extra parameter sent with every fetch (repeatable)
    #[arg(long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Fetch a large window at offset 0 on startup
    #[arg(long)]
    pub prefetch: bool,

    /// Snap the scrollbar to whole rows
    #[arg(long)]
    pub snap: bool,

    /// Output format for rendered pages
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Configuration derived from CLI arguments and the config file
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub grid_id: GridId,
    pub options: GridOptions,
    pub base_url: Option<String>,
    pub http_timeout_ms: u64,
    pub format: OutputFormat,
    /// Additional named requests from the config file
    pub requests: Vec<(String, String)>,
}

impl CliArgs {
    /// Merge parsed CLI args over the loaded configuration
    pub fn into_config(self, config: &LiveGridConfig) -> Result<StartupConfig, String> {
        let grid_id = GridId::new(self.grid_id);

        let page_size = self.page_size.unwrap_or(config.grid.page_size);
        if page_size == 0 {
            return Err("Page size must be at least 1".to_string());
        }

        let url = self
            .url
            .or_else(|| config.requests.get(&request_name(&grid_id)).cloned())
            .ok_or_else(|| {
                format!(
                    "No row endpoint: pass --url or set requests.{} in config.yaml",
                    request_name(&grid_id)
                )
            })?;

        let request_params = self
            .params
            .iter()
            .map(|p| p.parse::<QueryParam>())
            .collect::<Result<Vec<_>, _>>()?;

        let visible_height = self
            .visible_height
            .or(config.grid.visible_height)
            .unwrap_or(page_size as f64 * 20.0);
        if visible_height <= 0.0 {
            return Err("Visible height must be positive".to_string());
        }

        let mut options = GridOptions::new(url, page_size, self.total_rows);
        options.ratios = config.grid.ratios;
        options.prefetch_buffer = self.prefetch || config.grid.prefetch_buffer;
        options.snap_to_rows = self.snap || config.grid.snap_to_rows;
        options.request_params = request_params;
        options.fetch_timeout_ms = config.timing.fetch_timeout_ms;
        options.scroll_idle_ms = config.timing.scroll_idle_ms;
        options.visible_height = visible_height;

        Ok(StartupConfig {
            grid_id,
            options,
            base_url: self.base_url.or_else(|| config.base_url.clone()),
            http_timeout_ms: config.http.timeout_ms,
            format: self.format.unwrap_or(config.format),
            requests: config
                .requests
                .iter()
                .map(|(name, url)| (name.clone(), url.clone()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CliArgs {
        CliArgs::parse_from(["livegrid", "--url", "/rows", "--total-rows", "500"])
    }

    #[test]
    fn test_defaults() {
        let config = args().into_config(&LiveGridConfig::default()).unwrap();
        assert_eq!(config.grid_id.as_str(), "grid");
        assert_eq!(config.options.page_size, 20);
        assert_eq!(config.options.total_rows, 500);
        assert_eq!(config.options.visible_height, 400.0);
        assert_eq!(config.options.fetch_timeout_ms, 4000);
        assert_eq!(config.format, OutputFormat::Table);
        assert!(!config.options.prefetch_buffer);
    }

    #[test]
    fn test_flags_override_config() {
        let mut file = LiveGridConfig::default();
        file.grid.page_size = 50;
        file.format = OutputFormat::Json;
        file.base_url = Some("http://config/".into());

        let args = CliArgs::parse_from([
            "livegrid",
            "--url",
            "/rows",
            "--total-rows",
            "10",
            "--page-size",
            "10",
            "--format",
            "table",
            "--base-url",
            "http://flag/",
        ]);
        let config = args.into_config(&file).unwrap();
        assert_eq!(config.options.page_size, 10);
        assert_eq!(config.format, OutputFormat::Table);
        assert_eq!(config.base_url.as_deref(), Some("http://flag/"));
    }

    #[test]
    fn test_url_from_config_requests() {
        let mut file = LiveGridConfig::default();
        file.requests
            .insert("orders_request".into(), "/orders/rows".into());
        let args = CliArgs::parse_from(["livegrid", "--grid-id", "orders", "--total-rows", "1"]);
        let config = args.into_config(&file).unwrap();
        assert_eq!(config.options.url, "/orders/rows");
        assert_eq!(config.requests.len(), 1);
    }

    #[test]
    fn test_missing_url_is_an_error() {
        let args = CliArgs::parse_from(["livegrid", "--total-rows", "1"]);
        let err = args.into_config(&LiveGridConfig::default()).unwrap_err();
        assert!(err.contains("grid_request"));
    }

    #[test]
    fn test_params_keep_order() {
        let args = CliArgs::parse_from([
            "livegrid",
            "--url",
            "/rows",
            "--total-rows",
            "1",
            "--param",
            "sort=name",
            "--param",
            "q=a=b",
        ]);
        let config = args.into_config(&LiveGridConfig::default()).unwrap();
        let params: Vec<String> = config
            .options
            .request_params
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(params, ["sort=name", "q=a=b"]);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let args = CliArgs::parse_from([
            "livegrid",
            "--url",
            "/rows",
            "--total-rows",
            "1",
            "--page-size",
            "0",
        ]);
        assert!(args.into_config(&LiveGridConfig::default()).is_err());
    }
}
