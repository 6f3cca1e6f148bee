/*
[INPUT]:  Serializable command results
[OUTPUT]: JSON or YAML text for stdout
[POS]:    CLI layer - result rendering
[UPDATE]: When adding output formats
*/

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

pub fn render<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("render JSON output"),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(|text| text.trim_end().to_string())
            .context("render YAML output"),
    }
}
