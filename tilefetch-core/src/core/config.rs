//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io::prelude::*;
use tera::{Context, Tera};
use tile_grid::Extent;
use toml::Value;

pub trait Config<'a, C: Deserialize<'a>>
where
    Self: std::marker::Sized,
{
    /// Read configuration
    fn from_config(config: &C) -> Result<Self, String>;
    /// Generate configuration template
    fn gen_config() -> String;
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationCfg {
    pub fetch: FetchCfg,
    #[serde(rename = "source", default)]
    pub sources: Vec<SourceCfg>,
    pub cache: CacheCfg,
    #[serde(default)]
    pub manifest: ManifestCfg,
}

#[derive(Deserialize, Clone, Debug)]
pub struct FetchCfg {
    /// Zoom levels to fetch
    #[serde(default = "default_zoomlevels")]
    pub zoomlevels: Vec<u8>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// User-Agent header sent with every tile request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// GeoJSON file whose total bounds define the extent
    pub bounds: Option<String>,
    /// Explicit extent in decimal degrees (takes precedence over `bounds`)
    pub extent: Option<ExtentCfg>,
    /// Show progress bar
    #[serde(default)]
    pub progress: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct SourceCfg {
    pub name: String,
    /// URL template with `{z}`, `{x}`, `{y}` and optional `{s}` placeholders
    pub url: String,
    /// Values for `{s}`, selected by `x mod subdomains.len()`
    #[serde(default)]
    pub subdomains: Vec<String>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CacheCfg {
    pub file: CacheFileCfg,
}

#[derive(Deserialize, Clone, Debug)]
pub struct CacheFileCfg {
    pub base: String,
    /// File extension of cached tiles
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Files smaller than this number of bytes are not considered cached
    #[serde(default)]
    pub min_size: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ManifestCfg {
    #[serde(default = "default_manifest_path")]
    pub path: String,
    /// Prefix of the listed URLs (Default: `/` + cache base)
    pub url_prefix: Option<String>,
}

impl Default for ManifestCfg {
    fn default() -> Self {
        ManifestCfg {
            path: default_manifest_path(),
            url_prefix: None,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExtentCfg {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl From<&ExtentCfg> for Extent {
    fn from(cfg: &ExtentCfg) -> Extent {
        Extent {
            minx: cfg.minx,
            miny: cfg.miny,
            maxx: cfg.maxx,
            maxy: cfg.maxy,
        }
    }
}

pub const DEFAULT_USER_AGENT: &str = concat!("tilefetch/", env!("CARGO_PKG_VERSION"));

pub fn default_zoomlevels() -> Vec<u8> {
    vec![17, 18]
}

pub fn default_timeout() -> u64 {
    10
}

pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

pub fn default_extension() -> String {
    "png".to_string()
}

pub fn default_manifest_path() -> String {
    "tile_urls.txt".to_string()
}

pub const DEFAULT_CONFIG: &'static str = r#"
[fetch]
zoomlevels = [17, 18]
timeout = 10
bounds = "strata.geojson"

[[source]]
name = "osm"
url = "https://tile.openstreetmap.org/{z}/{x}/{y}.png"

[[source]]
name = "osmfr-hot"
url = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png"
subdomains = ["a", "b", "c"]

[cache.file]
base = "tiles"

[manifest]
path = "tile_urls.txt"
"#;

/// Load and parse the config file into an config struct.
pub fn read_config<'a, T: Deserialize<'a>>(path: &str) -> Result<T, String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(_) => {
            return Err("Could not find config file!".to_string());
        }
    };
    let mut config_toml = String::new();
    if let Err(err) = file.read_to_string(&mut config_toml) {
        return Err(format!("Error while reading config: [{}]", err));
    };

    parse_config(config_toml, path)
}

/// Parse the configuration into an config struct.
pub fn parse_config<'a, T: Deserialize<'a>>(config_toml: String, path: &str) -> Result<T, String> {
    // Check for old ${var} expressions
    let re = Regex::new(r"\$\{([[:alnum:]]+)\}").map_err(|e| e.to_string())?;
    if re.is_match(&config_toml) {
        return Err(
            "Replace old environment variable syntax ${VARNAME} with `{{env.VARNAME}}`".to_string(),
        );
    }

    // Parse template
    let mut tera = Tera::default();
    tera.add_raw_template(path, &config_toml)
        .map_err(|e| format!("Template error: {}", e))?;
    let mut context = Context::new();
    let mut env = HashMap::new();
    for (key, value) in env::vars() {
        env.insert(key, value);
    }
    context.insert("env", &env);
    let toml = tera.render(path, &context).map_err(|e| match e.source() {
        Some(source) => format!("Template error: {}", source),
        None => format!("Template error: {}", e),
    })?;

    toml.parse::<Value>()
        .and_then(|cfg| cfg.try_into::<T>())
        .map_err(|err| format!("{} - {}", path, err))
}
