//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Candidate tile servers

use tilefetch_core::core::config::SourceCfg;
use tilefetch_core::core::Config;

/// XYZ tile server URL template
#[derive(Clone, Debug, PartialEq)]
pub struct TileSource {
    pub name: String,
    /// Template with `{z}`, `{x}`, `{y}` and optional `{s}` placeholders
    pub url: String,
    /// Mirror subdomains substituted for `{s}`
    pub subdomains: Vec<String>,
}

impl TileSource {
    pub fn new(name: &str, url: &str) -> TileSource {
        TileSource {
            name: name.to_string(),
            url: url.to_string(),
            subdomains: Vec::new(),
        }
    }
    /// Mirror subdomain for column `xtile`
    pub fn subdomain(&self, xtile: u32) -> Option<&str> {
        if self.subdomains.is_empty() {
            None
        } else {
            let idx = xtile as usize % self.subdomains.len();
            Some(&self.subdomains[idx])
        }
    }
    /// Request URL of tile `z/x/y`
    pub fn tile_url(&self, zoom: u8, xtile: u32, ytile: u32) -> String {
        let url = self
            .url
            .replace("{z}", &zoom.to_string())
            .replace("{x}", &xtile.to_string())
            .replace("{y}", &ytile.to_string());
        match self.subdomain(xtile) {
            Some(s) => url.replace("{s}", s),
            None => url,
        }
    }
}

impl<'a> Config<'a, SourceCfg> for TileSource {
    fn from_config(cfg: &SourceCfg) -> Result<Self, String> {
        for placeholder in &["{z}", "{x}", "{y}"] {
            if !cfg.url.contains(placeholder) {
                return Err(format!(
                    "Source '{}': URL template without {}",
                    cfg.name, placeholder
                ));
            }
        }
        if cfg.url.contains("{s}") && cfg.subdomains.is_empty() {
            return Err(format!(
                "Source '{}': URL template with {{s}} requires subdomains",
                cfg.name
            ));
        }
        Ok(TileSource {
            name: cfg.name.clone(),
            url: cfg.url.clone(),
            subdomains: cfg.subdomains.clone(),
        })
    }
    fn gen_config() -> String {
        let toml = r#"
# Candidate tile servers, tried in order until one succeeds
[[source]]
name = "osm"
url = "https://tile.openstreetmap.org/{z}/{x}/{y}.png"

[[source]]
name = "osmfr-hot"
url = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png"
subdomains = ["a", "b", "c"]
"#;
        toml.to_string()
    }
}

#[cfg(test)]
fn source_from_config(toml: &str) -> Result<TileSource, String> {
    use tilefetch_core::core::parse_config;

    let config: SourceCfg = parse_config(toml.to_string(), "")?;
    TileSource::from_config(&config)
}

#[test]
fn test_tile_url() {
    let osm = TileSource::new("osm", "https://tile.openstreetmap.org/{z}/{x}/{y}.png");
    assert_eq!(
        osm.tile_url(17, 68641, 45908),
        "https://tile.openstreetmap.org/17/68641/45908.png"
    );
    assert_eq!(osm.subdomain(5), None);

    let hot = source_from_config(
        r#"
        name = "osmfr-hot"
        url = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png"
        subdomains = ["a", "b", "c"]
        "#,
    )
    .unwrap();
    // mirror chosen by x mod 3
    assert_eq!(
        hot.tile_url(18, 137283, 91817),
        "https://a.tile.openstreetmap.fr/hot/18/137283/91817.png"
    );
    assert_eq!(
        hot.tile_url(18, 137284, 91817),
        "https://b.tile.openstreetmap.fr/hot/18/137284/91817.png"
    );
    assert_eq!(
        hot.tile_url(18, 137285, 91817),
        "https://c.tile.openstreetmap.fr/hot/18/137285/91817.png"
    );
}

#[test]
fn test_source_config_errors() {
    assert_eq!(
        source_from_config(
            r#"
            name = "broken"
            url = "https://tile.example.org/{z}/{x}.png"
            "#
        )
        .err(),
        Some("Source 'broken': URL template without {y}".to_string())
    );
    assert_eq!(
        source_from_config(
            r#"
            name = "mirrors"
            url = "https://{s}.tile.example.org/{z}/{x}/{y}.png"
            "#
        )
        .err(),
        Some("Source 'mirrors': URL template with {s} requires subdomains".to_string())
    );
}
