//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Tile URL list of a cache directory

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tilefetch_core::core::{ApplicationCfg, Config};
use walkdir::WalkDir;

pub struct Manifest {
    /// Tile cache directory
    pub basepath: String,
    pub extension: String,
    pub url_prefix: String,
    /// Output file
    pub path: String,
}

/// URL prefix derived from the cache directory, e.g. `tiles` -> `/tiles`
pub fn default_url_prefix(basepath: &str) -> String {
    let base = basepath.replace('\\', "/");
    let base = base.trim_start_matches("./").trim_matches('/');
    if base.is_empty() || base == "." {
        "/".to_string()
    } else {
        format!("/{}", base)
    }
}

/// Manifest line for `url`, formatted as array literal element
pub fn manifest_entry(url: &str) -> String {
    format!("  '{}',", url)
}

impl Manifest {
    pub fn new(basepath: &str, extension: &str, path: &str) -> Manifest {
        Manifest {
            basepath: basepath.to_string(),
            extension: extension.to_string(),
            url_prefix: default_url_prefix(basepath),
            path: path.to_string(),
        }
    }
    pub(crate) fn tile_url(&self, relpath: &Path) -> String {
        // Windows paths use backslashes
        let relpath = relpath.to_string_lossy().replace('\\', "/");
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), relpath)
    }
    /// URLs of all tile files below the cache directory
    pub fn tile_urls(&self) -> Result<Vec<String>, io::Error> {
        let mut urls = Vec::new();
        let root = Path::new(&self.basepath);
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != self.extension.as_str()) {
                continue;
            }
            if let Ok(relpath) = path.strip_prefix(root) {
                urls.push(self.tile_url(relpath));
            }
        }
        Ok(urls)
    }
    /// Write URL list file, returns the number of entries
    pub fn write(&self) -> Result<usize, io::Error> {
        let urls = self.tile_urls()?;
        let mut out = BufWriter::new(File::create(&self.path)?);
        for url in &urls {
            writeln!(out, "{}", manifest_entry(url))?;
        }
        out.flush()?;
        info!("{} tile URLs written to {}", urls.len(), self.path);
        Ok(urls.len())
    }
}

impl<'a> Config<'a, ApplicationCfg> for Manifest {
    fn from_config(config: &ApplicationCfg) -> Result<Self, String> {
        let file_cfg = &config.cache.file;
        if file_cfg.base.is_empty() {
            return Err("Missing configuration entry base in [cache.file]".to_string());
        }
        let mut manifest = Manifest::new(
            &file_cfg.base,
            file_cfg.extension.trim_start_matches('.'),
            &config.manifest.path,
        );
        if let Some(ref prefix) = config.manifest.url_prefix {
            manifest.url_prefix = prefix.clone();
        }
        Ok(manifest)
    }
    fn gen_config() -> String {
        let toml = r#"
[manifest]
path = "tile_urls.txt"
# Prefix of listed tile URLs (Default: "/" + cache base)
#url_prefix = "/tiles"
"#;
        toml.to_string()
    }
}
