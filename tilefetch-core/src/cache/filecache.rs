//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::cache::cache::Cache;
use crate::core::config::CacheFileCfg;
use crate::core::Config;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Tile cache directory with `{z}/{x}/{y}.{extension}` layout
#[derive(Clone, Debug)]
pub struct Filecache {
    pub basepath: String,
    pub extension: String,
    /// Files smaller than `min_size` bytes count as missing
    pub min_size: u64,
}

impl Filecache {
    pub fn new(basepath: &str) -> Filecache {
        Filecache {
            basepath: basepath.to_string(),
            extension: "png".to_string(),
            min_size: 0,
        }
    }
    pub fn full_path(&self, path: &str) -> PathBuf {
        Path::new(&self.basepath).join(path)
    }
}

impl Cache for Filecache {
    fn info(&self) -> String {
        format!("Tile cache directory: {}", self.basepath)
    }
    fn tile_path(&self, zoom: u8, xtile: u32, ytile: u32) -> String {
        format!("{}/{}/{}.{}", zoom, xtile, ytile, self.extension)
    }
    fn write(&self, path: &str, obj: &[u8]) -> Result<(), io::Error> {
        let fullpath = self.full_path(path);
        debug!("Filecache.write {}", fullpath.display());
        if let Some(dir) = fullpath.parent() {
            fs::create_dir_all(dir)?;
        }
        // Tile becomes visible only after a complete write
        let mut tmppath = fullpath.clone().into_os_string();
        tmppath.push(".tmp");
        let mut f = File::create(&tmppath)?;
        f.write_all(obj)?;
        f.sync_all()?;
        fs::rename(&tmppath, &fullpath)
    }
    fn exists(&self, path: &str) -> bool {
        match fs::metadata(self.full_path(path)) {
            Ok(meta) => meta.is_file() && meta.len() >= self.min_size,
            Err(_) => false,
        }
    }
}

impl<'a> Config<'a, CacheFileCfg> for Filecache {
    fn from_config(cfg: &CacheFileCfg) -> Result<Self, String> {
        if cfg.base.is_empty() {
            return Err("Missing configuration entry base in [cache.file]".to_string());
        }
        let extension = cfg.extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err("Invalid tile extension in [cache.file]".to_string());
        }
        Ok(Filecache {
            basepath: cfg.base.clone(),
            extension: extension.to_string(),
            min_size: cfg.min_size,
        })
    }
    fn gen_config() -> String {
        let toml = r#"
[cache.file]
base = "tiles"
#extension = "png"
# Treat smaller files as missing (Default: 0, any existing file is a cache hit)
#min_size = 0
"#;
        toml.to_string()
    }
}
