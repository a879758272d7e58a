//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::cache::cache::Cache;
use crate::cache::filecache::Filecache;
use crate::core::config::CacheFileCfg;
use crate::core::{parse_config, Config};
use std::fs;

#[test]
fn test_dircache() {
    let dir = tempfile::tempdir().unwrap();
    let basepath = dir.path().join("tiles");
    let cache = Filecache::new(basepath.to_str().unwrap());

    let path = cache.tile_path(17, 100, 200);
    assert_eq!(path, "17/100/200.png");
    let fullpath = basepath.join("17").join("100").join("200.png");
    let obj = "0123456789";

    // Cache miss
    assert!(!cache.exists(&path));

    // Write into cache, directories are created on demand
    cache.write(&path, obj.as_bytes()).unwrap();
    assert!(fullpath.exists());
    assert!(!basepath.join("17/100/200.png.tmp").exists());

    // Cache hit
    assert!(cache.exists(&path));
    assert_eq!(fs::read_to_string(&fullpath).unwrap(), "0123456789");

    // Overwrite replaces the whole tile
    cache.write(&path, b"abc").unwrap();
    assert_eq!(fs::read_to_string(&fullpath).unwrap(), "abc");
}

#[test]
fn test_empty_file_is_hit() {
    let dir = tempfile::tempdir().unwrap();
    let mut cache = Filecache::new(dir.path().to_str().unwrap());
    let path = cache.tile_path(18, 50, 60);
    fs::create_dir_all(dir.path().join("18/50")).unwrap();
    fs::write(dir.path().join("18/50/60.png"), b"").unwrap();
    assert!(cache.exists(&path));

    // unless a minimum size is required
    cache.min_size = 1;
    assert!(!cache.exists(&path));

    // a directory is never a tile
    assert!(!cache.exists("18/50"));
}

#[test]
fn test_cache_from_config() {
    let toml = r#"
        base = "/tmp/tiles"
        extension = ".jpg"
        min_size = 64
        "#;
    let cfg: CacheFileCfg = parse_config(toml.to_string(), "").unwrap();
    let cache = Filecache::from_config(&cfg).unwrap();
    assert_eq!(cache.basepath, "/tmp/tiles");
    assert_eq!(cache.extension, "jpg");
    assert_eq!(cache.min_size, 64);
    assert_eq!(cache.tile_path(3, 1, 2), "3/1/2.jpg");
    assert_eq!(cache.info(), "Tile cache directory: /tmp/tiles");

    let cfg: CacheFileCfg = parse_config("base = \"\"".to_string(), "").unwrap();
    assert_eq!(
        Filecache::from_config(&cfg).err(),
        Some("Missing configuration entry base in [cache.file]".to_string())
    );
}
