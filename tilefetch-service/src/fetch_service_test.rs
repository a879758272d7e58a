//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::error::FetchError;
use crate::fetch_service::{FetchService, GenerateSummary, SourceFailure, TileOutcome};
use crate::http::{HttpClient, ReqwestClient};
use crate::sources::TileSource;
use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use tile_grid::{zoom_limits, Extent};
use tilefetch_core::cache::Filecache;
use tilefetch_core::core::config::DEFAULT_CONFIG;
use tilefetch_core::core::stats::Statistics;
use tilefetch_core::core::{parse_config, ApplicationCfg, Config};

/// Tile server stub answering requests with URLs starting with one of `online`
struct MockClient {
    online: Vec<&'static str>,
    requests: RefCell<Vec<String>>,
}

impl MockClient {
    fn new(online: Vec<&'static str>) -> Rc<MockClient> {
        Rc::new(MockClient {
            online,
            requests: RefCell::new(Vec::new()),
        })
    }
    fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl HttpClient for Rc<MockClient> {
    fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        if self.online.iter().any(|prefix| url.starts_with(prefix)) {
            Ok(format!("tile {}", url).into_bytes())
        } else if url.starts_with("http://primary/") {
            Err(FetchError::Status(503))
        } else {
            Err(FetchError::Transport("connection refused".to_string()))
        }
    }
}

fn sources() -> Vec<TileSource> {
    let primary = TileSource::new("primary", "http://primary/{z}/{x}/{y}.png");
    let mut fallback = TileSource::new("fallback", "http://{s}.mirror/{z}/{x}/{y}.png");
    fallback.subdomains = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    vec![primary, fallback]
}

fn service(client: &Rc<MockClient>, basepath: &str) -> FetchService<Rc<MockClient>> {
    FetchService::new(
        client.clone(),
        sources(),
        Filecache::new(basepath),
        vec![10, 11],
    )
}

fn zurich() -> Extent {
    Extent {
        minx: 8.53,
        miny: 47.36,
        maxx: 8.55,
        maxy: 47.38,
    }
}

#[test]
fn test_fetch_primary() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new(vec!["http://primary/"]);
    let service = service(&client, dir.path().to_str().unwrap());

    let outcome = service.fetch_tile(17, 100, 200, None);
    let body = b"tile http://primary/17/100/200.png";
    assert_eq!(
        outcome,
        TileOutcome::Fetched {
            source: "primary".to_string(),
            bytes: body.len(),
        }
    );
    assert_eq!(client.requests(), vec!["http://primary/17/100/200.png"]);
    assert_eq!(
        fs::read(dir.path().join("17/100/200.png")).unwrap(),
        body.to_vec()
    );

    // Cache hit without request
    assert_eq!(service.fetch_tile(17, 100, 200, None), TileOutcome::Cached);
    assert_eq!(client.requests().len(), 1);
}

#[test]
fn test_fetch_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new(vec!["http://b.mirror/"]);
    let service = service(&client, dir.path().to_str().unwrap());

    // 100 mod 3 = 1 -> mirror b
    let outcome = service.fetch_tile(17, 100, 200, None);
    assert_eq!(
        outcome,
        TileOutcome::Fetched {
            source: "fallback".to_string(),
            bytes: "tile http://b.mirror/17/100/200.png".len(),
        }
    );
    assert_eq!(
        client.requests(),
        vec![
            "http://primary/17/100/200.png",
            "http://b.mirror/17/100/200.png"
        ]
    );
    assert!(dir.path().join("17/100/200.png").exists());
}

#[test]
fn test_fetch_failure() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new(vec![]);
    let service = service(&client, dir.path().to_str().unwrap());

    let outcome = service.fetch_tile(18, 50, 60, None);
    assert_eq!(
        outcome,
        TileOutcome::Failed {
            attempts: vec![
                SourceFailure {
                    source: "primary".to_string(),
                    url: "http://primary/18/50/60.png".to_string(),
                    error: FetchError::Status(503),
                },
                SourceFailure {
                    source: "fallback".to_string(),
                    url: "http://c.mirror/18/50/60.png".to_string(),
                    error: FetchError::Transport("connection refused".to_string()),
                },
            ]
        }
    );
    assert!(!dir.path().join("18/50/60.png").exists());
    assert!(!dir.path().join("18/50/60.png.tmp").exists());

    // Failed tiles are requested again on the next attempt
    service.fetch_tile(18, 50, 60, None);
    assert_eq!(client.requests().len(), 4);
}

#[test]
fn test_generate_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new(vec!["http://primary/"]);
    let service = service(&client, dir.path().to_str().unwrap());
    let extent = zurich();
    let expected: u64 = zoom_limits(&extent, &[10, 11])
        .iter()
        .map(|(_, limit)| limit.num_tiles())
        .sum();
    assert!(expected > 0);

    let mut stats = Statistics::new();
    let summary = service.generate(&extent, Some(&mut stats));
    assert_eq!(
        summary,
        GenerateSummary {
            cached: 0,
            fetched: expected,
            failed: 0,
        }
    );
    assert_eq!(client.requests().len() as u64, expected);
    assert!(stats.summary("tile_bytes.primary.10").count > 0);

    // Second run is served completely from the cache
    let summary = service.generate(&extent, None);
    assert_eq!(summary.cached, expected);
    assert_eq!(summary.total(), expected);
    assert_eq!(client.requests().len() as u64, expected);
}

#[test]
fn test_generate_resume_and_failures() {
    let dir = tempfile::tempdir().unwrap();
    let client = MockClient::new(vec![]);
    let service = service(&client, dir.path().to_str().unwrap());
    let extent = zurich();
    let limits = zoom_limits(&extent, &[10, 11]);
    let expected: u64 = limits.iter().map(|(_, limit)| limit.num_tiles()).sum();

    // Tile written by an interrupted earlier run
    let (zoom, limit) = &limits[0];
    let path = dir
        .path()
        .join(format!("{}/{}/{}.png", zoom, limit.minx, limit.miny));
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"previous run").unwrap();

    // All sources offline: every other tile fails, the run completes
    let summary = service.generate(&extent, None);
    assert_eq!(summary.cached, 1);
    assert_eq!(summary.failed, expected - 1);
    assert_eq!(summary.fetched, 0);
    assert_eq!(client.requests().len() as u64, (expected - 1) * 2);
    assert_eq!(fs::read(&path).unwrap(), b"previous run".to_vec());
}

#[test]
fn test_service_from_config() {
    let config: ApplicationCfg = parse_config(DEFAULT_CONFIG.to_string(), "").unwrap();
    let service = FetchService::<ReqwestClient>::from_config(&config).unwrap();
    assert_eq!(service.zoomlevels, vec![17, 18]);
    assert_eq!(service.sources.len(), 2);
    assert_eq!(
        service.sources[1].tile_url(17, 68641, 45908),
        "https://b.tile.openstreetmap.fr/hot/17/68641/45908.png"
    );
    assert_eq!(service.cache.basepath, "tiles");
    assert!(!service.progress);

    let toml = r#"
        [fetch]
        zoomlevels = [31]
        [[source]]
        name = "osm"
        url = "https://tile.openstreetmap.org/{z}/{x}/{y}.png"
        [cache.file]
        base = "tiles"
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(
        FetchService::<ReqwestClient>::from_config(&config).err(),
        Some("Invalid zoom level 31 (maximum 30)".to_string())
    );

    let toml = r#"
        [fetch]
        [cache.file]
        base = "tiles"
        "#;
    let config: ApplicationCfg = parse_config(toml.to_string(), "").unwrap();
    assert_eq!(
        FetchService::<ReqwestClient>::from_config(&config).err(),
        Some("No tile source configured".to_string())
    );
}

#[test]
fn test_gen_config() {
    let toml = FetchService::<ReqwestClient>::gen_config();
    let config: ApplicationCfg = parse_config(toml, "").unwrap();
    assert_eq!(config.fetch.zoomlevels, vec![17, 18]);
    assert_eq!(config.sources.len(), 2);
    assert_eq!(config.cache.file.base, "tiles");
    assert_eq!(config.manifest.path, "tile_urls.txt");
}
