//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::error::FetchError;
use crate::http::{HttpClient, ReqwestClient};
use crate::manifest::Manifest;
use crate::sources::TileSource;
use pbr::ProgressBar;
use std::io::Stdout;
use std::time::{Duration, Instant};
use tile_grid::{zoom_limits, Extent, ExtentInt, GridIterator, MAX_ZOOM};
use tilefetch_core::cache::{Cache, Filecache};
use tilefetch_core::core::stats::Statistics;
use tilefetch_core::core::{ApplicationCfg, Config};

/// Failed request to one candidate source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFailure {
    pub source: String,
    pub url: String,
    pub error: FetchError,
}

/// Result of processing a single tile
#[derive(Debug, Clone, PartialEq)]
pub enum TileOutcome {
    /// Tile file exists, no request made
    Cached,
    /// Tile downloaded and written to the cache
    Fetched { source: String, bytes: usize },
    /// All candidate sources failed, nothing written
    Failed { attempts: Vec<SourceFailure> },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenerateSummary {
    pub cached: u64,
    pub fetched: u64,
    pub failed: u64,
}

impl GenerateSummary {
    fn add(&mut self, outcome: &TileOutcome) {
        match outcome {
            TileOutcome::Cached => self.cached += 1,
            TileOutcome::Fetched { .. } => self.fetched += 1,
            TileOutcome::Failed { .. } => self.failed += 1,
        }
    }
    pub fn total(&self) -> u64 {
        self.cached + self.fetched + self.failed
    }
}

/// Raster tile fetcher seeding a local tile cache
pub struct FetchService<H: HttpClient = ReqwestClient> {
    pub sources: Vec<TileSource>,
    pub cache: Filecache,
    pub zoomlevels: Vec<u8>,
    pub progress: bool,
    client: H,
}

impl<H: HttpClient> FetchService<H> {
    pub fn new(
        client: H,
        sources: Vec<TileSource>,
        cache: Filecache,
        zoomlevels: Vec<u8>,
    ) -> FetchService<H> {
        FetchService {
            sources,
            cache,
            zoomlevels,
            progress: false,
            client,
        }
    }
    /// Try all sources in order and return the first tile body
    fn request_tile(
        &self,
        zoom: u8,
        xtile: u32,
        ytile: u32,
        mut stats: Option<&mut Statistics>,
    ) -> Result<(&TileSource, String, Vec<u8>), Vec<SourceFailure>> {
        let mut attempts = Vec::with_capacity(self.sources.len());
        for source in &self.sources {
            let url = source.tile_url(zoom, xtile, ytile);
            let now = Instant::now();
            match self.client.get(&url) {
                Ok(data) => {
                    if let Some(ref mut stats) = stats {
                        stats.add(
                            &format!("fetch_ms.{}.{}", source.name, zoom),
                            now.elapsed().as_millis() as u64,
                        );
                        stats.add(
                            &format!("tile_bytes.{}.{}", source.name, zoom),
                            data.len() as u64,
                        );
                    }
                    return Ok((source, url, data));
                }
                Err(error) => {
                    debug!("{} - {}", url, error);
                    attempts.push(SourceFailure {
                        source: source.name.clone(),
                        url,
                        error,
                    });
                }
            }
        }
        Err(attempts)
    }
    /// Fetch tile at z/x/y unless it is already cached
    pub fn fetch_tile(
        &self,
        zoom: u8,
        xtile: u32,
        ytile: u32,
        stats: Option<&mut Statistics>,
    ) -> TileOutcome {
        let path = self.cache.tile_path(zoom, xtile, ytile);
        if self.cache.exists(&path) {
            debug!("{} - cached", path);
            return TileOutcome::Cached;
        }
        match self.request_tile(zoom, xtile, ytile, stats) {
            Ok((source, url, data)) => {
                if let Err(ioerr) = self.cache.write(&path, &data) {
                    error!("Error writing {}: {}", path, ioerr);
                    return TileOutcome::Failed {
                        attempts: vec![SourceFailure {
                            source: source.name.clone(),
                            url,
                            error: FetchError::Cache(ioerr.to_string()),
                        }],
                    };
                }
                info!("Saved: {} from {}", path, url);
                TileOutcome::Fetched {
                    source: source.name.clone(),
                    bytes: data.len(),
                }
            }
            Err(attempts) => {
                warn!("Failed to fetch tile {}/{}/{}", zoom, xtile, ytile);
                TileOutcome::Failed { attempts }
            }
        }
    }
    fn progress_bar(&self, msg: &str, limits: &ExtentInt) -> ProgressBar<Stdout> {
        let mut pb = ProgressBar::new(limits.num_tiles());
        pb.message(msg);
        pb.show_speed = false;
        pb.show_percent = false;
        pb.show_time_left = false;
        pb
    }
    /// Seed tile cache for all zoom levels covering `extent`
    pub fn generate(
        &self,
        extent: &Extent,
        mut stats: Option<&mut Statistics>,
    ) -> GenerateSummary {
        info!("{}", &self.cache.info());
        let limits = zoom_limits(extent, &self.zoomlevels);
        for (zoom, limit) in &limits {
            info!(
                "Zoom {}: x {}→{}, y {}→{}",
                zoom, limit.minx, limit.maxx, limit.miny, limit.maxy
            );
        }
        let mut summary = GenerateSummary::default();
        let mut pb = ProgressBar::new(0);
        let mut pb_z = None;
        for (zoom, xtile, ytile) in GridIterator::new(limits.clone()) {
            if self.progress && pb_z != Some(zoom) {
                pb_z = Some(zoom);
                if let Some((_, limit)) = limits.iter().find(|(z, _)| *z == zoom) {
                    pb = self.progress_bar(&format!("Level {}: ", zoom), limit);
                    pb.tick();
                }
            }
            let outcome = self.fetch_tile(zoom, xtile, ytile, stats.as_deref_mut());
            summary.add(&outcome);
            if self.progress {
                pb.inc();
            }
        }
        if self.progress {
            println!();
        }
        info!(
            "{} tiles: {} fetched, {} cached, {} failed",
            summary.total(),
            summary.fetched,
            summary.cached,
            summary.failed
        );
        summary
    }
}

impl<'a> Config<'a, ApplicationCfg> for FetchService<ReqwestClient> {
    fn from_config(config: &ApplicationCfg) -> Result<Self, String> {
        let fetch = &config.fetch;
        if fetch.zoomlevels.is_empty() {
            return Err("No zoom levels configured".to_string());
        }
        if let Some(zoom) = fetch.zoomlevels.iter().find(|&&z| z > MAX_ZOOM) {
            return Err(format!(
                "Invalid zoom level {} (maximum {})",
                zoom, MAX_ZOOM
            ));
        }
        if config.sources.is_empty() {
            return Err("No tile source configured".to_string());
        }
        let sources = config
            .sources
            .iter()
            .map(TileSource::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        let cache = Filecache::from_config(&config.cache.file)?;
        let client =
            ReqwestClient::new(Duration::from_secs(fetch.timeout), &fetch.user_agent)?;
        let mut service = FetchService::new(client, sources, cache, fetch.zoomlevels.clone());
        service.progress = fetch.progress;
        Ok(service)
    }
    fn gen_config() -> String {
        let mut config = String::new();
        config.push_str(TOML_FETCH);
        config.push_str(&TileSource::gen_config());
        config.push_str(&Filecache::gen_config());
        config.push_str(&Manifest::gen_config());
        config
    }
}

const TOML_FETCH: &'static str = r#"# tilefetch configuration

[fetch]
zoomlevels = [17, 18]
# Request timeout in seconds
timeout = 10
#user_agent = "MyOfflineMapApp/1.0 (your.email@example.com)"
# Fetch tiles covering the total bounds of a GeoJSON file
bounds = "strata.geojson"
# or an explicit extent in decimal degrees
#extent = { minx = 8.53, miny = 47.36, maxx = 8.55, maxy = 47.38 }
#progress = false
"#;
