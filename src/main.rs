//
// Copyright (c) tilefetch contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;

use clap::{App, AppSettings, ArgMatches, SubCommand};
use dotenv::dotenv;
use env_logger::Builder;
use log::Record;
use std::env;
use std::fmt::Display;
use std::io::Write;
use std::process;
use std::str::FromStr;
use tilefetch_core::core::config::{FetchCfg, DEFAULT_CONFIG};
use tilefetch_core::core::stats::Statistics;
use tilefetch_core::core::{parse_config, read_config, ApplicationCfg, Config};
use tilefetch_core::datasource::{parse_extent, ExtentSource, GeojsonSource, StaticExtent};
use tilefetch_service::http::ReqwestClient;
use tilefetch_service::{FetchService, Manifest};
use time;

fn init_logger(args: &ArgMatches<'_>) {
    let mut builder = Builder::new();
    builder.format(|buf, record: &Record<'_>| {
        let t = time::now();
        writeln!(
            buf,
            "{}.{:03} {} {}",
            time::strftime("%Y-%m-%d %H:%M:%S", &t).unwrap_or_default(),
            t.tm_nsec / 1000_000,
            record.level(),
            record.args()
        )
    });

    let rust_log = match (args.value_of("loglevel"), env::var("RUST_LOG")) {
        (None, Ok(rust_log_env)) => rust_log_env,
        (loglevel, _) => match loglevel.unwrap_or("info") {
            "debug" => "debug,reqwest=info,rustls=info".to_string(),
            loglevel => loglevel.to_string(),
        },
    };
    builder.parse_filters(&rust_log);

    builder.init();
}

fn abort<E: Display>(msg: &str, err: E) -> ! {
    println!("{} - {}", msg, err);
    process::exit(1)
}

fn parse_arg<T: FromStr>(args: &ArgMatches<'_>, name: &str) -> Option<T> {
    args.value_of(name).map(|s| {
        s.parse::<T>().unwrap_or_else(|_| {
            println!("Error parsing '{}' value '{}'", name, s);
            process::exit(1)
        })
    })
}

fn parse_zoomlevels(numlist: &str) -> Result<Vec<u8>, String> {
    numlist
        .split(',')
        .map(|v| v.trim().parse::<u8>())
        .collect::<Result<Vec<u8>, _>>()
        .map_err(|_| format!("Error parsing '{}' as list of zoom levels", numlist))
}

fn config_from_args(args: &ArgMatches<'_>) -> ApplicationCfg {
    let mut config: ApplicationCfg = if let Some(cfgpath) = args.value_of("config") {
        info!("Reading configuration from '{}'", cfgpath);
        read_config(cfgpath).unwrap_or_else(|e| abort("Error reading configuration", e))
    } else {
        parse_config(DEFAULT_CONFIG.to_string(), "")
            .unwrap_or_else(|e| abort("Error reading configuration", e))
    };
    if let Some(dir) = args.value_of("cache") {
        config.cache.file.base = dir.to_string();
    }
    config
}

fn extent_source(fetch: &FetchCfg) -> Result<Box<dyn ExtentSource>, String> {
    if let Some(ref extent) = fetch.extent {
        Ok(Box::new(StaticExtent(extent.into())))
    } else if let Some(ref path) = fetch.bounds {
        Ok(Box::new(GeojsonSource::new(path)))
    } else {
        Err("Missing extent, use --extent or --bounds".to_string())
    }
}

fn generate(args: &ArgMatches<'_>) {
    let mut config = config_from_args(args);
    if let Some(numlist) = args.value_of("zoom") {
        config.fetch.zoomlevels =
            parse_zoomlevels(numlist).unwrap_or_else(|e| abort("Invalid argument", e));
    }
    if let Some(path) = args.value_of("bounds") {
        config.fetch.bounds = Some(path.to_string());
        config.fetch.extent = None;
    }
    if let Some(progress) = parse_arg::<bool>(args, "progress") {
        config.fetch.progress = progress;
    }
    let service = FetchService::<ReqwestClient>::from_config(&config)
        .unwrap_or_else(|e| abort("Error reading configuration", e));

    let source: Box<dyn ExtentSource> = match args.value_of("extent") {
        Some(numlist) => Box::new(StaticExtent(
            parse_extent(numlist).unwrap_or_else(|e| abort("Invalid argument", e)),
        )),
        None => extent_source(&config.fetch).unwrap_or_else(|e| abort("Invalid configuration", e)),
    };
    info!("{}", source.info());
    let extent = source
        .extent()
        .unwrap_or_else(|e| abort("Error reading extent", e));

    let mut stats = Statistics::new();
    let summary = service.generate(&extent, Some(&mut stats));
    if !stats.is_empty() {
        info!("Fetch statistics:\n{}", stats);
    }
    if summary.failed > 0 {
        warn!(
            "{} tiles could not be fetched, run again to retry",
            summary.failed
        );
    }
}

fn manifest(args: &ArgMatches<'_>) {
    let config = config_from_args(args);
    let mut manifest =
        Manifest::from_config(&config).unwrap_or_else(|e| abort("Error reading configuration", e));
    if let Some(path) = args.value_of("output") {
        manifest.path = path.to_string();
    }
    if let Some(prefix) = args.value_of("prefix") {
        manifest.url_prefix = prefix.to_string();
    }
    if let Err(e) = manifest.write() {
        abort(&format!("Error listing tiles of '{}'", manifest.basepath), e);
    }
}

fn main() {
    dotenv().ok();
    let mut app = App::new("tilefetch")
        .version(crate_version!())
        .about("Download OSM raster tiles into a local cache for offline maps")
        .subcommand(SubCommand::with_name("generate")
                        .setting(AppSettings::AllowLeadingHyphen)
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --bounds=[FILE] 'Fetch tiles covering the bounds of a GeoJSON file'
                                              --extent=[minx,miny,maxx,maxy] 'Extent of tiles in decimal degrees'
                                              --zoom=[LEVELS] 'Comma separated zoom levels (Default: 17,18)'
                                              --cache=[DIR] 'Store tiles in DIR'
                                              --progress=[true|false] 'Show progress bar'")
                        .about("Fetch missing tiles into the cache"))
        .subcommand(SubCommand::with_name("manifest")
                        .args_from_usage("-c, --config=[FILE] 'Load from custom config file'
                                              --loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'
                                              --cache=[DIR] 'Tile cache directory'
                                              --output=[FILE] 'Output file (Default: tile_urls.txt)'
                                              --prefix=[URL] 'Prefix of listed tile URLs'")
                        .about("Write URL list of cached tiles"))
        .subcommand(SubCommand::with_name("genconfig")
                        .args_from_usage("--loglevel=[error|warn|info|debug|trace] 'Log level (Default: info)'")
                        .about("Generate configuration template"));

    match app.get_matches_from_safe_borrow(env::args()) {
        //app.get_matches() prohibits later call of app.print_help()
        Result::Err(e) => {
            println!("{}", e);
        }
        Result::Ok(matches) => match matches.subcommand() {
            ("generate", Some(sub_m)) => {
                init_logger(sub_m);
                generate(sub_m);
            }
            ("manifest", Some(sub_m)) => {
                init_logger(sub_m);
                manifest(sub_m);
            }
            ("genconfig", Some(sub_m)) => {
                init_logger(sub_m);
                println!("{}", FetchService::<ReqwestClient>::gen_config());
            }
            _ => {
                let _ = app.print_help();
                println!("");
            }
        },
    }
}
