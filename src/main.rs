use clap::{App, Arg};
use log::{error, info, warn};
use masterlink::cache::{MetadataCache, ResyncTask, SnapshotSource};
use masterlink::channel::Watchdog;
use masterlink::config::Config;
use masterlink::connection::{ConnectionRegistry, ServiceConnection};
use masterlink::proxy::{self, DataBaseAccess};
use masterlink::remote::{CallbackHandle, MasterService};
use masterlink::wire::TcpResolver;
use simple_logging;
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// How often the link status is written to the log.
const STATUS_PERIOD: Duration = Duration::from_secs(60);
///
/// This holds the command line options:
///
#[derive(Debug, Clone)]
struct ProgramOptions {
    config_file: String,
    log_filename: String,
    verbose: bool,
}

fn main() {
    let options = process_options();
    let level = if options.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    if let Err(e) = simple_logging::log_to_file(&options.log_filename, level) {
        eprintln!("Unable to log to {}: {}", options.log_filename, e);
        process::exit(-1);
    }
    let config = match Config::load(Path::new(&options.config_file)) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            process::exit(-1);
        }
    };
    info!(
        "masterlink starting: master {} at {}:{} (cache {})",
        config.master.service,
        config.master.hosts,
        config.master.port,
        if config.master.use_cache { "on" } else { "off" }
    );

    let watchdog = match Watchdog::start(Duration::from_secs(1)) {
        Ok(watchdog) => Arc::new(watchdog),
        Err(e) => {
            error!("Unable to start the channel watchdog: {}", e);
            process::exit(-1);
        }
    };
    let resolver = TcpResolver::new(config.call_timeout())
        .with_connect_timeout(config.connect_timeout())
        .with_watchdog(Arc::clone(&watchdog));

    let cache = Arc::new(MetadataCache::new(config.master.use_cache));
    let mut callback = CallbackHandle::new(&config.master.root, &config.master.client);
    if config.master.use_cache {
        callback = callback.with_sink(cache.clone());
    }
    let connection: ServiceConnection<dyn MasterService> = ServiceConnection::new(
        &config.master.service,
        &config.master.hosts,
        config.master.port,
        Arc::new(resolver),
    )
    .with_callback(callback)
    .with_settings(config.supervisor_settings())
    .on_disconnect(Arc::new(|service: &str| {
        warn!("Lost {}; work bound to the old connection is orphaned", service)
    }));

    let registry = ConnectionRegistry::new();
    let master = match registry.register(connection, false) {
        Ok(master) => master,
        Err(e) => {
            error!("{}", e);
            process::exit(-1);
        }
    };

    let mut resync = None;
    if config.master.use_cache {
        let source: Arc<dyn SnapshotSource> = master.clone();
        match ResyncTask::start(Arc::clone(&cache), source, config.resync_period()) {
            Ok(task) => resync = Some(task),
            Err(e) => {
                error!("Unable to start the metadata resync: {}", e);
                process::exit(-1);
            }
        }
    }
    let database = proxy::database_access(
        Arc::clone(&master),
        Arc::clone(&cache),
        config.master.use_cache,
        config.scheduler_freshness(),
    );

    loop {
        for (name, connected) in registry.statuses() {
            info!("{} {}", name, if connected { "connected" } else { "not connected" });
        }
        if cache.is_enabled() {
            info!(
                "Metadata cache {} with {} destination(s)",
                if cache.is_ready() { "ready" } else { "not ready" },
                cache.len()
            );
        }
        match database.get_cat_urls() {
            Ok(urls) => info!("{} category URL(s) known", urls.len()),
            Err(e) => warn!("Category URLs unavailable: {}", e),
        }
        if master.is_shut_down() {
            break;
        }
        thread::sleep(STATUS_PERIOD);
    }
    if let Some(mut task) = resync {
        task.stop();
    }
    registry.shutdown_all();
}
///
/// Argument processing.  We do this with clap.  As per the crate
/// comments, the options we support are:
///
/// *   --config - TOML configuration file.
/// *   --log-file - the file we'll use to log what we're doing.
/// *   --verbose - log at debug level.
///
fn process_options() -> ProgramOptions {
    let parser = App::new("masterlink")
        .version("0.1")
        .about("Keeps a mover attached to its dissemination master")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("PATH")
                .help("TOML configuration file")
                .takes_value(true)
                .default_value("/etc/masterlink/masterlink.toml"),
        )
        .arg(
            Arg::with_name("log")
                .short("l")
                .long("log-file")
                .value_name("PATH")
                .help("File used to log events")
                .takes_value(true)
                .default_value("/var/log/masterlink/masterlink.log"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log debug messages too"),
        )
        .get_matches();

    let mut result = ProgramOptions {
        config_file: String::from("/etc/masterlink/masterlink.toml"),
        log_filename: String::from("/var/log/masterlink/masterlink.log"),
        verbose: parser.is_present("verbose"),
    };
    if let Some(file) = parser.value_of("config") {
        result.config_file = String::from(file);
    }
    // Log File:

    if let Some(file) = parser.value_of("log") {
        // Test-open the file so a bad path is reported on stderr
        // rather than lost.

        let f = fs::OpenOptions::new().append(true).create(true).open(file);
        if let Err(e) = f {
            eprintln!("Unable to open/create log file {} : {}", file, e);
            process::exit(-1);
        }
        result.log_filename = String::from(file);
    }
    result
}
