use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use lexicon_db::{BuildOptions, Emphasis, LexiconIndex, LoadMode};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info, warn};
use tracing_subscriber::EnvFilter;

use shakespeare_lexicon::{AppState, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_LEXICON: &str = "lexicon.xml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("binding to {}:{}", config.host, config.port);
    info!(
        "using lexicon at {} (mode: {:?}, emphasis: {:?})",
        config.lexicon_path.display(),
        config.load_mode,
        config.emphasis
    );
    if config.disable_cache {
        info!("cache headers disabled");
    }

    let start = Instant::now();
    let options = BuildOptions {
        emphasis: config.emphasis,
    };
    let index = LexiconIndex::load_with_mode(&config.lexicon_path, config.load_mode, &options)
        .with_context(|| format!("loading lexicon from {}", config.lexicon_path.display()))?;
    info!("lexicon indexed in {} ms", start.elapsed().as_millis());

    let state = AppState {
        index: Arc::new(index),
        emphasis: config.emphasis,
        disable_cache: config.disable_cache,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    host: String,
    port: u16,
    lexicon_path: PathBuf,
    load_mode: LoadMode,
    emphasis: Emphasis,
    disable_cache: bool,
}

fn load_config() -> Config {
    let mut disable_cache = false;
    let mut cli_lexicon: Option<PathBuf> = None;
    let mut cli_mode: Option<LoadMode> = None;
    let mut cli_emphasis: Option<Emphasis> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--no-cache" => disable_cache = true,
            "--lexicon" => {
                if let Some(path) = args.next() {
                    cli_lexicon = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--lexicon=") {
                    cli_lexicon = Some(PathBuf::from(path));
                } else if let Some(mode) = arg.strip_prefix("--load-mode=") {
                    cli_mode = parse_load_mode(mode);
                } else if let Some(style) = arg.strip_prefix("--emphasis=") {
                    cli_emphasis = parse_emphasis(style);
                } else {
                    warn!("ignoring unknown argument `{arg}`");
                }
            }
        }
    }

    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let lexicon_path = cli_lexicon
        .or_else(|| env::var("LEXICON_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LEXICON));
    let load_mode = cli_mode
        .or_else(|| {
            env::var("LEXICON_LOAD_MODE")
                .ok()
                .as_deref()
                .and_then(parse_load_mode)
        })
        .unwrap_or(LoadMode::Mmap);
    let emphasis = cli_emphasis
        .or_else(|| {
            env::var("LEXICON_EMPHASIS")
                .ok()
                .as_deref()
                .and_then(parse_emphasis)
        })
        .unwrap_or(Emphasis::Markdown);

    Config {
        host,
        port,
        lexicon_path,
        load_mode,
        emphasis,
        disable_cache,
    }
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => {
            warn!("unknown load mode `{raw}`, expected mmap or owned");
            None
        }
    }
}

fn parse_emphasis(raw: &str) -> Option<Emphasis> {
    raw.parse::<Emphasis>().inspect_err(|err| warn!("{err}")).ok()
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
