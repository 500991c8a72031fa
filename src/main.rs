use std::fs::File;
use std::sync::Arc;

use blogforge::api::{Backend, HttpBackend};
use blogforge::core::{archive, config};
use blogforge::core::generation::{Audience, Tone};
use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "blogforge", version, about = "Terminal client for the blog generation service")]
struct Args {
    /// Backend base URL (overrides config and BLOGFORGE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Open this chat on startup
    #[arg(long, value_name = "ID")]
    chat: Option<i64>,

    /// Writing tone for new posts
    #[arg(long, value_enum)]
    tone: Option<Tone>,

    /// Target audience for new posts
    #[arg(long, value_enum)]
    audience: Option<Audience>,

    /// Target length in words
    #[arg(long)]
    length: Option<u32>,

    /// Keywords to weave into new posts
    #[arg(long)]
    keywords: Option<String>,

    /// Log level written to blogforge.log
    #[arg(long, default_value = "debug", value_parser = parse_level)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List every generated blog, or print one in full, and exit
    Blogs {
        /// Print this post in full instead of the listing
        id: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // The terminal belongs to the TUI, so logs go to a file
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("blogforge.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    log::info!("Blogforge starting up");

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}. Using defaults.");
            log::warn!("Config load failed: {}", e);
            config::BlogforgeConfig::default()
        }
    };
    let mut resolved = config::resolve(&file_config, args.api_url.as_deref());
    if args.tone.is_some() {
        resolved.settings.tone = args.tone;
    }
    if args.audience.is_some() {
        resolved.settings.audience = args.audience;
    }
    if let Some(length) = args.length.filter(|&words| words > 0) {
        resolved.settings.length = Some(length);
    }
    if let Some(keywords) = args.keywords.filter(|k| !k.trim().is_empty()) {
        resolved.settings.keywords = Some(keywords);
    }
    log::info!(
        "Backend {} (user {}, timeout {:?})",
        resolved.base_url,
        resolved.user_id,
        resolved.request_timeout
    );

    let backend = HttpBackend::new(resolved.base_url.clone(), resolved.request_timeout)
        .map_err(std::io::Error::other)?
        .with_user_id(resolved.user_id);

    match args.command {
        Some(Command::Blogs { id }) => {
            let blogs = backend.list_blogs().await.map_err(std::io::Error::other)?;
            match id {
                None => print!("{}", archive::render_listing(&blogs)),
                Some(id) => {
                    let blog = archive::find(&blogs, id).ok_or_else(|| {
                        std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            format!("no blog with id {id}"),
                        )
                    })?;
                    print!("{}", archive::render_post(blog));
                }
            }
            Ok(())
        }
        None => blogforge::tui::run(resolved, Arc::new(backend), args.chat),
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse()
        .map_err(|_| format!("unknown log level '{raw}' (off, error, warn, info, debug, trace)"))
}
