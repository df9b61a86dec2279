mod webserver;

use clap::{Parser, Subcommand};
use profiledeck_lib::config::Config;
use profiledeck_lib::session::Session;
use profiledeck_lib::store::SledStore;
use profiledeck_lib::view_model;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(name = "profiledeck")]
#[command(about = "Browse, filter and page through random user profiles", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Start the profiledeck HTTP server")]
    Start {
        #[arg(long, value_name = "API_SERVER_PORT")]
        api_server_port: Option<u16>,

        #[arg(long, value_name = "API_SERVER_HOSTNAME")]
        api_server_hostname: Option<String>,

        #[arg(short, long, value_name = "DATA_DIRECTORY")]
        data_directory: Option<PathBuf>,

        #[arg(long, value_name = "URL")]
        endpoint: Option<String>,

        #[arg(long, value_name = "PAGES")]
        pool_pages: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            api_server_port,
            api_server_hostname,
            data_directory,
            endpoint,
            pool_pages,
        } => {
            println!("Starting profiledeck...");

            // Set up tracing
            let collector = tracing_subscriber::fmt()
                .with_max_level(Level::DEBUG)
                .finish();
            tracing::subscriber::set_global_default(collector)?;

            let mut config = match cli.config {
                Some(path) => Config::from_file(path)?,
                None => Config::default(),
            };
            if let Some(endpoint) = endpoint {
                config.endpoint = endpoint;
            }
            if let Some(pool_pages) = pool_pages {
                config.pool_pages = pool_pages;
            }

            // Set up default server hostname/port
            let http_host = api_server_hostname.unwrap_or("0.0.0.0".to_string());
            let http_port = api_server_port.unwrap_or(8080);
            let http_addr: SocketAddr = format!("{}:{}", http_host, http_port).parse()?;

            let data_directory = data_directory.unwrap_or(PathBuf::from("data"));
            std::fs::create_dir_all(&data_directory)?;
            let db_file = data_directory.join("profiledeck.db");
            println!("Using database file: {}", db_file.display());

            // Create tokio async runtime
            let rt = tokio::runtime::Runtime::new()?;

            let store = SledStore::open(&db_file)?;
            let source = config.source()?;
            tracing::info!("Fetching profiles from {}", source.endpoint());

            let (handle, mut event_loop) = view_model::new(
                Session::new(config.settings()),
                Arc::new(source),
                Arc::new(store),
            );

            // Kick off the view model event loop
            let event_loop_handler = rt.spawn(async move { event_loop.run().await });

            let view = rt.block_on(handle.startup())?;
            tracing::info!(
                "Loaded {} profiles, showing {}",
                view.total_fetched,
                view.displayed.len()
            );

            // Fire up the web server for our API
            let server_handle = handle.clone();
            let webserver_handler = rt.spawn(async move {
                if let Err(e) = webserver::start_webserver(http_addr, server_handle).await {
                    tracing::error!("Web server stopped: {:#}", e);
                }
            });

            println!(
                "\nprofiledeck listening on http://{} (Press Ctrl+C to exit)",
                http_addr
            );

            rt.block_on(async move {
                tokio::signal::ctrl_c().await?;
                handle.teardown().await?;
                webserver_handler.abort();
                event_loop_handler.abort();
                anyhow::Ok(())
            })?;
        }
    }

    Ok(())
}
