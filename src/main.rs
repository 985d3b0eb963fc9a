//! # canvasmail CLI
//!
//! Command-line interface for the email-template canvas.
//!
//! ## Usage
//!
//! ```bash
//! # Run the HTTP API (in-memory store)
//! canvasmail serve
//!
//! # Persist saved templates to a JSON file
//! canvasmail serve --listen 0.0.0.0:8080 --data templates.json
//!
//! # List built-in templates
//! canvasmail catalog
//!
//! # Preview page 0 of a saved document at half size
//! canvasmail render doc.json --zoom 0.5
//!
//! # Export a catalog template as email HTML
//! canvasmail render --template t1 --export --output welcome.html
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use canvasmail::{
    CanvasError, catalog,
    document::CanvasDocument,
    render::{self, html},
    server::{self, ServerConfig},
};

/// canvasmail - email template canvas server and renderer
#[derive(Parser, Debug)]
#[command(name = "canvasmail")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter (tracing EnvFilter syntax)
    #[arg(long, global = true, env = "CANVASMAIL_LOG", default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "CANVASMAIL_LISTEN", default_value = "127.0.0.1:8080")]
        listen: String,

        /// JSON file for saved templates (in-memory when omitted)
        #[arg(long, env = "CANVASMAIL_DATA", value_name = "FILE")]
        data: Option<PathBuf>,
    },

    /// List built-in templates
    Catalog,

    /// Render a document to HTML
    Render {
        /// Document JSON file
        #[arg(required_unless_present = "template", conflicts_with = "template")]
        input: Option<PathBuf>,

        /// Render a catalog template instead of a file
        #[arg(long, value_name = "ID")]
        template: Option<String>,

        /// Page to preview (defaults to the document's active page)
        #[arg(long)]
        page: Option<usize>,

        /// Zoom level (defaults to the document's zoom)
        #[arg(long)]
        zoom: Option<f64>,

        /// Emit a full email document with every page
        #[arg(long)]
        export: bool,

        /// Write to FILE instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<(), CanvasError> {
    match command {
        Commands::Serve { listen, data } => {
            let config = ServerConfig {
                listen_addr: listen,
                data_path: data,
            };
            server::serve(config).await
        }

        Commands::Catalog => {
            println!("Built-in templates:");
            for entry in catalog::list_templates() {
                println!(
                    "  {:<4} {:<20} {:<12} {} element(s)",
                    entry.id,
                    entry.name,
                    entry.category,
                    entry.elements.len()
                );
            }
            Ok(())
        }

        Commands::Render {
            input,
            template,
            page,
            zoom,
            export,
            output,
        } => {
            let (document, title) = match (input, template) {
                (_, Some(id)) => {
                    let name = catalog::get(&id)
                        .map(|t| t.name)
                        .unwrap_or_else(|| id.clone());
                    (catalog::instantiate_document(&id)?, name)
                }
                (Some(path), None) => {
                    let json = tokio::fs::read_to_string(&path).await?;
                    let title = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "Email".to_string());
                    (CanvasDocument::from_json(&json)?, title)
                }
                (None, None) => {
                    return Err(CanvasError::Validation(
                        "either an input file or --template is required".into(),
                    ));
                }
            };

            let zoom = zoom.unwrap_or_else(|| document.zoom_level());
            let html = if export {
                html::export_html(&document, &title, zoom)
            } else {
                let page = page.unwrap_or_else(|| document.active_page_index());
                let rendered = render::render(&document, page, zoom);
                if let Some(p) = rendered.as_page() {
                    for warning in &p.warnings {
                        tracing::warn!(?warning, "Render warning");
                    }
                }
                html::preview_html(&rendered)
            };

            match output {
                Some(path) => {
                    tokio::fs::write(&path, html).await?;
                    tracing::info!(path = %path.display(), "Wrote HTML");
                }
                None => println!("{}", html),
            }
            Ok(())
        }
    }
}
