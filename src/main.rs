use anyhow::{Context, Result};
use clap::Parser;

use flowdeck::catalog::Catalog;
use flowdeck::script::{DEFAULT_REGION, REGIONS, build_script, validate_script};

#[derive(Parser, Debug)]
#[command(author, version, about = "Interactive data & AI platform walkthrough", long_about = None)]
struct Cli {
    /// Catalog JSON file; the built-in platform catalog is used when omitted
    #[arg(short, long, value_name = "FILE")]
    catalog: Option<String>,

    /// Region driving the scripted walkthrough
    #[arg(short, long, default_value = DEFAULT_REGION)]
    region: String,

    /// Print the catalog and script as JSON and exit (no window)
    #[arg(long)]
    dump: bool,

    /// Gemini API key; falls back to the GEMINI_API_KEY environment variable
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if !REGIONS.contains(&cli.region.as_str()) {
        anyhow::bail!(
            "unknown region {:?}; available: {}",
            cli.region,
            REGIONS.join(", ")
        );
    }

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_json_file(path)
            .with_context(|| format!("failed to load catalog {path}"))?,
        None => Catalog::builtin(),
    };
    catalog.validate()?;

    let steps = build_script(&cli.region);
    validate_script(&catalog, &steps).context("built-in script does not match the catalog")?;

    if cli.dump {
        let dump = serde_json::json!({
            "region": cli.region,
            "catalog": catalog,
            "script": steps,
        });
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    run_viewer(cli, catalog)
}

#[cfg(feature = "egui")]
fn run_viewer(cli: Cli, catalog: Catalog) -> Result<()> {
    use std::sync::Arc;

    use flowdeck::diagram::DiagramApp;
    use flowdeck::media::GeminiClient;

    let api_key = cli
        .api_key
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .unwrap_or_default();
    let backend = Arc::new(GeminiClient::new(api_key));

    let app = DiagramApp::new(catalog, &cli.region, backend)?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_maximized(true),
        ..Default::default()
    };
    eframe::run_native(
        "flowdeck — plataforma de dados & IA",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}

#[cfg(not(feature = "egui"))]
fn run_viewer(_cli: Cli, _catalog: Catalog) -> Result<()> {
    anyhow::bail!("built without the `egui` feature; use --dump for headless output")
}
