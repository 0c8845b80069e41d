// nametag: generate name tags and A4 print sheets from a roster request

use anyhow::{anyhow, Result};
use clap::Parser;
use nametag::{
    DirectorySink, GenerationRequest, GenerationSummary, Generator, MemorySink, OutputSink,
    RandomPicker, SheetConfig,
};
use roster::validate_rows;
use sheet_core::{default_family_priority, FontLibrary};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Bundled font shipped with the web front end
const DEFAULT_FONT: &str = "public/fonts/NotoSansKR-Regular.ttf";

const DEFAULT_OUTPUT: &str = "nametags.zip";

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate name tags and A4 print sheets")]
struct Args {
    /// Request JSON file, or "-" for stdin
    #[arg(short, long)]
    request: String,

    /// Output ZIP file (defaults to nametags.zip)
    #[arg(short, long, conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Write images into this directory instead of a ZIP
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Bundled font file
    #[arg(long)]
    font: Option<PathBuf>,

    /// Do not look for installed system fonts
    #[arg(long)]
    no_system_fonts: bool,

    /// Seed for template selection
    #[arg(long)]
    seed: Option<u64>,

    /// Sheet configuration JSON (partial overrides)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Pack tags onto A4 pages regardless of the request
    #[arg(long, conflicts_with = "individual")]
    arranged: bool,

    /// One image per person regardless of the request
    #[arg(long)]
    individual: bool,

    /// Only validate the roster
    #[arg(long)]
    check: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut request = load_request(&args.request)?;
    if args.arranged {
        request.use_arranged_layout = true;
    }
    if args.individual {
        request.use_arranged_layout = false;
    }

    if args.check {
        validate_rows(&request.person_data)?;
        println!("{} rows OK", request.person_data.len());
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| anyhow!("failed to read config {}: {e}", path.display()))?;
            SheetConfig::from_json(&json)?
        }
        None => SheetConfig::default(),
    };

    let fonts = load_fonts(args.font.as_deref(), !args.no_system_fonts);
    let generator = Generator::with_config(&fonts, config);
    let mut picker = match args.seed {
        Some(seed) => RandomPicker::seeded(seed),
        None => RandomPicker::from_entropy(),
    };

    let (summary, destination) = match &args.out_dir {
        Some(dir) => {
            // nothing touches the directory until every image is rendered
            let mut staged = MemorySink::new();
            let summary = generator.generate(&request, &mut staged, &mut picker)?;
            let mut sink = DirectorySink::create(dir)?;
            for (name, data) in staged.entries() {
                sink.write_entry(name, data)?;
            }
            (summary, dir.clone())
        }
        None => {
            let path = args
                .output
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
            let (summary, zip) = generator.generate_archive(&request, &mut picker)?;
            fs::write(&path, zip)
                .map_err(|e| anyhow!("failed to write {}: {e}", path.display()))?;
            (summary, path)
        }
    };

    print_summary(&summary, &destination);
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn load_request(source: &str) -> Result<GenerationRequest> {
    let json = if source == "-" {
        let mut json = String::new();
        std::io::stdin()
            .read_to_string(&mut json)
            .map_err(|e| anyhow!("failed to read request from stdin: {e}"))?;
        json
    } else {
        fs::read_to_string(source).map_err(|e| anyhow!("failed to read request {source}: {e}"))?
    };
    Ok(GenerationRequest::from_json(&json)?)
}

/// Bundled font first, then installed families in priority order
fn load_fonts(font: Option<&Path>, system: bool) -> FontLibrary {
    let path = font.unwrap_or_else(|| Path::new(DEFAULT_FONT));
    let mut fonts = FontLibrary::from_bundled_path(path);
    if font.is_some() && !fonts.is_bundled_available() {
        log::warn!("font {} could not be loaded", path.display());
    }

    if system {
        let priority = default_family_priority(fonts.is_bundled_available());
        let added = fonts.discover(&priority, &FontLibrary::system_font_dirs());
        log::info!("{added} system font families added");
    }
    if fonts.is_empty() {
        log::warn!("no fonts available, tags will have no text");
    }
    fonts
}

fn print_summary(summary: &GenerationSummary, destination: &Path) {
    if summary.pages > 0 {
        println!(
            "Wrote {} pages ({} student, {} non-student tags) to {}",
            summary.pages,
            summary.placed_students,
            summary.placed_non_students,
            destination.display()
        );
    } else {
        println!("Wrote {} files to {}", summary.files, destination.display());
    }
    if summary.skipped > 0 {
        println!("Skipped {} people without templates", summary.skipped);
    }
}
