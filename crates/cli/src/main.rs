//! roofplan - command-line tools for solar roof layouts.
//!
//! Create, inspect, script, render and store layout documents without a
//! graphical front end.

mod logger;
mod settings;

use anyhow::{Context, Result};
use api::{execute_command, execute_query, parse_script, Query};
use canvas::Editor;
use clap::{Parser, Subcommand, ValueEnum};
use interchange::{
    Associations, Document, FileBackend, LayoutBackend, SaveController, SaveRequest, Summary,
};
use log::LevelFilter;
use logger::RoofplanLogger;
use render::{export_png, Frame, Renderer};
use scene::{CanvasSettings, CanvasSize, Layout};
use settings::Settings;
use std::io::Read;
use std::path::{Path, PathBuf};

/// roofplan - edit solar roof layouts from the command line
#[derive(Parser)]
#[command(name = "roofplan")]
#[command(about = "Command-line tools for solar roof layouts")]
struct Cli {
    /// Settings file (default: ~/.roofplan/settings.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity of the run log
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write an empty layout document
    New {
        path: PathBuf,
        #[arg(long, default_value_t = 1200.0)]
        width: f32,
        #[arg(long, default_value_t = 800.0)]
        height: f32,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print a summary of a layout document
    Info { path: PathBuf },

    /// Render a layout to PNG
    Render {
        path: PathBuf,
        /// Output file (default: the document path with a .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Theme name, overriding the settings file
        #[arg(long)]
        theme: Option<String>,
        /// Directory that relative image references resolve against
        /// (default: the document's directory)
        #[arg(long)]
        images: Option<PathBuf>,
    },

    /// Apply a JSON command script to a layout
    Apply {
        path: PathBuf,
        /// Script file holding a command or an array of commands, or `-` for stdin
        script: PathBuf,
        /// Where to write the result (default: overwrite the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a JSON query against a layout
    Query { path: PathBuf, json: String },

    /// Save a layout document as a stored record
    Save {
        path: PathBuf,
        /// Record name (default: the file stem)
        #[arg(long)]
        name: Option<String>,
        /// Update this record instead of creating a new one
        #[arg(long)]
        record: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        service: Option<String>,
    },

    /// Write a stored record out as a layout document
    Load {
        id: String,
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List stored records
    List,

    /// Delete a stored record
    Delete { id: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = RoofplanLogger::init(cli.log_level.into()) {
        eprintln!("roofplan: logging disabled: {:#}", e);
    }

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::New {
            path,
            width,
            height,
            force,
        } => new_layout(&settings, &path, width, height, force),
        Commands::Info { path } => print_info(&path),
        Commands::Render {
            path,
            output,
            theme,
            images,
        } => render_layout(&settings, &path, output, theme, images),
        Commands::Apply {
            path,
            script,
            output,
        } => apply_script(&settings, &path, &script, output),
        Commands::Query { path, json } => run_query(&settings, &path, &json),
        Commands::Save {
            path,
            name,
            record,
            client,
            project,
            service,
        } => {
            let associations = Associations {
                client_id: client,
                project_id: project,
                service_id: service,
            };
            save_layout(&settings, &path, name, record, associations)
        }
        Commands::Load { id, output } => load_record(&settings, &id, &output),
        Commands::List => list_records(&settings),
        Commands::Delete { id } => delete_record(&settings, &id),
    }
}

fn read_layout(path: &Path) -> Result<Layout> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = Document::from_json(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(document.into_layout())
}

fn write_layout(path: &Path, layout: &Layout) -> Result<()> {
    let json = Document::from_layout(layout).to_json_pretty()?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn new_layout(settings: &Settings, path: &Path, width: f32, height: f32, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    if width <= 0.0 || height <= 0.0 {
        anyhow::bail!("canvas size must be positive, got {}x{}", width, height);
    }
    let layout = Layout::with_canvas(CanvasSettings {
        size: CanvasSize::new(width, height),
        grid_size: settings.grid_size,
        ..Default::default()
    });
    write_layout(path, &layout)?;
    println!("Created {}", path.display());
    Ok(())
}

fn print_info(path: &Path) -> Result<()> {
    let layout = read_layout(path)?;
    let summary = Summary::of(&layout);
    let canvas = &layout.canvas;

    println!("{}", path.display());
    println!("  version:     {}", layout.version);
    println!(
        "  canvas:      {} x {} (grid {}, snap {})",
        canvas.size.width(),
        canvas.size.height(),
        canvas.grid_size,
        if canvas.snap_to_grid { "on" } else { "off" }
    );
    println!("  roofs:       {}", layout.roofs.len());
    for roof in &layout.roofs {
        println!("    {} {} {}", roof.id, roof.type_tag(), if roof.locked { "(locked)" } else { "" });
    }
    println!("  modules:     {}", summary.module_count);
    println!("  annotations: {}", layout.annotations.len());
    if let Some(image) = &layout.background_image {
        println!("  background:  {}", image);
    }
    Ok(())
}

fn render_layout(
    settings: &Settings,
    path: &Path,
    output: Option<PathBuf>,
    theme: Option<String>,
    images: Option<PathBuf>,
) -> Result<()> {
    let layout = read_layout(path)?;
    let theme = match theme {
        Some(name) => theme::Theme::named(&name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme {:?} (expected light or dark)", name))?,
        None => settings.theme(),
    };
    let image_root = images.or_else(|| path.parent().map(Path::to_path_buf));

    let renderer = Renderer::new(theme);
    let bytes = export_png(&renderer, &Frame::new(&layout), image_root.as_deref())
        .with_context(|| format!("Failed to render {}", path.display()))?;

    let output = output.unwrap_or_else(|| path.with_extension("png"));
    std::fs::write(&output, bytes).with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Rendered {}", output.display());
    Ok(())
}

fn open_editor(settings: &Settings, path: &Path) -> Result<Editor> {
    let layout = read_layout(path)?;
    let mut editor = Editor::with_layout(layout, settings.editor_config());
    *editor.keymap_mut() = settings.keymap();
    Ok(editor)
}

fn apply_script(settings: &Settings, path: &Path, script: &Path, output: Option<PathBuf>) -> Result<()> {
    let source = if script == Path::new("-") {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read script from stdin")?;
        source
    } else {
        std::fs::read_to_string(script)
            .with_context(|| format!("Failed to read {}", script.display()))?
    };
    let commands = parse_script(&source).context("Invalid command script")?;

    let mut editor = open_editor(settings, path)?;
    let mut failures = 0;
    for command in commands {
        let result = execute_command(&mut editor, command);
        if result.is_error() {
            failures += 1;
        }
        println!("{}", serde_json::to_string(&result)?);
    }
    // Abort any gesture the script left open.
    editor.cancel_gesture();

    let output = output.unwrap_or_else(|| path.to_path_buf());
    write_layout(&output, editor.store.layout())?;
    if failures > 0 {
        log::warn!("{} command(s) failed", failures);
    }
    Ok(())
}

fn run_query(settings: &Settings, path: &Path, json: &str) -> Result<()> {
    let query: Query = serde_json::from_str(json).context("Invalid query")?;
    let editor = open_editor(settings, path)?;
    let result = execute_query(&editor, query);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn backend(settings: &Settings) -> Result<FileBackend> {
    Ok(FileBackend::new(settings.storage_dir()?))
}

fn save_layout(
    settings: &Settings,
    path: &Path,
    name: Option<String>,
    record: Option<String>,
    associations: Associations,
) -> Result<()> {
    let layout = read_layout(path)?;
    let name = name
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Untitled layout".to_string());
    let backend = backend(settings)?;
    let controller = match record {
        Some(id) => SaveController::for_record(id),
        None => SaveController::new(),
    };

    let request = SaveRequest::new(name, &layout, associations);
    let id = smol::block_on(controller.save(&backend, request))?;
    println!("{}", id);
    Ok(())
}

fn load_record(settings: &Settings, id: &str, output: &Path) -> Result<()> {
    let backend = backend(settings)?;
    let record = smol::block_on(backend.fetch(id))?;
    write_layout(output, &record.layout())?;
    println!("Loaded {} ({}) into {}", record.name(), record.id, output.display());
    Ok(())
}

fn list_records(settings: &Settings) -> Result<()> {
    let backend = backend(settings)?;
    let listings = smol::block_on(backend.list())?;
    if listings.is_empty() {
        println!("No saved layouts in {}", backend.root().display());
        return Ok(());
    }
    for listing in listings {
        println!(
            "{}  {}  {} module(s){}  {}",
            listing.id,
            listing.name,
            listing.summary.module_count,
            listing
                .summary
                .roof_type
                .map(|t| format!(", {}", t))
                .unwrap_or_default(),
            listing.updated_at
        );
    }
    Ok(())
}

fn delete_record(settings: &Settings, id: &str) -> Result<()> {
    let backend = backend(settings)?;
    smol::block_on(backend.delete(id))?;
    println!("Deleted {}", id);
    Ok(())
}
