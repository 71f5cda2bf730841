use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use page_model::{EditSession, PageInfo, Preferences};
use pdf_engine::{default_engine, DocumentHandle, LopdfEngine, OpenSource, PdfEngine};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use storage::Storage;

mod ops;

pub use ops::EditOp;

#[derive(Debug, Parser)]
#[command(name = "folio")]
#[command(about = "Reorder, rotate and delete PDF pages")]
pub struct Cli {
    /// Directory holding preferences.json.
    #[arg(long, global = true, env = "FOLIO_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print page geometry as JSON.
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the change-set the given edits would produce.
    Plan {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// rotate=ID:DEG, delete=ID, select=ID, clear-selection, move=SRC:DST|end
        #[arg(long = "op", value_name = "OP")]
        ops: Vec<EditOp>,
    },
    /// Apply edits and write the result.
    Edit {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long = "op", value_name = "OP")]
        ops: Vec<EditOp>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Concatenate documents.
    Merge {
        #[arg(value_name = "FILE", required = true, num_args = 1..)]
        files: Vec<PathBuf>,
        #[arg(long)]
        output: PathBuf,
    },
    /// Show preferences, updating any that are passed.
    Prefs {
        #[arg(long, value_name = "BOOL")]
        allow_empty_output: Option<bool>,
        #[arg(long, value_name = "BOOL")]
        allow_overwrite_source: Option<bool>,
        #[arg(long, value_name = "SUFFIX")]
        output_suffix: Option<String>,
    },
    /// Print CLI version.
    Version,
}

#[derive(Debug, Serialize)]
struct InfoOutput {
    path: String,
    page_count: usize,
    pages: Vec<PageInfo>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config_dir = cli.config_dir;

    match cli.command {
        Commands::Info { file } => run_info(&file),
        Commands::Plan { file, ops } => run_plan(&file, &ops),
        Commands::Edit { file, ops, output } => {
            let preferences = open_storage(config_dir.as_deref())?.load_preferences()?;
            run_edit(&file, &ops, output.as_deref(), &preferences)
        }
        Commands::Merge { files, output } => run_merge(&files, &output),
        Commands::Prefs { allow_empty_output, allow_overwrite_source, output_suffix } => {
            let storage = open_storage(config_dir.as_deref())?;
            let mut preferences = storage.load_preferences()?;
            let changed = allow_empty_output.is_some()
                || allow_overwrite_source.is_some()
                || output_suffix.is_some();

            if let Some(value) = allow_empty_output {
                preferences.allow_empty_output = value;
            }
            if let Some(value) = allow_overwrite_source {
                preferences.allow_overwrite_source = value;
            }
            if let Some(value) = output_suffix {
                preferences.output_suffix = value;
            }
            if changed {
                storage.save_preferences(&preferences).context("failed to save preferences")?;
            }

            println!("{}", serde_json::to_string_pretty(&preferences)?);
            Ok(())
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_storage(config_dir: Option<&Path>) -> Result<Storage> {
    match config_dir {
        Some(dir) => Ok(Storage::with_root(dir)),
        None => Storage::from_default_project().context("failed to locate preferences"),
    }
}

fn run_info(file: &Path) -> Result<()> {
    let mut engine = default_engine();
    let (handle, session) = open_session(&mut engine, file)?;

    let pages: Vec<PageInfo> = session
        .pages()
        .iter()
        .map(|record| PageInfo {
            identity: record.identity(),
            width: record.width(),
            height: record.height(),
        })
        .collect();
    let payload = InfoOutput { path: file.display().to_string(), page_count: pages.len(), pages };

    println!("{}", serde_json::to_string_pretty(&payload)?);

    engine.close(handle)?;
    Ok(())
}

fn run_plan(file: &Path, ops: &[EditOp]) -> Result<()> {
    let mut engine = default_engine();
    let (handle, mut session) = open_session(&mut engine, file)?;

    apply_ops(&mut session, ops)?;
    println!("{}", serde_json::to_string_pretty(&session.change_set())?);

    engine.close(handle)?;
    Ok(())
}

fn run_edit(
    file: &Path,
    ops: &[EditOp],
    output: Option<&Path>,
    preferences: &Preferences,
) -> Result<()> {
    let mut engine = default_engine();
    let (handle, mut session) = open_session(&mut engine, file)?;

    apply_ops(&mut session, ops)?;
    if !session.is_modified() {
        log::warn!("no page edits; {} will be an unchanged copy", file.display());
    }

    let destination = output.map(ToOwned::to_owned).unwrap_or_else(|| {
        let destination = preferences.default_destination(session.source());
        log::info!("no --output given, writing to {}", destination.display());
        destination
    });
    let request = session
        .save_request(canonical_or_same(&destination), preferences)
        .context("refusing to save")?;

    if let Some(parent) = request.destination.parent() {
        fs::create_dir_all(parent)?;
    }

    engine
        .write_edited(handle, &request.change_set, &request.destination)
        .with_context(|| format!("failed to write {}", request.destination.display()))?;

    println!("{}", request.destination.display());

    engine.close(handle)?;
    Ok(())
}

fn run_merge(files: &[PathBuf], output: &Path) -> Result<()> {
    for file in files {
        ensure_pdf_exists(file)?;
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }

    default_engine().merge(files, output).context("failed to merge PDFs")?;
    println!("{}", output.display());

    Ok(())
}

fn open_session(engine: &mut LopdfEngine, file: &Path) -> Result<(DocumentHandle, EditSession)> {
    ensure_pdf_exists(file)?;

    let handle = engine.open(OpenSource::from(file)).context("failed to open PDF")?;
    let session = EditSession::open(canonical_or_same(file), engine.pages(handle)?)
        .context("failed to load pages")?;

    Ok((handle, session))
}

fn apply_ops(session: &mut EditSession, ops: &[EditOp]) -> Result<()> {
    log::debug!("applying {} ops to {}", ops.len(), session.source().display());

    for op in ops {
        for action in op.actions() {
            session.apply(*action).with_context(|| format!("failed to apply `{op}`"))?;
        }
    }

    Ok(())
}

fn canonical_or_same(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn ensure_pdf_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
