use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use pagepick::snapshot::{self, Snapshot};
use pagepick::{ChoiceMode, MatchCase, Picker, PickerConfig, SnapshotError};

use crate::error::{CliError, Result};
use crate::render::{OutputOptions, write_rows, write_selection, write_window};

#[derive(Debug, Parser)]
#[command(
    name = "pagepick",
    about = "Inspect tree, search, selection and viewport output for a workspace snapshot",
    version
)]
pub struct Cli {
    /// Emit JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Truncate names to this many display columns.
    #[arg(long, global = true, value_name = "COLS")]
    pub width: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print tree-mode rows.
    Tree(TreeArgs),

    /// Print flat search matches with breadcrumbs.
    Search(SearchArgs),

    /// Apply selection toggles and print the resulting selection.
    Select(SelectArgs),

    /// Print the rows a renderer would draw for a viewport.
    Window(WindowArgs),
}

#[derive(Debug, Args)]
pub struct TreeArgs {
    /// Snapshot JSON file.
    pub snapshot: PathBuf,

    /// Expand a node; repeat to expand several, in order.
    #[arg(long = "expand", value_name = "ID")]
    pub expand: Vec<String>,

    /// Expand every node that has children.
    #[arg(long = "expand-all")]
    pub expand_all: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Snapshot JSON file.
    pub snapshot: PathBuf,

    /// Substring to match against page names.
    pub query: String,

    /// Match without regard to case.
    #[arg(long = "ignore-case")]
    pub ignore_case: bool,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Snapshot JSON file.
    pub snapshot: PathBuf,

    /// Toggle a page; repeat for a sequence of toggles.
    #[arg(long = "toggle", value_name = "ID")]
    pub toggle: Vec<String>,

    /// Single-choice mode.
    #[arg(long)]
    pub single: bool,

    /// Apply the toggles in search mode with this query.
    #[arg(long, value_name = "Q")]
    pub query: Option<String>,
}

#[derive(Debug, Args)]
pub struct WindowArgs {
    /// Snapshot JSON file.
    pub snapshot: PathBuf,

    /// Viewport height in pixels.
    #[arg(long, value_name = "PX")]
    pub viewport: u32,

    /// Scroll offset in pixels.
    #[arg(long, value_name = "PX", default_value_t = 0)]
    pub scroll: u32,

    /// Expand every node that has children.
    #[arg(long = "expand-all")]
    pub expand_all: bool,
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    run_with_writer(cli, &mut lock)
}

/// Run a parsed command, writing its output to `out`.
pub fn run_with_writer(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let options = OutputOptions {
        json: cli.json,
        width: cli.width,
    };
    let config = PickerConfig::from_env();

    match cli.command {
        Commands::Tree(args) => run_tree(args, config, options, out),
        Commands::Search(args) => run_search(args, config, options, out),
        Commands::Select(args) => run_select(args, config, options, out),
        Commands::Window(args) => run_window(args, config, options, out),
    }
}

fn run_tree(
    args: TreeArgs,
    config: PickerConfig,
    options: OutputOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let mut picker = open(&args.snapshot, config)?;
    if args.expand_all {
        picker.expand_all();
    }
    for id in &args.expand {
        require_known(&picker, id)?;
        picker.toggle_expand(id);
    }
    write_rows(out, &picker, options)
}

fn run_search(
    args: SearchArgs,
    config: PickerConfig,
    options: OutputOptions,
    out: &mut dyn Write,
) -> Result<()> {
    if args.query.is_empty() {
        return Err(CliError::invalid("search query must not be empty"));
    }
    let config = if args.ignore_case {
        config.with_match_case(MatchCase::Insensitive)
    } else {
        config
    };
    let mut picker = open(&args.snapshot, config)?;
    picker.set_query(args.query);
    write_rows(out, &picker, options)
}

fn run_select(
    args: SelectArgs,
    config: PickerConfig,
    options: OutputOptions,
    out: &mut dyn Write,
) -> Result<()> {
    let config = if args.single {
        config.with_choice(ChoiceMode::Single)
    } else {
        config
    };
    let mut picker = open(&args.snapshot, config)?;
    if let Some(query) = args.query {
        picker.set_query(query);
    }
    for id in &args.toggle {
        require_known(&picker, id)?;
        picker.toggle_select(id);
    }
    write_selection(out, &picker, options)
}

fn run_window(
    args: WindowArgs,
    config: PickerConfig,
    options: OutputOptions,
    out: &mut dyn Write,
) -> Result<()> {
    if args.viewport == 0 {
        return Err(CliError::invalid("--viewport must be greater than zero"));
    }
    let mut picker = open(&args.snapshot, config)?;
    if args.expand_all {
        picker.expand_all();
    }
    picker.rows_mut().scroll_to(args.scroll, args.viewport);
    write_window(out, &picker, args.viewport, options)
}

fn open(path: &Path, config: PickerConfig) -> Result<Picker> {
    let snapshot = load_snapshot(path)?;
    tracing::debug!(
        message = "cli.snapshot",
        path = %path.display(),
        workspaces = snapshot.workspaces.len(),
        records = snapshot.store.len(),
    );
    let mut picker = Picker::new(config);
    let connection_id = snapshot.connection_id().to_owned();
    picker.load(&connection_id, snapshot.store);
    Ok(picker)
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let wrap = |source: SnapshotError| CliError::Snapshot {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(|error| wrap(SnapshotError::Io(error)))?;
    snapshot::from_reader(BufReader::new(file)).map_err(wrap)
}

fn require_known(picker: &Picker, id: &str) -> Result<()> {
    if picker.store().get(id).is_some() {
        Ok(())
    } else {
        Err(CliError::UnknownId { id: id.to_owned() })
    }
}
