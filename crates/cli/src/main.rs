// querypad CLI - headless completion, command palette and recent documents
// All output is JSON on stdout; diagnostics go to stderr.

mod domain_args;
mod exit_codes;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use querypad_config::platform::{self, PlatformIntegration};
use querypad_config::recent::{last_folder, set_last_folder};
use querypad_config::{config_dir, JsonFileStore, RecentDocuments, Settings, SnippetLibrary, Strings};
use querypad_core::TaskQueue;
use querypad_engine::{
    Action, ActionCommandSource, CommandAggregator, CommandContext, CommandPalette, CompletionEngine,
    DocumentEditor, DocumentMode, DomainSnapshot, Perform, RecentDocumentsCommandSource, ServerInfo,
    SnippetCommandSource, TableInfo, TextDocument,
};

use domain_args::{parse_server, parse_table};
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "qpad")]
#[command(about = "Headless query-notebook completion and command palette")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Settings file [default: ~/.config/querypad/settings.json]
    #[arg(long, global = true, env = "QPAD_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which completion trigger applies at a caret position
    #[command(after_help = "\
Examples:
  qpad classify report.md --offset 120
  qpad classify trades.sql")]
    Classify {
        file: PathBuf,

        /// Caret position in characters [default: end of file]
        #[arg(long)]
        offset: Option<usize>,

        /// Document mode (markup, query, unknown) [default: from extension]
        #[arg(long)]
        mode: Option<DocumentMode>,
    },

    /// List completion candidates at a caret position
    #[command(after_help = "\
Examples:
  qpad complete q.sql --table trades --table quotes
  qpad complete report.md --table 'trades=select from trades' --selected-server prod
  qpad complete report.md --server prod:kdb --server warehouse:postgres")]
    Complete {
        file: PathBuf,

        #[arg(long)]
        offset: Option<usize>,

        #[arg(long)]
        mode: Option<DocumentMode>,

        /// Known table, optionally with an example query
        #[arg(long = "table", value_name = "NAME[=QUERY]", value_parser = parse_table)]
        tables: Vec<TableInfo>,

        /// Known server, optionally with its driver
        #[arg(long = "server", value_name = "NAME[:DRIVER]", value_parser = parse_server)]
        servers: Vec<ServerInfo>,

        /// Server used in generated code blocks [default: editor.defaultServer]
        #[arg(long)]
        selected_server: Option<String>,
    },

    /// List palette commands, optionally filtered, or run the first match
    Commands {
        /// Case-insensitive filter on command titles
        #[arg(long, short = 'q')]
        query: Option<String>,

        /// Snippet library [default: editor.snippetsFile]
        #[arg(long, value_name = "FILE")]
        snippets: Option<PathBuf>,

        /// Preference store holding recent documents
        #[arg(long, value_name = "FILE")]
        store: Option<PathBuf>,

        /// Run the highlighted command instead of listing
        #[arg(long)]
        run: bool,
    },

    /// Inspect or edit the recent documents list
    Recent {
        #[command(subcommand)]
        action: RecentCommands,

        /// Preference store [default: ~/.config/querypad/prefs.json]
        #[arg(long, global = true, value_name = "FILE")]
        store: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum RecentCommands {
    /// Show recent documents and the last-used folder
    List,
    /// Record a document as just opened
    Add { path: PathBuf },
    /// Forget every recent document
    Clear,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("QPAD_COMMIT"), ")",
        "\ntarget:  ", env!("QPAD_TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };

    let result = match cli.command {
        Commands::Classify { file, offset, mode } => cmd_classify(&file, offset, mode),
        Commands::Complete {
            file,
            offset,
            mode,
            tables,
            servers,
            selected_server,
        } => {
            let mut domain = DomainSnapshot::new();
            domain.tables = tables;
            domain.servers = servers;
            domain.selected_server = selected_server.or_else(|| settings.default_server.clone());
            cmd_complete(&file, offset, mode, &domain)
        }
        Commands::Commands { query, snippets, store, run } => {
            cmd_commands(&settings, query.as_deref(), snippets, store, run)
        }
        Commands::Recent { action, store } => cmd_recent(&settings, action, store),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            eprintln!("error: {}", message);
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let out = serde_json::to_string_pretty(value).map_err(|e| CliError::io(e.to_string()))?;
    println!("{}", out);
    Ok(())
}

/// Read `file` into a document with the caret at `offset` (or the end).
fn open_document(file: &Path, offset: Option<usize>, mode: Option<DocumentMode>) -> Result<TextDocument, CliError> {
    let text = fs::read_to_string(file)
        .map_err(|e| CliError::io(format!("{}: {}", file.display(), e)))?;
    let mode = mode.unwrap_or_else(|| DocumentMode::from_path(file));
    let mut doc = TextDocument::new(text, mode);
    if let Some(offset) = offset {
        let len = doc.text().chars().count();
        if offset > len {
            return Err(CliError::args(format!("--offset {} is past the end of {} ({} chars)", offset, file.display(), len))
                .with_hint("offsets count characters, not bytes"));
        }
        doc.set_caret(offset);
    }
    Ok(doc)
}

// ============================================================================
// classify / complete
// ============================================================================

fn cmd_classify(file: &Path, offset: Option<usize>, mode: Option<DocumentMode>) -> Result<(), CliError> {
    let doc = open_document(file, offset, mode)?;
    let context = querypad_engine::classify(doc.text(), doc.caret_offset(), doc.mode());
    print_json(&json!({
        "mode": doc.mode().name(),
        "offset": doc.caret_offset(),
        "trigger": context.trigger().map(|t| t.name()),
        "prefix": context.prefix(),
    }))
}

fn cmd_complete(
    file: &Path,
    offset: Option<usize>,
    mode: Option<DocumentMode>,
    domain: &DomainSnapshot,
) -> Result<(), CliError> {
    let doc = open_document(file, offset, mode)?;
    let strings = load_strings();
    let engine = CompletionEngine::with_defaults(&strings);
    let result = engine.complete(doc.text(), doc.caret_offset(), doc.mode(), Some(domain));

    let items: Vec<Value> = result
        .candidates
        .iter()
        .map(|c| {
            json!({
                "label": c.display_label,
                "insert": c.insertion_text,
                "icon": c.icon.as_ref().map(|i| i.key()),
            })
        })
        .collect();
    print_json(&Value::Array(items))
}

// ============================================================================
// commands
// ============================================================================

fn load_strings() -> Strings {
    Strings::load(&config_dir().join("strings.toml"))
}

fn open_store(store: Option<PathBuf>) -> JsonFileStore {
    match store {
        Some(path) => JsonFileStore::open(path),
        None => JsonFileStore::open_default(),
    }
}

/// What `--run` observed from the command's side effect.
#[derive(Default)]
struct RunEffects {
    inserted: Option<String>,
    opened: Option<PathBuf>,
}

fn cmd_commands(
    settings: &Settings,
    query: Option<&str>,
    snippets: Option<PathBuf>,
    store: Option<PathBuf>,
    run: bool,
) -> Result<(), CliError> {
    let strings = load_strings();
    let platform = platform::detect(settings.modifier_style);
    let mut store = open_store(store);
    let mut recent = RecentDocuments::load(&store, settings.recent_capacity);

    let library = match snippets {
        Some(path) => SnippetLibrary::try_load(&path).map_err(|e| CliError::io(e.to_string()))?,
        None => SnippetLibrary::load(&settings.snippets_path()),
    };

    let effects = Arc::new(Mutex::new(RunEffects::default()));
    let clear_requested = Arc::new(AtomicBool::new(false));

    let mut actions = ActionCommandSource::new();
    actions.register(
        Action::new("palette.show", "Show All Commands", Perform::noop())
            .with_keystroke(platform.primary_shift("p")),
    );
    let flag = Arc::clone(&clear_requested);
    actions.register(Action::new(
        "recent.clear",
        "Clear Recent Documents",
        Perform::new(move || flag.store(true, Ordering::SeqCst)),
    ));
    actions.set_enabled("recent.clear", !recent.is_empty());

    let sink_effects = Arc::clone(&effects);
    let open_effects = Arc::clone(&effects);
    let mut aggregator = CommandAggregator::new();
    aggregator.register(Box::new(actions));
    aggregator.register(Box::new(SnippetCommandSource::new(
        library,
        Arc::new(move |text: &str| {
            if let Ok(mut e) = sink_effects.lock() {
                e.inserted = Some(text.to_string());
            }
        }),
    )));
    aggregator.register(Box::new(RecentDocumentsCommandSource::from_recent(
        &recent,
        Arc::new(move |path: &Path| {
            if let Ok(mut e) = open_effects.lock() {
                e.opened = Some(path.to_path_buf());
            }
        }),
    )));

    let mut palette = CommandPalette::from_settings(aggregator, settings);
    let ctx = CommandContext::new(&strings, platform.as_ref(), DocumentMode::Unknown);
    palette.open(&ctx);
    if let Some(q) = query {
        palette.set_query(q);
    }

    if !run {
        return print_json(&list_commands(&palette, platform.as_ref()));
    }

    let queue = TaskQueue::new();
    let Some(chosen) = palette.commit(&queue) else {
        return Err(CliError::args("no command matches").with_hint("run without --run to see available commands"));
    };
    queue.run_pending();

    let effects = effects.lock().map_err(|_| CliError::io("command panicked"))?;
    if let Some(path) = &effects.opened {
        recent.record(path.clone(), &mut store);
    }
    if clear_requested.load(Ordering::SeqCst) {
        recent.clear(&mut store);
    }
    print_json(&json!({
        "ran": chosen.title,
        "inserted": effects.inserted,
        "opened": effects.opened.as_ref().map(|p| p.display().to_string()),
    }))
}

fn list_commands(palette: &CommandPalette, platform: &dyn PlatformIntegration) -> Value {
    Value::Array(
        palette
            .results()
            .iter()
            .map(|cmd| {
                json!({
                    "title": cmd.title,
                    "detail": cmd.detail_or_keystroke(platform),
                    "keystroke": cmd.keystroke.as_ref().map(|k| k.to_string()),
                    "icon": cmd.icon.as_ref().map(|i| i.key()),
                })
            })
            .collect(),
    )
}

// ============================================================================
// recent
// ============================================================================

fn cmd_recent(settings: &Settings, action: RecentCommands, store: Option<PathBuf>) -> Result<(), CliError> {
    let mut store = open_store(store);
    let mut recent = RecentDocuments::load(&store, settings.recent_capacity);

    match action {
        RecentCommands::List => {}
        RecentCommands::Add { path } => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                set_last_folder(&mut store, parent);
            }
            recent.record(path, &mut store);
        }
        RecentCommands::Clear => recent.clear(&mut store),
    }

    let documents: Vec<String> = recent.paths().iter().map(|p| p.display().to_string()).collect();
    print_json(&json!({
        "documents": documents,
        "lastFolder": last_folder(&store).map(|p| p.display().to_string()),
    }))
}
