use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use patchrelay_core::{ReportFormat, RunContext, create_sink, dispatch};
use patchrelay_types::{CHANGESET_SCHEMA_V1, ChangeSet, ToolMeta};

#[derive(Parser)]
#[command(name = "patchrelay")]
#[command(about = "Translate change sets from a source transformation run", long_about = None)]
struct Cli {
    /// Enable verbose (info-level) logging to stderr.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Enable debug-level logging to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a change-set document into a report.
    Translate(TranslateArgs),

    /// Print the change-set JSON Schema.
    Schema(SchemaArgs),
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Path to the change-set JSON document, or '-' for stdin.
    #[arg(long, short = 'i', value_name = "PATH")]
    input: PathBuf,

    /// Report format to produce.
    #[arg(long, value_enum, default_value_t = FormatArg::Sarif)]
    format: FormatArg,

    /// Directory for the report file when --out is not given.
    #[arg(long, value_name = "DIR", default_value = "reports/patchrelay")]
    report_dir: PathBuf,

    /// Where to write the report, overriding the per-format default.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SchemaArgs {
    /// Pretty-print the schema JSON.
    #[arg(long)]
    pretty: bool,
}

/// Report format selector for the translate command.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Sarif,
    Patch,
    Log,
}

impl From<FormatArg> for ReportFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Sarif => ReportFormat::Sarif,
            FormatArg::Patch => ReportFormat::Patch,
            FormatArg::Log => ReportFormat::Log,
        }
    }
}

#[cfg(not(test))]
fn main() -> std::process::ExitCode {
    match run_with_args(std::env::args_os()) {
        Ok(code) => std::process::ExitCode::from(code as u8),
        Err(err) => {
            eprintln!("{err:?}");
            std::process::ExitCode::from(1)
        }
    }
}

fn run_with_args<I, T>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);

    init_logging(cli.verbose, cli.debug);

    match cli.command {
        Commands::Translate(args) => {
            cmd_translate(args)?;
            Ok(0)
        }
        Commands::Schema(args) => {
            cmd_schema(args)?;
            Ok(0)
        }
    }
}

/// Initialize tracing/logging based on CLI flags.
fn init_logging(verbose: bool, debug: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    debug!("Logging initialized at level: {}", level);
}

fn cmd_translate(args: TranslateArgs) -> Result<()> {
    let set = read_change_set(&args.input)?;
    let format = ReportFormat::from(args.format);

    info!("translating {} change(s) to {} format", set.changes.len(), format.as_str());

    let ctx = RunContext {
        tool: set.tool.unwrap_or_else(default_tool),
        rules: set.rules,
        provenance: set.provenance,
    };

    let mut sink = create_sink(format, &args.report_dir, args.out.as_deref(), ctx)?;

    sink.open().context("open report sink")?;
    for change in &set.changes {
        dispatch(&mut *sink, change)?;
    }
    sink.close().context("close report sink")?;

    Ok(())
}

fn default_tool() -> ToolMeta {
    ToolMeta {
        name: "patchrelay".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Reads and validates the change-set document from a file or stdin.
fn read_change_set(input: &Path) -> Result<ChangeSet> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read change set from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("read change set {}", input.display()))?
    };

    let set: ChangeSet = serde_json::from_str(&text)
        .with_context(|| format!("parse change set {}", input.display()))?;

    if set.schema != CHANGESET_SCHEMA_V1 {
        bail!(
            "unsupported change set schema '{}'; expected '{}'",
            set.schema,
            CHANGESET_SCHEMA_V1
        );
    }

    Ok(set)
}

fn cmd_schema(args: SchemaArgs) -> Result<()> {
    let schema = schemars::schema_for!(ChangeSet);
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&schema).context("render schema")?
    } else {
        serde_json::to_string(&schema).context("render schema")?
    };
    println!("{rendered}");
    Ok(())
}
