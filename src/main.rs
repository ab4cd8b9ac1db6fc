/*!
Main binary for parentpath.
*/

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::Verbosity;
use memmap2::Mmap;
use std::io::stdout;
use std::io::{self};
use std::{
    fs::File,
    io::{IsTerminal, Read},
    path::PathBuf,
};

use parentpath::{
    JsonPath, NodeKind, Path, ReadError, commands, utils::write_colored_result,
};

/// Query a JSON document with a parent-aware path expression.
#[derive(Parser)]
#[command(
    name = "jpp",
    version,
    about,
    arg_required_else_help = true,
    long_about = None,
    disable_help_subcommand = true
)]
struct Args {
    /// Optional subcommands
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path expression (e.g., "$.*[@.name='Gig Harbor.*'].@parent")
    path: Option<String>,
    #[arg(value_name = "FILE")]
    /// Optional path to JSON file. If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// Fail unless the result is of this kind
    #[arg(long, value_enum)]
    kind: Option<KindArg>,
    /// Print every match of the last segment instead of the first
    #[arg(long, action = ArgAction::SetTrue)]
    all: bool,
    /// Do not pretty-print the JSON output, instead use compact
    #[arg(long, action = ArgAction::SetTrue)]
    compact: bool,
    /// Disable colored output
    #[arg(long, action = ArgAction::SetTrue)]
    no_color: bool,
    /// Display count of number of matches
    #[arg(long, action = ArgAction::SetTrue)]
    count: bool,
    /// Display depth of the input document
    #[arg(long, action = ArgAction::SetTrue)]
    depth: bool,
    #[command(flatten)]
    verbose: Verbosity,
}

/// Available subcommands for `jpp`
#[derive(Subcommand)]
enum Commands {
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate a man page for jpp to output directory if specified, else
    /// the current directory.
    Man {
        /// The output directory to write the man pages.
        #[clap(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Result kinds accepted by `--kind`.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl From<KindArg> for NodeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Object => Self::Object,
            KindArg::Array => Self::Array,
            KindArg::String => Self::String,
            KindArg::Number => Self::Number,
            KindArg::Boolean => Self::Boolean,
            KindArg::Null => Self::Null,
        }
    }
}

/// Input document text, memory-mapped from a file or buffered from STDIN.
enum Input {
    Mapped(Mmap),
    Buffered(String),
}

impl Input {
    fn text(&self) -> Result<&str> {
        match self {
            Self::Mapped(map) => std::str::from_utf8(map)
                .context("Input file is not valid UTF-8"),
            Self::Buffered(text) => Ok(text),
        }
    }
}

/// Entry point for main binary.
///
/// This parses the command line arguments and evaluates the path. If the
/// input is piped in, it reads from STDIN. The output is printed to STDOUT,
/// with formatting determined by the command line arguments.
fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    match args.command {
        Some(Commands::Generate(cmd)) => match cmd {
            GenerateCommand::Shell { shell } => {
                let mut cmd = Args::command();
                commands::generate::write_completions(
                    shell,
                    &mut cmd,
                    &mut stdout().lock(),
                );
            }
            GenerateCommand::Man { output_dir } => {
                let written = commands::generate::generate_man_pages(
                    &Args::command(),
                    output_dir,
                )?;
                for path in written {
                    println!("Generated: {}", path.display());
                }
            }
        },
        None => {
            // Parse path before touching the input
            let path: Path = args
                .path
                .as_deref()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Path expression required unless using subcommand"
                    )
                })?
                .parse()
                .with_context(|| "Failed to parse path")?;

            let input = if let Some(file) = &args.input {
                let handle = File::open(file).with_context(|| {
                    format!("Failed to read file {}", file.display())
                })?;
                // SAFETY: the mapping is only read, and lives until the
                // document built from it is dropped at the end of `main`
                let map = unsafe { Mmap::map(&handle) }.with_context(|| {
                    format!("Failed to map file {}", file.display())
                })?;
                Input::Mapped(map)
            } else {
                if io::stdin().is_terminal() {
                    // No piped input and no file specified
                    let mut cmd = Args::command();
                    return Ok(cmd.print_help()?);
                }
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                Input::Buffered(buffer)
            };

            let doc = JsonPath::parse_borrowed(input.text()?)
                .with_context(|| "Failed to parse JSON")?;

            let results = if args.all {
                doc.find_all_path(&path)
            } else {
                doc.find_path(&path).into_iter().collect()
            };
            log::info!("`{path}` matched {} value(s)", results.len());

            if let Some(kind) = args.kind.map(NodeKind::from)
                && let Some(other) = results.iter().find(|f| f.kind() != kind)
            {
                return Err(ReadError::TypeMismatch {
                    expected: kind.name(),
                    found: other.kind(),
                })
                .with_context(|| format!("Unexpected result for `{path}`"));
            }

            if args.count {
                println!("Found matches: {}", results.len());
            }

            if args.depth {
                println!("Depth: {}", parentpath::depth(doc.root()));
            }

            let mut out = stdout().lock();
            for found in &results {
                write_colored_result(&mut out, found, !args.compact)?;
            }
        }
    }

    Ok(())
}
