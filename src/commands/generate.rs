//! `generate` subcommand: man pages and shell completions.
use anyhow::{Context, Result};
use clap_complete::Shell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes completions for `shell` to `writer`.
pub fn write_completions<W: Write>(
    shell: Shell,
    cmd: &mut clap::Command,
    writer: &mut W,
) {
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, cmd, name, writer);
}

/// Renders the man page of `cmd` and of every nested subcommand into
/// `output_dir` (the current directory if `None`). Returns the written paths.
///
/// # Errors
///
/// Returns an error if the output directory or a man page file can not be
/// written.
pub fn generate_man_pages(
    cmd: &clap::Command,
    output_dir: Option<PathBuf>,
) -> Result<Vec<PathBuf>> {
    let output_dir = match output_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Opening current directory")?,
    };
    std::fs::create_dir_all(&output_dir)
        .context("create output Man directories")?;

    let mut written = vec![render_man_page(cmd.clone(), &output_dir)?];
    collect_subcommand_pages(cmd, &output_dir, cmd.get_name(), &mut written)?;
    Ok(written)
}

/// Renders a single command's page to `<output_dir>/<name>.1`.
fn render_man_page(cmd: clap::Command, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(format!("{}.1", cmd.get_name()));
    let mut file = File::create(&path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    clap_mangen::Man::new(cmd)
        .render(&mut file)
        .with_context(|| format!("failed to render {}", path.display()))?;
    log::info!("generated {}", path.display());
    Ok(path)
}

/// Renders subcommand pages recursively, named `<prefix>-<subcommand>`.
fn collect_subcommand_pages(
    cmd: &clap::Command,
    output_dir: &Path,
    prefix: &str,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    for subcmd in cmd.get_subcommands() {
        let prefixed = format!("{prefix}-{}", subcmd.get_name());
        // clap_mangen takes the page name from the command itself, which
        // needs a `'static` name; generation runs once per process
        let name: &'static str = Box::leak(prefixed.clone().into_boxed_str());
        let renamed = subcmd.clone().name(name).disable_help_subcommand(true);
        written.push(render_man_page(renamed, output_dir)?);
        collect_subcommand_pages(subcmd, output_dir, &prefixed, written)?;
    }
    Ok(())
}
