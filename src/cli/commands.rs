//! Command dispatch: one function per subcommand

use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::Path;

use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::{pressure_plant, to_listing, IoResultExt, TagLoader};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, OutputFormat, Settings};
use crate::domain::LabelTree;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "settings loaded");

    match &cli.command {
        Some(Commands::Show { file, format }) => {
            show(&settings, file, format.unwrap_or(settings.output.format))
        }
        Some(Commands::Resolve { file, path, format }) => {
            resolve(&settings, file, path, format.unwrap_or(settings.output.format))
        }
        Some(Commands::Leaves { file }) => leaves(&settings, file),
        Some(Commands::Delete { file, paths }) => delete(&settings, file, paths),
        Some(Commands::Demo { format }) => demo(format.unwrap_or(settings.output.format)),
        Some(Commands::Config { command }) => config(cli, &settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

fn load(settings: &Settings, file: &Path) -> CliResult<LabelTree<String>> {
    Ok(TagLoader::new(settings.tree.options()).load_file(file)?)
}

fn print_tree<T: Debug + Serialize>(tree: &LabelTree<T>, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Tree => output::info(&tree.render().trim_end()),
        OutputFormat::Json => output::info(&tree.to_json()?),
    }
    Ok(())
}

#[instrument(skip(settings))]
fn show(settings: &Settings, file: &Path, format: OutputFormat) -> CliResult<()> {
    let tree = load(settings, file)?;
    print_tree(&tree, format)
}

#[instrument(skip(settings))]
fn resolve(settings: &Settings, file: &Path, path: &str, format: OutputFormat) -> CliResult<()> {
    let tree = load(settings, file)?;
    let node = tree
        .root_ref()
        .resolve_path(path)
        .ok_or_else(|| CliError::NotFound(path.to_string()))?;

    if format == OutputFormat::Json {
        output::info(&node.to_json()?);
        return Ok(());
    }
    output::action("path", path);
    output::action("id", &node.id());
    output::action("children", &node.child_count());
    if let Some(value) = node.data() {
        output::action("value", value);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn leaves(settings: &Settings, file: &Path) -> CliResult<()> {
    let tree = load(settings, file)?;
    for leaf in tree.leaf_paths() {
        output::info(&leaf);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn delete(settings: &Settings, file: &Path, paths: &[String]) -> CliResult<()> {
    let mut tree = load(settings, file)?;
    for path in paths {
        match tree.resolve_path(path) {
            Some(idx) if tree.destroy(idx) => debug!(path = %path, "removed"),
            Some(_) => output::warning(&format!("cannot remove the root: {}", path)),
            None => output::warning(&format!("not found: {}", path)),
        }
    }
    print!("{}", to_listing(&tree));
    Ok(())
}

#[instrument]
fn demo(format: OutputFormat) -> CliResult<()> {
    let mut tree = LabelTree::new();
    pressure_plant(&mut tree)?;
    print_tree(&tree, format)?;

    for path in ["/pressures/P42", "/not/existing/at/all"] {
        match tree.root_ref().resolve_path(path) {
            Some(node) => match node.data() {
                Some(value) => output::success(&format!("{} = {}", path, value)),
                None => output::success(&path),
            },
            None => output::failure(&format!("{} not found", path)),
        }
    }
    Ok(())
}

fn config(cli: &Cli, settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(p) => output::action("global", &p.display()),
                None => output::action("global", "unavailable"),
            }
            if let Some(local) = &cli.config {
                output::action("local", &local.display());
            }
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path()
                .ok_or_else(|| CliError::InvalidArgs("no config directory on this system".into()))?;
            if path.exists() && !force {
                return Err(CliError::InvalidArgs(format!(
                    "config already exists: {} (use --force)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).with_path_context("create config dir", dir)?;
            }
            fs::write(&path, Settings::template()).with_path_context("write config", &path)?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}
