//! phabstack CLI entry point.
//!
//! Resolves a Phabricator diff into an ordered patch stack and prepares a
//! local working copy for it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use phabstack::application::stack::{TargetRef, apply_stack, build_stack, resolve_target};
use phabstack::domain::{BaseFallback, PatchStack, RevisionRecord};
use phabstack::infra::app_config::{self, AppConfig};
use phabstack::infra::conduit::{Conduit, ConduitClient, RevisionQuery};
use phabstack::infra::vcs::GitWorkingCopy;

#[derive(Parser, Debug)]
#[command(name = "phabstack")]
#[command(version)]
#[command(about = "Check out a Phabricator diff with its whole dependency stack", long_about = None)]
struct Args {
    /// Config file (defaults to $PHABSTACK_CONFIG_PATH or the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the account the API token belongs to
    Whoami,

    /// Build the patch stack of a diff and check the repository out at its base
    Stack {
        /// Diff PHID, numeric diff id or revision (D1234)
        #[arg(short, long)]
        diff: String,

        /// Path to the working copy
        #[arg(short, long, default_value = ".")]
        repo: PathBuf,

        /// Revision used when the stack has no usable base
        #[arg(long)]
        default_revision: Option<String>,

        /// Apply the patches after checkout
        #[arg(long)]
        apply: bool,

        /// Write each patch to this directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Tell whether a revision has landed on canonical history
    Canonical {
        /// Revision hash
        revision: String,
    },

    /// Print the effective configuration
    Config {
        /// Write the effective configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(app_config::config_path);
    let config = app_config::load_config_from(&config_path);

    match args.command {
        Commands::Whoami => {
            let mut client = ConduitClient::from_config(&config)?;
            let user = client.authenticate()?;
            println!("{} ({}) {}", user.real_name, user.user_name, user.phid);
        }
        Commands::Stack {
            diff,
            repo,
            default_revision,
            apply,
            output,
        } => {
            let default_revision = default_revision.unwrap_or_else(|| config.default_revision.clone());
            let (revision, stack) = run_stack(&config, &diff, &repo, &default_revision, apply)?;
            print_stack(&revision, &stack);
            if let Some(dir) = output {
                write_patches(&stack, &dir)?;
            }
        }
        Commands::Canonical { revision } => {
            let client = ConduitClient::from_config(&config)?;
            let exists = client.revision_exists_on_canonical(&revision)?;
            println!("{revision}: {}", if exists { "landed" } else { "not found" });
        }
        Commands::Config { init } => {
            let mut shown = config.clone();
            if shown.api_token.is_some() {
                shown.api_token = Some("<redacted>".to_string());
            }
            println!("# {}", config_path.display());
            print!("{}", toml::to_string_pretty(&shown)?);
            if init {
                app_config::save_config_to(&config, &config_path)
                    .with_context(|| format!("write {}", config_path.display()))?;
            }
        }
    }

    Ok(())
}

fn run_stack(
    config: &AppConfig,
    diff: &str,
    repo: &Path,
    default_revision: &str,
    apply: bool,
) -> Result<(RevisionRecord, PatchStack)> {
    let target = TargetRef::parse(diff)?;
    let working_copy = GitWorkingCopy::open(repo)?;

    let mut client = ConduitClient::from_config(config)?;
    client.authenticate()?;

    let target = resolve_target(&client, &target)?;
    let revision = client.load_revision(&RevisionQuery::Phid(target.revision_phid.clone()))?;
    let stack = build_stack(&client, &working_copy, &target, default_revision)?;

    if apply {
        apply_stack(&working_copy, &stack)?;
    }
    Ok((revision, stack))
}

fn print_stack(revision: &RevisionRecord, stack: &PatchStack) {
    println!("D{} {}", revision.id, revision.title);
    match &stack.base_fallback {
        None => println!("base: {}", stack.base),
        Some(BaseFallback::Missing) => println!("base: {} (no base declared)", stack.base),
        Some(BaseFallback::Unavailable { declared }) => {
            println!("base: {} ({declared} not available locally)", stack.base)
        }
    }
    println!(
        "working copy: {} {}",
        stack.working_copy.node, stack.working_copy.summary
    );
    for (index, entry) in stack.entries.iter().enumerate() {
        println!(
            "{:>2}. diff {} {} ({} bytes)",
            index + 1,
            entry.diff_id,
            entry.diff_phid,
            entry.patch.len()
        );
    }
}

fn write_patches(stack: &PatchStack, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    for (index, entry) in stack.entries.iter().enumerate() {
        let path = dir.join(format!("{:02}-diff{}.patch", index + 1, entry.diff_id));
        std::fs::write(&path, &entry.patch)
            .with_context(|| format!("write {}", path.display()))?;
    }
    Ok(())
}
