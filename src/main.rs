use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;

use crontask::config::{crontab_path, task_prefix, DEFAULT_CRONTAB};
use crontask::driver::{apply_file, unregister_all};
use crontask::scheduler::{Scheduler, Schtasks};

#[derive(Parser)]
#[command(
    name = "crontask",
    version,
    about = "Sets tasks to the Windows Task Scheduler from a text in crontab format"
)]
struct Cli {
    /// Path of your crontab file
    #[arg(long, env = "CRONTASK_FILE", global = true, value_name = "PATH")]
    crontab: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace your crontab with FILE (or stdin when FILE is -) and register it
    Set {
        #[arg(value_name = "FILE")]
        file: String,
    },
    /// Register the tasks in your crontab at the Task Scheduler
    Reg,
    /// Unregister your tasks from the Task Scheduler
    Unreg,
    /// Edit your crontab, then re-register it
    #[command(alias = "e")]
    Edit {
        /// Editor to use, overriding VISUAL and EDITOR
        #[arg(short = 'w', long = "with", value_name = "COMMAND")]
        editor: Option<String>,
    },
    /// List your registered task names
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let path = crontab_path(cli.crontab);
    let scheduler = Schtasks;

    match cli.command {
        Commands::Set { file } => {
            let text = read_source(&file).await?;
            if text.is_empty() {
                return Ok(());
            }
            write_crontab(&path, &text).await?;
            reapply(&scheduler, &path).await?;
        }
        Commands::Reg => {
            reapply(&scheduler, &path).await?;
        }
        Commands::Unreg => {
            unregister_all(&scheduler, &task_prefix()).await?;
            println!("crontask unregistered all your tasks from the Task Scheduler");
        }
        Commands::Edit { editor } => {
            if !tokio::fs::try_exists(&path).await? {
                write_crontab(&path, DEFAULT_CRONTAB).await?;
            }
            edit_crontab(&path, editor).await?;
            reapply(&scheduler, &path).await?;
        }
        Commands::List { json } => {
            let names = scheduler.list(&task_prefix()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
    }
    Ok(())
}

async fn read_source(file: &str) -> Result<String> {
    if file == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read {file}"))
    }
}

async fn write_crontab(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

async fn reapply(scheduler: &impl Scheduler, path: &Path) -> Result<()> {
    apply_file(scheduler, path, &task_prefix())
        .await
        .with_context(|| format!("failed to apply {}", path.display()))?;
    println!("crontask registered your tasks at the Task Scheduler");
    Ok(())
}

/// Open the crontab in an editor: `--with` flag, else `$VISUAL`, else
/// `$EDITOR`, else notepad.
async fn edit_crontab(path: &Path, flag: Option<String>) -> Result<()> {
    let editor = flag
        .or_else(|| std::env::var("VISUAL").ok().filter(|v| !v.is_empty()))
        .or_else(|| std::env::var("EDITOR").ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "notepad".to_string());

    let mut parts = editor.split_whitespace();
    let program = parts.next().context("empty editor command")?;
    let status = tokio::process::Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .await
        .with_context(|| format!("failed to launch {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}
