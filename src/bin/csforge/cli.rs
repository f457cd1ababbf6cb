//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// csforge - compile a single C# source file into a Windows executable
#[derive(Parser)]
#[command(name = "csforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress status output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: String,

    /// Output format: human or json
    #[arg(long, global = true, default_value = "human")]
    pub message_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a C# source file into an executable
    Build(BuildArgs),

    /// Check backend and provisioning tool availability
    Doctor,

    /// Install the dotnet SDK (winget, falling back to the installer script)
    Install(InstallArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// C# source file (.cs)
    pub source: PathBuf,

    /// Output executable path (defaults to the source path with .exe)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Backend to use: auto, csc, dotnet
    #[arg(long)]
    pub backend: Option<String>,

    /// Executable kind: console or windowed (defaults to windowed for
    /// WinForms/WPF sources)
    #[arg(long)]
    pub target_kind: Option<String>,

    /// Publish a self-contained executable (dotnet backend)
    #[arg(long)]
    pub self_contained: Option<bool>,

    /// Publish a single-file executable (dotnet backend)
    #[arg(long)]
    pub single_file: Option<bool>,

    /// Never attempt SDK provisioning
    #[arg(long)]
    pub offline: bool,
}

#[derive(Args)]
pub struct InstallArgs {
    /// Release channel for the scripted installer (e.g. LTS, STS)
    #[arg(long)]
    pub channel: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
