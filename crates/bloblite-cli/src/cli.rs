use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bloblite",
    about = "BlobLite: local blob storage emulator",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub resource: Resource,

    /// Storage root (defaults to $BLOBLITE_ROOT, then ~/.bloblite_storage)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Resource {
    /// Manage containers
    Container(ContainerArgs),
    /// Manage blobs inside containers
    Blob(BlobArgs),
}

#[derive(Args)]
pub struct ContainerArgs {
    #[command(subcommand)]
    pub action: ContainerAction,
}

#[derive(Subcommand)]
pub enum ContainerAction {
    /// Create a new container
    Create {
        /// Name of the container to create
        name: String,
    },
    /// List all containers
    List,
}

#[derive(Args)]
pub struct BlobArgs {
    #[command(subcommand)]
    pub action: BlobAction,
}

#[derive(Subcommand)]
pub enum BlobAction {
    /// Upload a file to a container
    Upload(UploadArgs),
    /// Download a blob from a container
    Download(DownloadArgs),
    /// List all blobs in a container
    List(ListArgs),
    /// Show blob metadata
    ShowMetadata(ShowMetadataArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    /// Target container name
    #[arg(long)]
    pub container: String,
    /// Path to local file
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct DownloadArgs {
    #[arg(long)]
    pub container: String,
    /// Blob name to download
    #[arg(long)]
    pub name: String,
    /// Destination folder or file path
    #[arg(long)]
    pub dest: PathBuf,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long)]
    pub container: String,
}

#[derive(Args)]
pub struct ShowMetadataArgs {
    #[arg(long)]
    pub container: String,
    #[arg(long)]
    pub name: String,
}
