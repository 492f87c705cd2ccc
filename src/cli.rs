use clap::Parser;
use imagestore_common::ImageStatus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imagestore")]
#[command(author, version, about = "Local image store administration")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base directory for the database and image directories
    #[arg(long)]
    pub base_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Delete all image files and recreate an empty database
    #[arg(long)]
    pub reset: bool,

    /// Delete all image files, keep the database
    #[arg(long)]
    pub clean: bool,

    /// Add sample images from the example directory (all when omitted or 0)
    #[arg(short = 'a', long = "add_sample_data", value_name = "N", num_args = 0..=1, default_missing_value = "0")]
    pub add_sample_data: Option<usize>,

    /// Export the database schema (to the configured schema file by default)
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    pub schema: Option<Option<PathBuf>>,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Print stored records, optionally only those with STATUS
    #[arg(long, value_name = "STATUS", num_args = 0..=1)]
    pub list: Option<Option<ImageStatus>>,

    /// Report records whose file is missing or misnamed
    #[arg(long)]
    pub check: bool,
}
