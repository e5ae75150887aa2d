//! Multi-file upload command.

use std::path::PathBuf;

use clap::Args;

use gallery_client::UploadQueue;
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the upload command
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Target folder ID (omit for root)
    #[arg(short, long)]
    pub folder_id: Option<String>,
}

/// Execute the upload command
pub async fn execute(
    args: &UploadArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::connect(config).await?;
    let destination = super::scope_arg(args.folder_id.as_deref());

    let mut queue = UploadQueue::new();
    queue.extend(&args.files);

    println!("Uploading {} file(s) to {}...", queue.len(), destination);
    let receipt = queue.submit(&client, &destination).await?;

    match format {
        OutputFormat::Table => {
            output::print_success(&receipt.message);
            for url in &receipt.urls {
                output::print_kv("url", url);
            }
        }
        OutputFormat::Json => output::print_item(&receipt, format),
    }
    Ok(())
}
