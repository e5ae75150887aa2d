//! Image CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gallery_client::GalleryApi;
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_core::types::ImageId;
use gallery_entity::image::Image;
use gallery_entity::item::ItemRef;

use crate::output::{self, OutputFormat};

/// Arguments for image commands
#[derive(Debug, Args)]
pub struct ImageArgs {
    /// Image subcommand
    #[command(subcommand)]
    pub command: ImageCommand,
}

/// Image subcommands
#[derive(Debug, Subcommand)]
pub enum ImageCommand {
    /// List images inside a folder (omit the folder for the root)
    List {
        /// Folder ID
        #[arg(short, long)]
        folder_id: Option<String>,
    },
    /// Delete an image
    Delete {
        /// Image ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move an image into another folder
    Move {
        /// Image ID
        id: String,
        /// Destination folder ID (omit for root)
        #[arg(short, long)]
        to: Option<String>,
    },
}

/// Image display row
#[derive(Debug, Serialize, Tabled)]
struct ImageRow {
    /// Image ID
    id: String,
    /// File name
    filename: String,
    /// Uploaded at
    uploaded: String,
    /// URL
    url: String,
}

impl From<&Image> for ImageRow {
    fn from(i: &Image) -> Self {
        Self {
            id: i.id.to_string(),
            filename: i.filename.clone(),
            uploaded: i.uploaded_label(),
            url: i.url.clone(),
        }
    }
}

/// Execute image commands
pub async fn execute(
    args: &ImageArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::connect(config).await?;

    match &args.command {
        ImageCommand::List { folder_id } => {
            let images = client
                .list_images(&super::scope_arg(folder_id.as_deref()))
                .await?;
            let rows: Vec<ImageRow> = images.iter().map(ImageRow::from).collect();
            output::print_list(&rows, format, "No images.");
        }
        ImageCommand::Delete { id, yes } => {
            if !super::confirm(&format!("Delete image {id}?"), *yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            client
                .delete_item(&ItemRef::Image(ImageId::new(id.as_str())))
                .await?;
            output::print_success(&format!("Image {id} deleted"));
        }
        ImageCommand::Move { id, to } => {
            let destination = super::scope_arg(to.as_deref());
            client
                .move_item(&ItemRef::Image(ImageId::new(id.as_str())), &destination)
                .await?;
            output::print_success(&format!("Image {id} moved to {destination}"));
        }
    }

    Ok(())
}
