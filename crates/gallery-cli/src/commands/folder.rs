//! Folder CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use gallery_client::GalleryApi;
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_core::types::FolderId;
use gallery_entity::folder::{Folder, FolderPath};
use gallery_entity::item::ItemRef;

use crate::output::{self, OutputFormat};

/// Arguments for folder commands
#[derive(Debug, Args)]
pub struct FolderArgs {
    /// Folder subcommand
    #[command(subcommand)]
    pub command: FolderCommand,
}

/// Folder subcommands
#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// List folders inside a folder (omit the parent for top-level folders)
    List {
        /// Parent folder ID
        #[arg(short, long)]
        parent_id: Option<String>,
    },
    /// Create a new folder
    Create {
        /// Folder name
        name: String,
        /// Parent folder ID (omit for root)
        #[arg(short, long)]
        parent_id: Option<String>,
    },
    /// Delete a folder
    Delete {
        /// Folder ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Move a folder under another one
    Move {
        /// Folder ID
        id: String,
        /// Destination folder ID (omit for root)
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Show the path from the top-level folder down to a folder
    Path {
        /// Folder ID
        id: String,
    },
}

/// Folder display row
#[derive(Debug, Serialize, Tabled)]
struct FolderRow {
    /// Folder ID
    id: String,
    /// Name
    name: String,
    /// Parent folder
    parent: String,
}

impl From<&Folder> for FolderRow {
    fn from(f: &Folder) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            parent: f
                .parent_id
                .as_ref()
                .map_or_else(|| "/".to_string(), |p| p.to_string()),
        }
    }
}

/// Execute folder commands
pub async fn execute(
    args: &FolderArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let client = super::connect(config).await?;

    match &args.command {
        FolderCommand::List { parent_id } => {
            let folders = client
                .list_folders(&super::scope_arg(parent_id.as_deref()))
                .await?;
            let rows: Vec<FolderRow> = folders.iter().map(FolderRow::from).collect();
            output::print_list(&rows, format, "No folders.");
        }
        FolderCommand::Create { name, parent_id } => {
            if name.trim().is_empty() {
                return Err(AppError::validation("Folder name is required"));
            }
            let created = client
                .create_folder(name.trim(), &super::scope_arg(parent_id.as_deref()))
                .await?;
            output::print_success(&format!(
                "Folder '{}' created (id: {})",
                name.trim(),
                created.folder_id
            ));
        }
        FolderCommand::Delete { id, yes } => {
            if !super::confirm(&format!("Delete folder {id}?"), *yes)? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            client
                .delete_item(&ItemRef::Folder(FolderId::new(id.as_str())))
                .await?;
            output::print_success(&format!("Folder {id} deleted"));
        }
        FolderCommand::Move { id, to } => {
            let destination = super::scope_arg(to.as_deref());
            client
                .move_item(&ItemRef::Folder(FolderId::new(id.as_str())), &destination)
                .await?;
            output::print_success(&format!("Folder {id} moved to {destination}"));
        }
        FolderCommand::Path { id } => {
            let crumbs = client.folder_breadcrumb(&FolderId::new(id.as_str())).await?;
            let path = FolderPath::from_crumbs(crumbs);
            match format {
                OutputFormat::Table => println!("{}", path.display()),
                OutputFormat::Json => output::print_item(&path, format),
            }
        }
    }

    Ok(())
}
