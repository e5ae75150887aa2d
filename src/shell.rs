//! Line-oriented shell driving the browser model.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use gallery_browser::{BrowserModel, BrowserPhase, Confirm, DeleteOutcome};
use gallery_cli::output::{print_error, print_kv, print_success, print_warning};
use gallery_client::UploadQueue;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::types::{FolderId, Scope};
use gallery_entity::item::{ClipboardMode, ItemKind};

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    ChangeDir(Target),
    Pwd,
    MakeDir(String),
    Select { kind: Option<ItemKind>, id: String },
    Remove,
    Copy,
    Cut,
    Paste,
    Add(Vec<String>),
    Unqueue(usize),
    Queue,
    Upload,
    Refresh,
    Status,
    Help,
    Quit,
}

/// Argument of `cd`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Root,
    Up,
    Folder(FolderId),
}

const HELP: &str = "\
Commands:
  ls                      list folders and images here
  cd <id|..|/>            enter a folder, go up, or go to the root
  pwd                     show the breadcrumb
  mkdir <name>            create a folder here
  select [folder|image] <id>
                          select an entry in view
  rm                      delete the selection (asks first)
  copy | cut              put the selection on the clipboard
  paste                   paste the clipboard here
  add <path>...           queue files for upload
  unqueue <n>             drop queued file number n
  queue                   show queued files
  upload                  upload queued files here
  refresh                 reload this folder
  status                  show selection, clipboard and queue
  help                    this text
  quit                    leave";

impl ShellCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();

        let command = match head {
            "ls" => Self::List,
            "cd" => match rest.as_slice() {
                [] | ["/"] => Self::ChangeDir(Target::Root),
                [".."] => Self::ChangeDir(Target::Up),
                [id] => Self::ChangeDir(Target::Folder(FolderId::new(*id))),
                _ => return Err(usage("cd <id|..|/>")),
            },
            "pwd" => Self::Pwd,
            "mkdir" => Self::MakeDir(rest.join(" ")),
            "select" => match rest.as_slice() {
                [id] => Self::Select {
                    kind: None,
                    id: id.to_string(),
                },
                [kind, id] => Self::Select {
                    kind: Some(kind.parse().map_err(|_| usage("select [folder|image] <id>"))?),
                    id: id.to_string(),
                },
                _ => return Err(usage("select [folder|image] <id>")),
            },
            "rm" => Self::Remove,
            "copy" => Self::Copy,
            "cut" => Self::Cut,
            "paste" => Self::Paste,
            "add" if rest.is_empty() => return Err(usage("add <path>...")),
            "add" => Self::Add(rest.iter().map(|s| s.to_string()).collect()),
            "unqueue" => match rest.as_slice() {
                [n] => Self::Unqueue(n.parse().map_err(|_| usage("unqueue <n>"))?),
                _ => return Err(usage("unqueue <n>")),
            },
            "queue" => Self::Queue,
            "upload" => Self::Upload,
            "refresh" => Self::Refresh,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(AppError::validation(format!(
                    "Unknown command '{other}' (try 'help')"
                )));
            }
        };
        Ok(Some(command))
    }
}

fn usage(text: &str) -> AppError {
    AppError::validation(format!("Usage: {text}"))
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive session state: the browser plus the pending upload queue.
pub struct Shell {
    browser: BrowserModel,
    queue: UploadQueue,
    confirm: Box<dyn Confirm + Send + Sync>,
}

impl Shell {
    pub fn new(browser: BrowserModel, confirm: Box<dyn Confirm + Send + Sync>) -> Self {
        Self {
            browser,
            queue: UploadQueue::new(),
            confirm,
        }
    }

    #[cfg(test)]
    pub fn browser(&self) -> &BrowserModel {
        &self.browser
    }

    #[cfg(test)]
    pub fn queue(&self) -> &UploadQueue {
        &self.queue
    }

    /// Read commands until `quit` or end of input. Command failures are
    /// printed and the loop continues.
    pub async fn run<R>(&mut self, input: R) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        if let Err(e) = self.browser.navigate_to(Scope::Root).await {
            report(&e);
        }

        let mut lines = input.lines();
        loop {
            prompt(&self.browser.path().display());
            let Some(line) = lines.next_line().await? else {
                break;
            };
            match ShellCommand::parse(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => match self.execute(command).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => report(&e),
                },
                Err(e) => report(&e),
            }
        }
        Ok(())
    }

    /// Run one command against the browser.
    pub async fn execute(&mut self, command: ShellCommand) -> AppResult<Flow> {
        debug!(?command, "Shell command");
        let mutating = matches!(
            command,
            ShellCommand::MakeDir(_)
                | ShellCommand::Remove
                | ShellCommand::Paste
                | ShellCommand::Upload
        );
        match command {
            ShellCommand::List => self.list(),
            ShellCommand::ChangeDir(target) => {
                match target {
                    Target::Root => self.browser.navigate_to(Scope::Root).await?,
                    Target::Up => self.browser.navigate_up().await?,
                    Target::Folder(id) => self.browser.navigate_to(id).await?,
                };
                println!("{}", self.browser.path().display());
            }
            ShellCommand::Pwd => {
                let path = self.browser.path();
                println!("{}", path.display());
                if path.is_truncated() {
                    println!("(some parent folders are unknown)");
                }
            }
            ShellCommand::MakeDir(name) => match self.browser.create_folder(&name).await? {
                Some(id) => {
                    print_success(&format!("Folder '{}' created (id: {id})", name.trim()))
                }
                None => print_warning("Folder name is empty; nothing created"),
            },
            ShellCommand::Select { kind, id } => self.select(kind, &id)?,
            ShellCommand::Remove => match self.browser.delete(self.confirm.as_ref()).await? {
                DeleteOutcome::Deleted(selection) => {
                    print_success(&format!("Deleted {} '{}'", selection.kind(), selection.name))
                }
                DeleteOutcome::Cancelled => print_warning("Delete cancelled"),
                DeleteOutcome::NothingSelected => print_warning("Nothing selected"),
            },
            ShellCommand::Copy => match self.browser.copy() {
                Some(clip) => print_success(&format!("Copied '{}'", clip.name)),
                None => print_warning("Nothing selected"),
            },
            ShellCommand::Cut => match self.browser.cut() {
                Some(clip) => print_success(&format!("Cut '{}'", clip.name)),
                None => print_warning("Nothing selected"),
            },
            ShellCommand::Paste => match self.browser.paste().await? {
                Some(receipt) => {
                    let verb = match receipt.mode {
                        ClipboardMode::Cut => "Moved",
                        ClipboardMode::Copy => "Copied",
                    };
                    print_success(&format!(
                        "{verb} {} into {}",
                        receipt.item, receipt.destination
                    ));
                }
                None => print_warning("Clipboard is empty"),
            },
            ShellCommand::Add(paths) => {
                for path in &paths {
                    let file = self.queue.add(path);
                    println!("  + {}", file.name);
                }
                print_success(&format!("{} file(s) queued", self.queue.len()));
            }
            ShellCommand::Unqueue(n) => {
                match n.checked_sub(1).and_then(|i| self.queue.remove(i)) {
                    Some(file) => {
                        print_success(&format!("Removed '{}' from the queue", file.name))
                    }
                    None => return Err(AppError::validation(format!("No queued file #{n}"))),
                }
            }
            ShellCommand::Queue => self.print_queue(),
            ShellCommand::Upload => {
                let receipt = self.browser.upload(&mut self.queue).await?;
                print_success(&receipt.message);
                for url in &receipt.urls {
                    println!("  {url}");
                }
            }
            ShellCommand::Refresh => {
                self.browser.refresh().await?;
                self.list();
            }
            ShellCommand::Status => self.status(),
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        if mutating && self.browser.is_stale() {
            print_warning("Change saved, but the listing could not be reloaded; run `refresh`");
        }
        Ok(Flow::Continue)
    }

    fn select(&mut self, kind: Option<ItemKind>, id: &str) -> AppResult<()> {
        let kind = match kind {
            Some(kind) => kind,
            None => {
                let folder = self.browser.folders().iter().any(|f| f.id.as_str() == id);
                let image = self.browser.images().iter().any(|i| i.id.as_str() == id);
                match (folder, image) {
                    (true, true) => {
                        return Err(AppError::validation(format!(
                            "Both a folder and an image have id {id}; use 'select folder {id}' or 'select image {id}'"
                        )));
                    }
                    (true, false) => ItemKind::Folder,
                    _ => ItemKind::Image,
                }
            }
        };
        let selection = self
            .browser
            .select_visible(kind, id)
            .ok_or_else(|| AppError::not_found(format!("No {kind} with id {id} in view")))?;
        print_success(&format!("Selected {} '{}'", selection.kind(), selection.name));
        Ok(())
    }

    fn list(&self) {
        let selected = self.browser.selection().map(|s| &s.item);
        let folders = self.browser.folders();
        let images = self.browser.images();
        if folders.is_empty() && images.is_empty() {
            println!("(empty)");
            return;
        }
        for folder in folders {
            let mark = marker(selected.is_some_and(|s| {
                s.kind() == ItemKind::Folder && s.id() == folder.id.as_str()
            }));
            println!("{mark} [dir] {:>6}  {}/", folder.id, folder.name);
        }
        for image in images {
            let mark = marker(selected.is_some_and(|s| {
                s.kind() == ItemKind::Image && s.id() == image.id.as_str()
            }));
            println!(
                "{mark} [img] {:>6}  {}  ({})",
                image.id,
                image.filename,
                image.uploaded_label()
            );
        }
    }

    fn print_queue(&self) {
        if self.queue.is_empty() {
            println!("(no files queued)");
            return;
        }
        for (n, file) in self.queue.files().iter().enumerate() {
            println!("  {:>3}. {}  ({})", n + 1, file.name, file.path.display());
        }
    }

    fn status(&self) {
        let phase = match self.browser.phase() {
            BrowserPhase::Idle => "idle",
            BrowserPhase::Selected => "selected",
            BrowserPhase::Clipped => "clipped",
        };
        print_kv("location", &self.browser.path().display());
        print_kv("state", phase);
        print_kv(
            "selection",
            &self
                .browser
                .selection()
                .map_or_else(|| "-".to_string(), |s| format!("{} '{}'", s.item, s.name)),
        );
        print_kv(
            "clipboard",
            &self.browser.clipboard().map_or_else(
                || "-".to_string(),
                |c| format!("{} {} '{}'", c.mode, c.item, c.name),
            ),
        );
        print_kv("queued files", &self.queue.len().to_string());
        if self.browser.is_stale() {
            print_kv("listing", "out of date");
        }
    }
}

fn marker(selected: bool) -> &'static str {
    if selected { "*" } else { " " }
}

fn prompt(location: &str) {
    use std::io::Write;
    print!("gallery:{location}> ");
    if let Err(e) = std::io::stdout().flush() {
        warn!(error = %e, "Failed to flush prompt");
    }
}

fn report(error: &AppError) {
    if error.is_unauthenticated() {
        print_error(&format!("{} (run `gallery-cli login`)", error.message));
    } else {
        print_error(&error.message);
    }
}
