//! Doc command - Manage documents

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;

use docwarden_application::{AddDocumentCommand, DocumentDto, RenewDocumentCommand};
use docwarden_domain::entities::FileUpload;
use docwarden_domain::value_objects::{DocumentId, DocumentOwner, MemberId, OrganizationId};

use crate::commands::Command;
use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;

/// Exactly one owner, given as `--org` or `--member`
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct OwnerArgs {
    /// Organization owning the document
    #[arg(long, value_name = "ORG_ID")]
    pub org: Option<OrganizationId>,

    /// Member owning the document
    #[arg(long, value_name = "MEMBER_ID")]
    pub member: Option<MemberId>,
}

impl OwnerArgs {
    pub fn owner(&self) -> CliResult<DocumentOwner> {
        match (self.org, self.member) {
            (Some(org), None) => Ok(DocumentOwner::Organization(org)),
            (None, Some(member)) => Ok(DocumentOwner::Member(member)),
            _ => Err(CliError::invalid_argument(
                "pass exactly one of --org or --member",
            )),
        }
    }
}

/// Doc command action
#[derive(Subcommand, Debug, Clone)]
pub enum DocAction {
    /// Upload a file as a new document
    Add {
        #[command(flatten)]
        owner: OwnerArgs,
        #[arg(long)]
        title: String,
        /// Expiry date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        expires: NaiveDate,
        /// PDF or image file to upload
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
        /// MIME type, when the file extension is not enough
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Replace a document's file and expiry date
    Renew {
        #[arg(value_name = "DOC_ID")]
        id: DocumentId,
        /// New expiry date (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        expires: NaiveDate,
        #[arg(long, value_name = "PATH")]
        file: PathBuf,
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Delete a document and its file
    Delete {
        #[arg(value_name = "DOC_ID")]
        id: DocumentId,
    },

    /// List the documents of an organization or member
    List {
        #[command(flatten)]
        owner: OwnerArgs,
    },

    /// Save a document's file
    Download {
        #[arg(value_name = "DOC_ID")]
        id: DocumentId,
        /// Destination file; defaults to `<title>_<expiry>.<ext>` in the current directory
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Print documents as aligned rows
pub(crate) fn print_documents(style: &OutputStyle, documents: &[DocumentDto]) {
    if documents.is_empty() {
        println!("  none");
    }
    for doc in documents {
        println!(
            "  {}  {}  {:<8}  {}",
            doc.id,
            doc.expiry_date,
            style.status(doc.status),
            doc.title
        );
    }
}

/// Read a file from disk into an upload
pub(crate) async fn read_upload(path: &Path, content_type: Option<&str>) -> CliResult<FileUpload> {
    let bytes = tokio::fs::read(path).await?;
    let mut upload = FileUpload::new(bytes);
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        upload = upload.with_file_name(name);
    }
    if let Some(content_type) = content_type {
        upload = upload.with_content_type(content_type);
    }
    Ok(upload)
}

#[derive(Debug, Serialize)]
struct SavedFile {
    path: PathBuf,
    content_type: String,
    bytes: usize,
}

/// Doc command handler
pub struct DocCommand {
    action: DocAction,
}

impl DocCommand {
    pub fn new(action: DocAction) -> Self {
        Self { action }
    }

    fn report(ctx: &AppContext, verb: &str, doc: &DocumentDto) -> CliResult<()> {
        ctx.style.emit(doc, |style| {
            println!(
                "{}",
                style.success(&format!("{} {} (expires {})", verb, doc.title, doc.expiry_date))
            );
            println!("{}", doc.id);
            if doc.status.needs_attention() {
                println!("{}", style.warning(&format!("status: {}", style.status(doc.status))));
            }
        })
    }
}

#[async_trait::async_trait]
impl Command for DocCommand {
    async fn execute(&self, ctx: &AppContext) -> CliResult<()> {
        match &self.action {
            DocAction::Add {
                owner,
                title,
                expires,
                file,
                content_type,
            } => {
                let cmd = AddDocumentCommand {
                    owner: owner.owner()?,
                    title: title.clone(),
                    expiry_date: Some(*expires),
                    file: Some(read_upload(file, content_type.as_deref()).await?),
                };
                let doc = ctx.engine.lifecycle.add_document(&ctx.caller, cmd).await?;
                Self::report(ctx, "Added", &doc)
            }
            DocAction::Renew {
                id,
                expires,
                file,
                content_type,
            } => {
                let cmd = RenewDocumentCommand {
                    document_id: *id,
                    new_expiry_date: Some(*expires),
                    file: Some(read_upload(file, content_type.as_deref()).await?),
                };
                let doc = ctx.engine.lifecycle.renew_document(&ctx.caller, cmd).await?;
                Self::report(ctx, "Renewed", &doc)
            }
            DocAction::Delete { id } => {
                ctx.engine.lifecycle.delete_document(&ctx.caller, id).await?;
                ctx.style.emit(&id.to_string(), |style| {
                    println!("{}", style.success("Document deleted"));
                })
            }
            DocAction::List { owner } => {
                let documents = ctx.engine.registry.list_documents(&owner.owner()?).await?;
                ctx.style
                    .emit(&documents, |style| print_documents(style, &documents))
            }
            DocAction::Download { id, output } => {
                let download = ctx.engine.lifecycle.download_document(&ctx.caller, id).await?;
                let path = output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(&download.file_name));
                tokio::fs::write(&path, &download.bytes).await?;

                let saved = SavedFile {
                    path,
                    content_type: download.content_type,
                    bytes: download.bytes.len(),
                };
                ctx.style.emit(&saved, |style| {
                    println!(
                        "{}",
                        style.success(&format!(
                            "Saved {} ({} bytes)",
                            saved.path.display(),
                            saved.bytes
                        ))
                    );
                })
            }
        }
    }
}
