// Menu actions that talk to the service but need no terminal interaction
// of their own. The `ui` module prompts for their inputs and prints the
// results.

use crate::api::AssistantService;
use crate::session::SessionContext;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

pub const UPLOAD_PURPOSE: &str = "assistants";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Nothing was sent; the path does not exist.
    Missing(PathBuf),
    Uploaded {
        file_id: String,
        /// Vector store batch id, or `None` when no vector store is
        /// configured and the attach step was skipped.
        batch_id: Option<String>,
    },
}

/// Resolve `input` against the current directory.
pub fn resolve_path(input: &str) -> Result<PathBuf> {
    let path = PathBuf::from(input.trim());
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}

/// Upload `path` for assistant use and add it to the context's vector store.
pub fn upload_file<A>(service: &A, ctx: &SessionContext, path: &Path) -> Result<UploadOutcome>
where
    A: AssistantService + ?Sized,
{
    if !path.exists() {
        return Ok(UploadOutcome::Missing(path.to_path_buf()));
    }

    let file = service
        .upload_file(path, UPLOAD_PURPOSE)
        .context("Failed to upload file")?;
    let file_id = file
        .usable_id()
        .ok_or_else(|| anyhow!("Upload response did not include a file id"))?
        .to_string();
    tracing::info!(%file_id, path = %path.display(), "file uploaded");

    let batch_id = match ctx.vector_store_id.as_deref() {
        Some(store) => {
            let batch = service
                .attach_files_to_vector_store(store, &[file_id.clone()])
                .with_context(|| format!("Failed to add file {file_id} to vector store {store}"))?;
            let batch_id = batch.usable_id().ok_or_else(|| {
                anyhow!("Vector store {store} accepted file {file_id} but returned no batch id")
            })?;
            Some(batch_id.to_string())
        }
        None => None,
    };

    Ok(UploadOutcome::Uploaded { file_id, batch_id })
}

/// Create an empty thread and return its id.
pub fn create_thread<A>(service: &A) -> Result<String>
where
    A: AssistantService + ?Sized,
{
    let thread = service.create_thread(&[]).context("Failed to create thread")?;
    thread
        .usable_id()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Failed to create a new thread."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_are_kept() {
        let p = if cfg!(windows) { "C:\\data\\a.txt" } else { "/data/a.txt" };
        assert_eq!(resolve_path(p).unwrap(), PathBuf::from(p));
    }

    #[test]
    fn relative_paths_join_the_working_directory() {
        let resolved = resolve_path(" notes.md ").unwrap();
        assert_eq!(resolved, std::env::current_dir().unwrap().join("notes.md"));
    }
}
