//! File listing, downloads, and screenshot serving.
//!
//! Everything served here lives under the configured data directory. Request
//! paths are canonicalized and checked against the root before any read, so
//! `..` segments, absolute paths, and symlink escapes all fall out as 404.

use {
    std::{
        collections::BTreeMap,
        io,
        path::{Path as FsPath, PathBuf},
    },
    axum::{
        Json,
        extract::{Path, State},
        http::{StatusCode, header},
        response::{IntoResponse, Response},
    },
    tokio::fs,
    tracing::warn,
    crate::state::AppState,
};

/// `GET /api/files`: top-level folders of the data directory, each with the
/// names of its entries. A missing data directory is an empty workspace, not
/// an error.
pub async fn files_handler(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<String, Vec<String>>>, (StatusCode, String)> {
    let mut listing = BTreeMap::new();
    let mut folders = match fs::read_dir(state.data_root()).await {
        Ok(folders) => folders,
        Err(_) => return Ok(Json(listing)),
    };

    while let Some(entry) = folders.next_entry().await.map_err(internal_error)? {
        if !entry.file_type().await.map_err(internal_error)?.is_dir() {
            continue;
        }
        let folder = entry.file_name().to_string_lossy().into_owned();
        let mut names = Vec::new();
        let mut contents = fs::read_dir(entry.path()).await.map_err(internal_error)?;
        while let Some(child) = contents.next_entry().await.map_err(internal_error)? {
            names.push(child.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        listing.insert(folder, names);
    }
    Ok(Json(listing))
}

fn internal_error(error: io::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
}

/// `GET /download/{*path}`: serves a workspace file as an attachment.
pub async fn download_handler(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let root = state.data_root();
    let Some(resolved) = resolve_under(&root, &path).await else {
        return not_found();
    };
    match fs::read(&resolved).await {
        Ok(bytes) => {
            let filename = resolved
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "download".to_owned());
            (
                [
                    (header::CONTENT_TYPE, "application/octet-stream".to_owned()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                bytes,
            )
                .into_response()
        },
        Err(error) => {
            warn!(%error, path = %resolved.display(), "download read failed");
            not_found()
        },
    }
}

/// `GET /view/screenshot/{*path}`: serves a walkthrough screenshot inline.
///
/// The front end passes [`glimpse_protocol::BrowseResult`] screenshot paths
/// through verbatim, so these resolve against the data root but must land
/// inside the screenshots directory.
pub async fn screenshot_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Response {
    let root = state.data_root();
    let Some(resolved) = resolve_under(&root, &path).await else {
        return not_found();
    };
    let Ok(screenshots) = fs::canonicalize(state.config.screenshots_dir()).await else {
        return not_found();
    };
    if !resolved.starts_with(&screenshots) {
        return not_found();
    }
    match fs::read(&resolved).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(error) => {
            warn!(%error, path = %resolved.display(), "screenshot read failed");
            not_found()
        },
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

/// Canonicalized location of `relative` under `root`, or `None` when the
/// target does not exist or escapes the root.
async fn resolve_under(root: &FsPath, relative: &str) -> Option<PathBuf> {
    let root = fs::canonicalize(root).await.ok()?;
    let candidate = fs::canonicalize(root.join(relative)).await.ok()?;
    candidate.starts_with(&root).then_some(candidate)
}
