use std::{collections::HashMap, path::PathBuf};

use rayon::prelude::*;

use crate::{
    foundation::error::{ReelError, ReelResult},
    intake::sheet::SongRequest,
};

pub mod probe;
pub mod ytdlp;

/// A request paired with its locally decodable file and real duration.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ResolvedMedia {
    pub name: String,
    pub path: PathBuf,
    pub duration_sec: f64,
    pub dimensions: Option<(u32, u32)>,
    /// Lives in the download area and may be removed after the render.
    pub owned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSong {
    pub request: SongRequest,
    pub media: ResolvedMedia,
}

/// Turns a source reference into a local file. Must be idempotent per `name`.
pub trait Acquire: Sync {
    fn resolve(&self, name: &str, source_ref: &str) -> ReelResult<ResolvedMedia>;
}

/// Resolve every request, `jobs` at a time, keeping input order.
///
/// Requests sharing a display name are fetched once. The first failure aborts with an
/// acquisition error naming the request.
pub fn resolve_songs(
    acquirer: &dyn Acquire,
    requests: &[SongRequest],
    jobs: usize,
) -> ReelResult<Vec<ResolvedSong>> {
    let mut unique: Vec<&SongRequest> = Vec::new();
    let mut seen = HashMap::<&str, usize>::new();
    for req in requests {
        if !seen.contains_key(req.display_name.as_str()) {
            seen.insert(req.display_name.as_str(), unique.len());
            unique.push(req);
        }
    }

    let pool = build_thread_pool(jobs)?;
    let resolved = pool.install(|| {
        unique
            .par_iter()
            .map(|req| {
                acquirer
                    .resolve(&req.display_name, &req.source_ref)
                    .map_err(|e| as_acquisition(e).for_request(&req.display_name))
            })
            .collect::<Vec<_>>()
    });

    let mut media = Vec::with_capacity(resolved.len());
    for item in resolved {
        media.push(item?);
    }

    requests
        .iter()
        .map(|req| {
            let slot = seen.get(req.display_name.as_str()).copied().ok_or_else(|| {
                ReelError::acquisition("internal error: request missing from fetch set")
            })?;
            Ok(ResolvedSong {
                request: req.clone(),
                media: media[slot].clone(),
            })
        })
        .collect()
}

/// Everything that goes wrong while fetching is reported as an acquisition failure.
pub(crate) fn as_acquisition(err: ReelError) -> ReelError {
    match err {
        ReelError::Acquisition(_) | ReelError::Request { .. } => err,
        other => ReelError::acquisition(other.to_string()),
    }
}

fn build_thread_pool(jobs: usize) -> ReelResult<rayon::ThreadPool> {
    if jobs == 0 {
        return Err(ReelError::validation("download jobs must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| ReelError::acquisition(format!("failed to build download thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/acquire/resolve.rs"]
mod tests;
