//! Library resolution: lookup key composition and on-demand extraction.

use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use tempfile::TempPath;
use tracing::{debug, warn};

use natload_platform::platform_tag;

use crate::cleanup;
use crate::error::{Error, Result};
use crate::resource::ResourceNamespace;

/// Map a logical library name to the host's native file name, e.g. `Native`
/// to `libNative.so`, `Native.dll`, or `libNative.dylib`.
pub fn native_file_name(base: &str) -> String {
    format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        base,
        std::env::consts::DLL_SUFFIX
    )
}

/// Resolves one logical library to a loadable absolute file path.
///
/// The lookup key is `{base location}/{platform tag}/{native file name}`. If
/// the namespace can address the resource directly on disk, that path is
/// returned as-is; otherwise the resource is copied once into a uniquely
/// named temporary file owned by this instance. The temporary file is
/// deleted by [`close`](Resolver::close), which also runs on drop.
///
/// Resolution and cleanup on one instance are mutually exclusive, so
/// concurrent callers observe at most one temporary file. Distinct instances
/// are fully independent.
pub struct Resolver<N> {
    file_name: String,
    location: String,
    tag: String,
    namespace: N,
    extracted: Mutex<Option<TempPath>>,
}

impl<N: ResourceNamespace> Resolver<N> {
    /// `name` is the logical library name before native naming conventions
    /// are applied; `location` is the base search location, conventionally
    /// `lib/<package namespace>`.
    pub fn new(name: &str, location: &str, namespace: N) -> Self {
        Self {
            file_name: native_file_name(name),
            location: location.to_string(),
            tag: platform_tag().to_string(),
            namespace,
            extracted: Mutex::new(None),
        }
    }

    /// Override the platform tag, e.g. to resolve for a foreign target.
    pub fn with_platform_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// The lookup key presented to the resource namespace.
    ///
    /// Leading and trailing separators are trimmed from both the base
    /// location and the file name before joining, so the key never carries
    /// doubled separators.
    pub fn lib_path(&self) -> String {
        format!(
            "{}/{}/{}",
            trim_separators(&self.location),
            self.tag,
            trim_separators(&self.file_name)
        )
    }

    /// Resolve to an absolute path suitable for linking.
    ///
    /// A previously materialized temporary file is returned as-is; at most
    /// one is ever created per instance.
    pub fn lib_file(&self) -> Result<PathBuf> {
        let mut extracted = self
            .extracted
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(tmp) = extracted.as_ref() {
            return Ok(tmp.to_path_buf());
        }

        let lib_path = self.lib_path();

        if let Some(direct) = self.namespace.locate(&lib_path) {
            debug!(path = %direct.display(), "resolved library in place");
            return Ok(direct);
        }

        let mut reader = self
            .namespace
            .open(&lib_path)
            .map_err(|source| Error::Extraction { source })?
            .ok_or(Error::NotSupported { path: lib_path })?;

        let mut tmp = tempfile::Builder::new()
            .prefix("natload-")
            .suffix(&format!("-{}", self.file_name))
            .tempfile()
            .map_err(|source| Error::Extraction { source })?;
        io::copy(&mut reader, tmp.as_file_mut()).map_err(|source| Error::Extraction { source })?;

        let tmp = tmp.into_temp_path();
        let path = tmp.to_path_buf();
        debug!(path = %path.display(), "extracted library to temporary file");
        *extracted = Some(tmp);
        Ok(path)
    }
}

impl<N> Resolver<N> {
    /// Delete the owned temporary file, if any.
    ///
    /// Deletion failures are swallowed and handed to deferred cleanup, since
    /// a platform that keeps loaded images open may refuse the delete. The
    /// owned slot is cleared unconditionally, so calling this twice is a
    /// no-op. Runs automatically on drop.
    pub fn close(&self) {
        let mut extracted = self
            .extracted
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(tmp) = extracted.take() {
            let path = tmp.to_path_buf();
            if let Err(err) = tmp.close() {
                warn!(path = %path.display(), %err, "could not delete temporary library, deferring");
                cleanup::defer_delete(path);
            }
        }
    }
}

impl<N> Drop for Resolver<N> {
    fn drop(&mut self) {
        self.close();
    }
}

fn trim_separators(path: &str) -> &str {
    path.trim_matches(|c| c == '/' || c == '\\')
}
