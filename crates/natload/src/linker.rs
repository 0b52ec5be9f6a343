//! Native linking contract: how a resolved file is bound into the process.

use std::path::Path;

use libloading::Library;
use tracing::debug;

use crate::error::{Error, Result};
use crate::loader::Resolver;
use crate::resource::ResourceNamespace;

/// Binds a native image found at an absolute path into process context.
pub trait NativeLinker {
    fn link(&self, path: &Path) -> Result<Library>;
}

/// Links with symbols visible process-wide (`RTLD_NOW | RTLD_GLOBAL` on unix
/// hosts). Use when other native images expect to resolve symbols from this
/// library.
pub struct GlobalLinker;

/// Links with symbols scoped to the returned handle (`RTLD_NOW | RTLD_LOCAL`
/// on unix hosts). Windows has no flag distinction and behaves like
/// [`GlobalLinker`].
pub struct ScopedLinker;

impl NativeLinker for GlobalLinker {
    fn link(&self, path: &Path) -> Result<Library> {
        debug!(path = %path.display(), "linking with global symbol visibility");

        #[cfg(unix)]
        {
            use libloading::os::unix;
            // SAFETY: loading executes the image's initialization routines;
            // the image comes from the caller's own bundle.
            let lib = unsafe {
                unix::Library::open(Some(path.as_os_str()), unix::RTLD_NOW | unix::RTLD_GLOBAL)
            }
            .map_err(|source| link_error(path, source))?;
            Ok(lib.into())
        }

        #[cfg(not(unix))]
        {
            // SAFETY: loading executes the image's initialization routines;
            // the image comes from the caller's own bundle.
            unsafe { Library::new(path) }.map_err(|source| link_error(path, source))
        }
    }
}

impl NativeLinker for ScopedLinker {
    fn link(&self, path: &Path) -> Result<Library> {
        debug!(path = %path.display(), "linking with scoped symbol visibility");

        #[cfg(unix)]
        {
            use libloading::os::unix;
            // SAFETY: loading executes the image's initialization routines;
            // the image comes from the caller's own bundle.
            let lib = unsafe {
                unix::Library::open(Some(path.as_os_str()), unix::RTLD_NOW | unix::RTLD_LOCAL)
            }
            .map_err(|source| link_error(path, source))?;
            Ok(lib.into())
        }

        #[cfg(not(unix))]
        {
            // SAFETY: loading executes the image's initialization routines;
            // the image comes from the caller's own bundle.
            unsafe { Library::new(path) }.map_err(|source| link_error(path, source))
        }
    }
}

fn link_error(path: &Path, source: libloading::Error) -> Error {
    Error::Link {
        path: path.to_path_buf(),
        source,
    }
}

/// Resolve `name` under `location`, link it, and clean up in one call.
///
/// The resolver and any temporary file it materialized are released before
/// returning; the image itself stays loaded for the lifetime of the returned
/// handle.
pub fn load<N: ResourceNamespace>(
    name: &str,
    location: &str,
    namespace: N,
    linker: &dyn NativeLinker,
) -> Result<Library> {
    let resolver = Resolver::new(name, location, namespace);
    let path = resolver.lib_file()?;
    let library = linker.link(&path)?;
    resolver.close();
    Ok(library)
}
