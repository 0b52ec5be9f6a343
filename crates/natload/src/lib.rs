//! Native library resolution and loading for multi-platform bundles.
//!
//! Programs that ship one native binary per OS/architecture combination lay
//! them out as
//!
//! ```text
//! {base location}/{platform tag}/{native file name}
//! lib/com.example.hello/linux-x64/libNative.so
//! lib/com.example.hello/windows-x64/Native.dll
//! ```
//!
//! A [`Resolver`] composes the lookup key from a logical library name and a
//! base search location (conventionally `lib/<package namespace>`), searches
//! a [`ResourceNamespace`] for it, and yields an absolute file path ready for
//! linking, extracting to a scoped temporary file when the resource is not
//! already on disk. The temporary file lives exactly as long as the resolver
//! instance.
//!
//! ```no_run
//! use natload::{DirNamespace, GlobalLinker};
//!
//! # fn main() -> natload::Result<()> {
//! let namespace = DirNamespace::new("bundle");
//! let _library = natload::load("Native", "lib/com.example.hello", namespace, &GlobalLinker)?;
//! # Ok(())
//! # }
//! ```

mod cleanup;
mod error;
mod linker;
mod loader;
mod resource;

pub use error::{Error, Result};
pub use linker::{GlobalLinker, NativeLinker, ScopedLinker, load};
pub use loader::{Resolver, native_file_name};
pub use resource::{DirNamespace, ResourceNamespace};

#[cfg(feature = "zip")]
pub use resource::ZipNamespace;

pub use natload_platform::platform_tag;
