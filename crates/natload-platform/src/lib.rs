//! Host platform identification.
//!
//! Maps the raw OS name, OS version, and CPU architecture strings reported by
//! the host into the canonical `{os}[-{version}]-{arch}` tag used to locate
//! per-platform native binaries inside a bundle, e.g. `linux-x64`,
//! `freebsd-10-x64`, `aix-5-ppc64`.

pub mod arch;
pub mod os;
mod tag;

pub use arch::{Arch, Width};
pub use os::OsFamily;
pub use tag::{HostEnv, platform_tag};
