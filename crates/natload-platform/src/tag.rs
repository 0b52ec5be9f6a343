//! Platform tag composition and process-wide detection.

use once_cell::sync::Lazy;
use tracing::debug;

use crate::arch::{self, Width};
use crate::os::OsFamily;

/// Raw environment snapshot the tag is computed from.
///
/// `detect` reads the host once; composition itself is a pure function of the
/// fields, so mapping rules can be exercised with synthetic inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnv {
    /// Reported OS name, e.g. `Linux`, `Darwin`, `Windows 10`, `AIX`.
    pub os_name: String,
    /// Reported OS version string, e.g. `6.8.0`, `B.11.23`.
    pub os_version: String,
    /// Raw architecture string, e.g. `x86_64`, `amd64`, `arm64`.
    pub arch: String,
    /// Address width of the running process.
    pub width: Width,
    /// Selects `-dmalloc` debug-allocator builds of the binary.
    pub dmalloc: bool,
}

static PLATFORM_TAG: Lazy<String> = Lazy::new(|| {
    let tag = HostEnv::detect().tag();
    debug!(%tag, "computed platform tag");
    tag
});

/// The running host's platform tag, computed once per process.
pub fn platform_tag() -> &'static str {
    &PLATFORM_TAG
}

impl HostEnv {
    /// Snapshot the running host.
    ///
    /// The debug-allocator flag is taken from the `NATLOAD_DMALLOC`
    /// environment variable (any value counts as set).
    pub fn detect() -> Self {
        let (os_name, os_version, arch) = read_host();
        Self {
            os_name,
            os_version,
            arch,
            width: Width::native(),
            dmalloc: std::env::var_os("NATLOAD_DMALLOC").is_some(),
        }
    }

    /// Compose the canonical `{os}[-{version}]-{arch}` tag.
    ///
    /// Total: when no family matches, the reported OS name and full version
    /// are used verbatim, yielding a tag no bundle is likely to satisfy
    /// rather than an error.
    pub fn tag(&self) -> String {
        let arch = arch::canonicalize(&self.arch, self.width);
        let mut tag = match OsFamily::from_name(&self.os_name) {
            Some(family) => match family.version_segment(&self.os_version) {
                Some(version) => format!("{family}-{version}-{arch}"),
                None => format!("{family}-{arch}"),
            },
            None => format!("{}-{}-{}", self.os_name, self.os_version, arch),
        };
        if self.dmalloc {
            tag.push_str("-dmalloc");
        }
        tag
    }
}

#[cfg(unix)]
fn read_host() -> (String, String, String) {
    match nix::sys::utsname::uname() {
        Ok(uts) => (
            uts.sysname().to_string_lossy().into_owned(),
            uts.release().to_string_lossy().into_owned(),
            uts.machine().to_string_lossy().into_owned(),
        ),
        Err(_) => (
            std::env::consts::OS.to_string(),
            String::new(),
            std::env::consts::ARCH.to_string(),
        ),
    }
}

#[cfg(windows)]
fn read_host() -> (String, String, String) {
    (
        sysinfo::System::name().unwrap_or_else(|| "Windows".to_string()),
        sysinfo::System::os_version().unwrap_or_default(),
        sysinfo::System::cpu_arch(),
    )
}

#[cfg(not(any(unix, windows)))]
fn read_host() -> (String, String, String) {
    (
        std::env::consts::OS.to_string(),
        String::new(),
        std::env::consts::ARCH.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(os_name: &str, os_version: &str, arch: &str, width: Width) -> HostEnv {
        HostEnv {
            os_name: os_name.to_string(),
            os_version: os_version.to_string(),
            arch: arch.to_string(),
            width,
            dmalloc: false,
        }
    }

    #[test]
    fn linux_amd64_is_linux_x64() {
        assert_eq!(env("Linux", "6.8.0", "amd64", Width::Bits64).tag(), "linux-x64");
        assert_eq!(env("Linux", "6.8.0", "x86_64", Width::Bits64).tag(), "linux-x64");
        assert_eq!(env("Linux", "4.4.0", "i686", Width::Bits32).tag(), "linux-x86");
    }

    #[test]
    fn windows_edition_suffix_ignored() {
        assert_eq!(
            env("Windows Server 2022", "10.0", "x86_64", Width::Bits64).tag(),
            "windows-x64"
        );
        assert_eq!(env("Windows 10", "10.0", "x86", Width::Bits32).tag(), "windows-x86");
    }

    #[test]
    fn unversioned_families_have_two_segments() {
        assert_eq!(env("SunOS", "5.11", "sparcv9", Width::Bits64).tag(), "solaris-sparc64");
        assert_eq!(env("Darwin", "23.1.0", "arm64", Width::Bits64).tag(), "osx-arm64");
        assert_eq!(env("Mac OS X", "10.15", "x86_64", Width::Bits64).tag(), "osx-x64");
    }

    #[test]
    fn versioned_families_embed_major() {
        assert_eq!(env("FreeBSD", "10.3", "amd64", Width::Bits64).tag(), "freebsd-10-x64");
        assert_eq!(env("OpenBSD", "7.4", "amd64", Width::Bits64).tag(), "openbsd-7-x64");
        assert_eq!(env("NetBSD", "9.3", "amd64", Width::Bits64).tag(), "netbsd-9-x64");
    }

    #[test]
    fn aix_six_uses_version_five_binary() {
        let v6 = env("AIX", "6.1", "ppc64", Width::Bits64).tag();
        let v5 = env("AIX", "5.3", "ppc64", Width::Bits64).tag();
        assert_eq!(v6, "aix-5-ppc64");
        assert_eq!(v6, v5);
    }

    #[test]
    fn hpux_keeps_version_after_major_prefix() {
        assert_eq!(env("HP-UX", "B.11.23", "ia64", Width::Bits64).tag(), "hpux-11.23-ia64");
    }

    #[test]
    fn unknown_os_falls_back_verbatim() {
        assert_eq!(env("Haiku", "1.0", "x86_64", Width::Bits64).tag(), "Haiku-1.0-x64");
    }

    #[test]
    fn dmalloc_suffix_appended() {
        let mut host = env("Linux", "6.8.0", "amd64", Width::Bits64);
        host.dmalloc = true;
        assert_eq!(host.tag(), "linux-x64-dmalloc");
    }

    #[test]
    fn composition_is_deterministic() {
        let host = env("FreeBSD", "10.3", "amd64", Width::Bits64);
        assert_eq!(host.tag(), host.tag());
    }

    #[test]
    fn process_tag_is_memoized() {
        assert!(!platform_tag().is_empty());
        assert!(std::ptr::eq(platform_tag(), platform_tag()));
    }
}
