//! Operating system family detection and version segment rules.

use std::fmt;

/// Operating system families with bundled binary layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Linux,
    Windows,
    Solaris,
    Macos,
    Hpux,
    Aix,
    Freebsd,
    Openbsd,
    Netbsd,
    Osf1,
    Netware,
}

impl OsFamily {
    /// Match a reported OS name against the family list.
    ///
    /// Predicates are tried top to bottom and the first match wins; the order
    /// is part of the bundle layout contract. Membership is exact equality
    /// except for Windows, whose reported name carries an edition suffix.
    pub fn from_name(name: &str) -> Option<Self> {
        if name == "Linux" {
            Some(OsFamily::Linux)
        } else if name.starts_with("Windows") {
            Some(OsFamily::Windows)
        } else if name == "SunOS" {
            Some(OsFamily::Solaris)
        } else if name == "Mac OS X" || name == "Darwin" {
            Some(OsFamily::Macos)
        } else if name == "HP-UX" {
            Some(OsFamily::Hpux)
        } else if name == "AIX" {
            Some(OsFamily::Aix)
        } else if name == "FreeBSD" {
            Some(OsFamily::Freebsd)
        } else if name == "OpenBSD" {
            Some(OsFamily::Openbsd)
        } else if name == "NetBSD" {
            Some(OsFamily::Netbsd)
        } else if name == "OSF1" {
            Some(OsFamily::Osf1)
        } else if name == "NetWare" {
            Some(OsFamily::Netware)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OsFamily::Linux => "linux",
            OsFamily::Windows => "windows",
            OsFamily::Solaris => "solaris",
            OsFamily::Macos => "osx",
            OsFamily::Hpux => "hpux",
            OsFamily::Aix => "aix",
            OsFamily::Freebsd => "freebsd",
            OsFamily::Openbsd => "openbsd",
            OsFamily::Netbsd => "netbsd",
            OsFamily::Osf1 => "osf1",
            OsFamily::Netware => "netware",
        }
    }

    /// Version segment embedded in the tag for this family, if any.
    ///
    /// Families whose on-disk layout is version-independent return `None`.
    /// AIX major version 6 aliases onto the version-5 binary, which stays
    /// compatible. HP-UX keeps everything after the leading letter component
    /// of its `B.11.23`-style version strings.
    pub fn version_segment(self, version: &str) -> Option<String> {
        match self {
            OsFamily::Linux | OsFamily::Windows | OsFamily::Solaris | OsFamily::Macos => None,
            OsFamily::Hpux => Some(after_major(version).to_string()),
            OsFamily::Aix => {
                let major = major_version(version);
                Some(if major == "6" { "5".to_string() } else { major.to_string() })
            }
            OsFamily::Freebsd
            | OsFamily::Openbsd
            | OsFamily::Netbsd
            | OsFamily::Osf1
            | OsFamily::Netware => Some(major_version(version).to_string()),
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text before the first dot, or the whole string when there is none.
fn major_version(version: &str) -> &str {
    version.split_once('.').map_or(version, |(major, _)| major)
}

/// Text after the first dot, or the whole string when there is none.
fn after_major(version: &str) -> &str {
    version.split_once('.').map_or(version, |(_, rest)| rest)
}
