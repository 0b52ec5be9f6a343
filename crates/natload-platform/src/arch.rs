//! CPU architecture canonicalization.

use std::fmt;

/// Process address width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Bits32,
    Bits64,
}

impl Width {
    /// Address width of the running process.
    pub fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            Width::Bits64
        } else {
            Width::Bits32
        }
    }

    pub fn is_64(self) -> bool {
        self == Width::Bits64
    }
}

/// Canonical CPU architecture names used in bundle paths.
///
/// `Other` carries raw strings no rule matched, lower-cased and otherwise
/// unchanged, so tag composition never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arch {
    X86,
    X64,
    Arm,
    Arm64,
    Ppc,
    Ppc64,
    Sparc,
    Sparc64,
    Ia64,
    Pa,
    Pa64,
    Other(String),
}

impl Arch {
    pub fn as_str(&self) -> &str {
        match self {
            Arch::X86 => "x86",
            Arch::X64 => "x64",
            Arch::Arm => "arm",
            Arch::Arm64 => "arm64",
            Arch::Ppc => "ppc",
            Arch::Ppc64 => "ppc64",
            Arch::Sparc => "sparc",
            Arch::Sparc64 => "sparc64",
            Arch::Ia64 => "ia64",
            Arch::Pa => "pa",
            Arch::Pa64 => "pa64",
            Arch::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalize a raw architecture string.
///
/// The input is lower-cased and matched top to bottom; the first matching
/// rule wins. Note that `aarch64` matches no rule and passes through, while
/// the `arm64` reported by macOS does match; both spellings are what existing
/// bundle layouts expect for those hosts.
pub fn canonicalize(raw: &str, width: Width) -> Arch {
    let raw = raw.to_lowercase();
    let wide = width.is_64();

    if raw.contains("86") || raw == "amd64" {
        if wide { Arch::X64 } else { Arch::X86 }
    } else if raw.contains("arm") {
        if wide { Arch::Arm64 } else { Arch::Arm }
    } else if raw.contains("power") || raw.contains("ppc") {
        if wide { Arch::Ppc64 } else { Arch::Ppc }
    } else if raw.starts_with("sparc") {
        if wide { Arch::Sparc64 } else { Arch::Sparc }
    } else if raw.starts_with("ia64") {
        Arch::Ia64
    } else if raw.starts_with("pa") {
        if wide { Arch::Pa64 } else { Arch::Pa }
    } else {
        Arch::Other(raw)
    }
}
