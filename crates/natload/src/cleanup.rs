//! Deferred deletion for temporary files the dynamic linker still holds open.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;

static DEFERRED: Lazy<Mutex<Vec<PathBuf>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Schedule a path for deletion at process exit.
///
/// Called when an immediate delete was refused, typically because the file is
/// still mapped. Best-effort on every platform.
pub(crate) fn defer_delete(path: PathBuf) {
    #[cfg(windows)]
    if schedule_reboot_delete(&path) {
        return;
    }

    register_exit_sweep();
    DEFERRED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(path);
}

#[cfg(unix)]
fn register_exit_sweep() {
    use std::sync::Once;

    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        // SAFETY: the handler is registered once and only touches the
        // process-static registry.
        unsafe { libc::atexit(sweep) };
    });
}

#[cfg(not(unix))]
fn register_exit_sweep() {}

#[cfg(unix)]
extern "C" fn sweep() {
    let mut deferred = DEFERRED.lock().unwrap_or_else(PoisonError::into_inner);
    for path in deferred.drain(..) {
        let _ = std::fs::remove_file(path);
    }
}

#[cfg(windows)]
fn schedule_reboot_delete(path: &std::path::Path) -> bool {
    use std::os::windows::ffi::OsStrExt;
    use windows::Win32::Storage::FileSystem::{MOVE_FILE_FLAGS, MoveFileExW};
    use windows::core::PCWSTR;

    let wide: Vec<u16> = path
        .as_os_str()
        .encode_wide()
        .chain(std::iter::once(0))
        .collect();

    // MOVEFILE_DELAY_UNTIL_REBOOT with a null target deletes at next boot.
    unsafe { MoveFileExW(PCWSTR::from_raw(wide.as_ptr()), PCWSTR::null(), MOVE_FILE_FLAGS(4)) }
        .is_ok()
}
