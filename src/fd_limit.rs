//! Advisory check of the process open-file limit. Every input stays open for the whole
//! merge, so a file count at or above the soft limit is worth a warning, but the merge is
//! attempted regardless.

use tracing::{info, warn};

/// Soft `RLIMIT_NOFILE`, or `None` when it is unlimited or cannot be queried.
#[cfg(unix)]
pub fn open_file_limit() -> Option<u64> {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    // SAFETY: getrlimit only writes into the struct it is handed.
    let rc = unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, &mut limit) };
    if rc != 0 {
        warn!("Could not query the open file limit: {}", std::io::Error::last_os_error());
        return None;
    }
    if limit.rlim_cur == libc::RLIM_INFINITY {
        info!("System file limit is unlimited");
        return None;
    }
    Some(limit.rlim_cur as u64)
}

#[cfg(not(unix))]
pub fn open_file_limit() -> Option<u64> {
    warn!("Open file limit is not available on this platform");
    None
}

pub fn exceeds_limit(files: usize, limit: u64) -> bool {
    files as u64 >= limit
}

/// Log the limit and warn when `files` meets or exceeds it.
pub fn check_file_count(files: usize) -> Option<u64> {
    let limit = open_file_limit()?;
    info!("System file limit is {}", limit);
    if exceeds_limit(files, limit) {
        warn!("Number of files {} exceeds {}", files, limit);
    }
    Some(limit)
}
