pub mod io;

/// Name used as the prefix of every diagnostic the tool prints.
pub const TOOL_NAME: &str = "fmsort";

/// Reset SIGPIPE to default behavior (SIG_DFL) so `fmsort | head` exits
/// quietly instead of reporting a broken pipe. Call at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// Format an IO error message without the "(os error N)" suffix.
/// Rust's Display impl appends it; users only need the OS text.
pub fn io_error_msg(e: &std::io::Error) -> String {
    if let Some(raw) = e.raw_os_error() {
        let os_err = std::io::Error::from_raw_os_error(raw);
        let msg = format!("{}", os_err);
        msg.replace(&format!(" (os error {})", raw), "")
    } else {
        format!("{}", e)
    }
}

/// Print a progress line to stderr when verbose output is enabled.
#[inline]
pub fn progress(verbose: bool, msg: impl std::fmt::Display) {
    if verbose {
        eprintln!("{}: {}", TOOL_NAME, msg);
    }
}
