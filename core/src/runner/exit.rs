use std::process::ExitStatus;

/// Collapses an exit status into one integer; on unix, death by signal N
/// becomes `128 + N` the way shells report it. Anything else is 1.
pub fn normalize_exit(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| signal_exit_code(&status))
        .unwrap_or(1)
}

#[cfg(unix)]
fn signal_exit_code(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map(|sig| 128 + sig)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: &ExitStatus) -> Option<i32> {
    None
}
