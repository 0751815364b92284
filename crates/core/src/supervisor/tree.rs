//! Platform-specific process tree termination.

#[cfg(unix)]
pub(crate) async fn kill_tree(pid: u32) {
    use std::time::Duration;

    // Stages are spawned as process group leaders, so the pid doubles as
    // the pgid. Signal the whole group: graceful first, then forced.
    let pgid = pid as i32;
    unsafe {
        libc::killpg(pgid, libc::SIGTERM);
    }
    tokio::time::sleep(Duration::from_millis(500)).await;
    unsafe {
        libc::killpg(pgid, libc::SIGKILL);
    }
}

#[cfg(windows)]
pub(crate) async fn kill_tree(pid: u32) {
    // taskkill /T takes down the child and its descendants.
    let result = tokio::process::Command::new("taskkill")
        .args(["/PID", &pid.to_string(), "/T", "/F"])
        .output()
        .await;
    if let Err(error) = result {
        tracing::warn!(pid, %error, "taskkill failed");
    }
}
