//! gphoto2 process runner

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Run `binary args...` and return its combined output.
///
/// The child is killed when `limit` elapses.
pub(crate) async fn run(binary: &str, args: &[String], limit: Duration) -> Result<String> {
    debug!(binary, ?args, "Running camera command");

    let mut cmd = Command::new(binary);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd
        .spawn()
        .map_err(|e| Error::Command(format!("cannot start {binary}: {e}")))?;

    let output = tokio::time::timeout(limit, child.wait_with_output())
        .await
        .map_err(|_| Error::Timeout(limit.as_secs()))?
        .map_err(|e| Error::Command(e.to_string()))?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if output.status.success() {
        Ok(combined)
    } else {
        let code = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        Err(Error::Command(format!(
            "exit status {code}: {}",
            combined.trim()
        )))
    }
}
