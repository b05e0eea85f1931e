// File: agent/src/services/commands.rs
use anyhow::{anyhow, Result};
use tokio::process::Command as AsyncCommand;
use tracing::debug;

/// Run `program` with `args` and return its stdout.
///
/// A non-zero exit becomes an error carrying stderr (or stdout when stderr
/// is empty).
pub async fn execute_command(program: &str, args: &[String]) -> Result<String> {
    debug!("Executing command: {} {}", program, redact(args).join(" "));

    let output = AsyncCommand::new(program)
        .args(args)
        .output()
        .await
        .map_err(|e| anyhow!("Failed to execute {}: {}", program, e))?;

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(stdout)
    } else {
        let error_msg = if !stderr.is_empty() { stderr } else { stdout };
        Err(anyhow!("Command failed: {}", error_msg.trim()))
    }
}

/// Hide the value following any secret-bearing flag
pub fn redact(args: &[String]) -> Vec<String> {
    let mut redacted = Vec::with_capacity(args.len());
    let mut hide_next = false;
    for arg in args {
        if hide_next {
            redacted.push("***".to_string());
            hide_next = false;
            continue;
        }
        hide_next = arg == "--s3-secretKey" || arg == "--s3-accessKey";
        redacted.push(arg.clone());
    }
    redacted
}
