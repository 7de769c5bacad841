use super::{commands, dispatch};
use anyhow::Result;

/// Main orchestrator, no business logic
///
/// 1. Parse: Extract CLI arguments (flags or `PGPROBE_*` environment)
/// 2. Dispatch: Resolve configuration into a typed Action
/// 3. Execute: Run the probe
///
/// # Errors
///
/// Returns an error if the configuration is invalid, or if the probe fails
/// and `--exit-code` was given
pub async fn start() -> Result<()> {
    let matches = commands::new().get_matches();

    let action = dispatch::dispatch(&matches)?;

    action.execute().await
}
