//! Browser cache clearing through the OS shell.

use crate::host::{ShellCommand, ShellRunner};
use log::{error, info};

/// Runs `command`; failures are logged, never returned.
///
/// Returns whether the command completed successfully.
pub fn clear_cache(shell: &dyn ShellRunner, command: &ShellCommand) -> bool {
    match shell.run(command) {
        Ok(()) => {
            info!(
                "event=cache_clear module=cache status=ok noop={}",
                command.is_noop()
            );
            true
        }
        Err(err) => {
            error!("event=cache_clear module=cache status=error error={err}");
            false
        }
    }
}
