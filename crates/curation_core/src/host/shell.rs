//! OS shell invocation.

use super::{HostError, HostResult, ShellRunner};
use log::{debug, info};
use std::process::Command;

/// Clears WinINet temporary internet files (`ClearMyTracksByProcess` flag 8).
const WININET_CLEAR_PROGRAM: &str = "RunDll32.exe";
const WININET_CLEAR_ARGS: &[&str] = &["InetCpl.cpl,ClearMyTracksByProcess", "8"];

/// External command to run, or nothing on platforms without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Noop,
    Process { program: String, args: Vec<String> },
}

impl ShellCommand {
    pub fn process<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Process {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// WinINet cache clear command, regardless of current platform.
    pub fn wininet_cache_clear() -> Self {
        Self::process(WININET_CLEAR_PROGRAM, WININET_CLEAR_ARGS.iter().copied())
    }

    /// Cache clear command for the current platform.
    pub fn platform_default() -> Self {
        if cfg!(windows) {
            Self::wininet_cache_clear()
        } else {
            Self::Noop
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop)
    }
}

/// Runs commands with `std::process::Command` and waits for exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdShellRunner;

impl ShellRunner for StdShellRunner {
    fn run(&self, command: &ShellCommand) -> HostResult<()> {
        let (program, args) = match command {
            ShellCommand::Noop => {
                debug!("event=shell_run module=host status=skipped reason=noop");
                return Ok(());
            }
            ShellCommand::Process { program, args } => (program, args),
        };

        info!("event=shell_run module=host status=start program={program}");
        let status = Command::new(program).args(args).status()?;
        if !status.success() {
            return Err(HostError::Other(format!(
                "`{program}` exited with {status}"
            )));
        }
        info!("event=shell_run module=host status=ok program={program}");
        Ok(())
    }
}
