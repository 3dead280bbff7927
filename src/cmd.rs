//! Launching a command as a tracee.

use std::io;
use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command};

use nix::sys::ptrace;

use crate::error::{Error, Result};
use crate::ptracer::Pid;

/// Spawn `cmd`, requesting `PTRACE_TRACEME` after `fork()` and pre-`exec()`.
///
/// The child stops with `SIGTRAP` once its `execve()` succeeds, before running any code of
/// the new program. The caller must consume that stop with `waitpid()`, and must never call
/// `Child::wait()`, since the final status is reaped by the tracing run loop.
pub(crate) fn spawn(cmd: &mut Command) -> Result<(Child, Pid)> {
    unsafe {
        cmd.pre_exec(|| ptrace::traceme().map_err(|err| io::Error::from_raw_os_error(err as i32)))
    };

    let child = cmd.spawn().map_err(Error::Spawn)?;
    let pid = Pid::from_raw(child.id() as i32);

    Ok((child, pid))
}

/// The display name of a command: the file name of its program.
pub(crate) fn argv0(cmd: &Command) -> String {
    let program = Path::new(cmd.get_program());

    program
        .file_name()
        .unwrap_or_else(|| program.as_os_str())
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv0_strips_directories() {
        assert_eq!(argv0(&Command::new("/bin/true")), "true");
        assert_eq!(argv0(&Command::new("ls")), "ls");
    }
}
