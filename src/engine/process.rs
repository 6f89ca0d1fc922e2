use super::{RunOutput, Runner};
use crate::error::Error;
use std::process::{Command, Stdio};
use tracing::debug;

/// Spawns the engine and blocks until it exits. No timeout, no retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&self, command_line: &str, extra_env: &[(&str, &str)]) -> RunOutput {
        // shlex treats backslashes as escapes; Windows paths use them as separators.
        let line = if cfg!(windows) {
            command_line.replace('\\', "/")
        } else {
            command_line.to_string()
        };

        let tokens = match shlex::split(&line) {
            Some(tokens) if !tokens.is_empty() => tokens,
            _ => return RunOutput::failed(Error::CommandLine(command_line.to_string())),
        };

        debug!("engine run {}", command_line);
        let mut cmd = Command::new(&tokens[0]);
        cmd.args(&tokens[1..]);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        for (k, v) in extra_env {
            cmd.env(k, v);
        }
        hide_console(&mut cmd);

        let output = match cmd.output() {
            Ok(output) => output,
            Err(source) => {
                return RunOutput::failed(Error::Spawn {
                    program: tokens[0].clone(),
                    source,
                });
            }
        };

        RunOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            error: None,
        }
    }
}

#[cfg(windows)]
fn hide_console(cmd: &mut Command) {
    use std::os::windows::process::CommandExt;
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    cmd.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_console(_cmd: &mut Command) {}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn captures_status_and_streams() {
        let out = ProcessRunner.run("sh -c 'echo out; echo err >&2; exit 3'", &[]);
        assert_eq!(out.status, Some(3));
        assert_eq!(out.stdout.trim(), "out");
        assert_eq!(out.stderr.trim(), "err");
        assert!(out.error.is_none());
    }

    #[test]
    fn missing_program_yields_absent_status() {
        let out = ProcessRunner.run("definitely-not-a-real-binary-4242 --version", &[]);
        assert_eq!(out.status, None);
        assert!(matches!(out.error, Some(Error::Spawn { .. })));
    }

    #[test]
    fn unbalanced_quotes_are_rejected_before_spawn() {
        let out = ProcessRunner.run("tesseract 'unterminated", &[]);
        assert_eq!(out.status, None);
        assert!(matches!(out.error, Some(Error::CommandLine(_))));
    }

    #[test]
    fn passes_extra_env() {
        let out = ProcessRunner.run("sh -c 'printf %s \"$TESSDATA_PREFIX\"'", &[("TESSDATA_PREFIX", "/data")]);
        assert_eq!(out.stdout, "/data");
    }
}
