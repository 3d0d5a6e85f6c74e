use std::{
    io::{Read, Write},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use crate::{
    error::{Error, Result},
    platform::{CommandOutput, System},
};

const POLL: Duration = Duration::from_millis(5);

/// Runs external programs with a deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

fn command_error(program: &str, e: impl std::fmt::Display) -> Error {
    Error::Command {
        program: program.to_string(),
        message: e.to_string(),
    }
}

fn read_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = String::new();
        if let Some(mut pipe) = pipe {
            // Invalid UTF-8 leaves whatever was read so far.
            let _ = pipe.read_to_string(&mut buf);
        }
        buf
    })
}

fn wait_with_deadline(child: &mut Child, program: &str, timeout: Duration) -> Result<Option<i32>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status.code());
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Error::CommandTimeout {
                program: program.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL);
    }
}

impl System for ProcessRunner {
    /// Commands fed on stdin run with their output discarded: clipboard owners such as
    /// `xsel -i` fork into the background and would keep an output pipe open.
    fn run(
        &self,
        program: &str,
        args: &[&str],
        stdin: Option<&str>,
        timeout: Duration,
    ) -> Result<CommandOutput> {
        let mut command = Command::new(program);
        command.args(args);
        if stdin.is_some() {
            command
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
        } else {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }

        let mut child = command.spawn().map_err(|e| command_error(program, e))?;
        tracing::trace!(program, ?args, "command spawned");

        if let Some(input) = stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            pipe.write_all(input.as_bytes())
                .map_err(|e| command_error(program, e))?;
        }

        let stdout = read_pipe(child.stdout.take());
        let stderr = read_pipe(child.stderr.take());
        let status = wait_with_deadline(&mut child, program, timeout)?;

        Ok(CommandOutput {
            status,
            stdout: stdout.join().unwrap_or_default(),
            stderr: stderr.join().unwrap_or_default(),
        })
    }
}

/// Output of a command that must succeed.
pub(crate) fn checked(
    system: &dyn System,
    program: &str,
    args: &[&str],
    stdin: Option<&str>,
    timeout: Duration,
) -> Result<String> {
    let output = system.run(program, args, stdin, timeout)?;
    if !output.success() {
        return Err(Error::Command {
            program: program.to_string(),
            message: match output.stderr.trim() {
                "" => format!("exit status {:?}", output.status),
                stderr => stderr.to_string(),
            },
        });
    }
    Ok(output.stdout)
}
