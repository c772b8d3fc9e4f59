//! Test driver for umami-demo integration tests.
//!
//! Spawns the demo binary with:
//! - stdout: a pipe, or a PTY so isatty(1) returns true and color is enabled
//! - stderr: a pipe, captured for assertions

use nix::pty::openpty;
use std::io::Read;
use std::os::fd::{FromRawFd, IntoRawFd};
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

/// Where the child's stdout goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutMode {
    Pipe,
    Pty,
}

/// A running demo process.
pub struct DemoSession {
    child: Child,
    mode: StdoutMode,
    stdout_capture: Arc<Mutex<Vec<u8>>>,
    stderr_capture: Arc<Mutex<Vec<u8>>>,
    stdout_thread: thread::JoinHandle<()>,
    stderr_thread: thread::JoinHandle<()>,
}

/// Copy everything from `reader` into `capture` until EOF.
fn drain<R: Read + Send + 'static>(
    mut reader: R,
    capture: Arc<Mutex<Vec<u8>>>,
    what: &'static str,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => capture.lock().unwrap().extend_from_slice(&buf[..n]),
                Err(e) => {
                    // EIO is expected on a PTY master once the slave closes.
                    if e.raw_os_error() != Some(libc::EIO) {
                        eprintln!("{what} drain error: {e}");
                    }
                    break;
                }
            }
        }
    })
}

impl DemoSession {
    /// Spawn `binary` with `args` and extra `env`, stdout piped.
    pub fn spawn(
        binary: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> std::io::Result<DemoSession> {
        Self::spawn_with(binary, args, env, StdoutMode::Pipe)
    }

    pub fn spawn_with(
        binary: &str,
        args: &[&str],
        env: &[(&str, &str)],
        mode: StdoutMode,
    ) -> std::io::Result<DemoSession> {
        let mut cmd = Command::new(binary);
        cmd.args(args);
        // Keep the caller's log filter out of the child unless asked for.
        cmd.env_remove("RUST_LOG");
        for (k, v) in env {
            cmd.env(k, v);
        }
        cmd.stdin(Stdio::null());
        cmd.stderr(Stdio::piped());

        let stdout_capture = Arc::new(Mutex::new(Vec::new()));

        let (mut child, stdout_thread) = match mode {
            StdoutMode::Pipe => {
                cmd.stdout(Stdio::piped());
                let mut child = cmd.spawn()?;
                let pipe = child.stdout.take().unwrap();
                let handle = drain(pipe, Arc::clone(&stdout_capture), "stdout");
                (child, handle)
            }
            StdoutMode::Pty => {
                let pty = openpty(None, None)
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
                let master_fd = pty.master.into_raw_fd();
                let slave_fd = pty.slave.into_raw_fd();

                // stdout is set up in pre_exec.
                cmd.stdout(Stdio::null());
                unsafe {
                    cmd.pre_exec(move || {
                        if libc::dup2(slave_fd, 1) == -1 {
                            return Err(std::io::Error::last_os_error());
                        }
                        if slave_fd > 1 {
                            libc::close(slave_fd);
                        }
                        Ok(())
                    });
                }

                let child = cmd.spawn()?;
                unsafe {
                    libc::close(slave_fd);
                }
                let master = unsafe { std::fs::File::from_raw_fd(master_fd) };
                let handle = drain(master, Arc::clone(&stdout_capture), "stdout");
                (child, handle)
            }
        };

        let stderr_capture = Arc::new(Mutex::new(Vec::new()));
        let stderr_pipe = child.stderr.take().unwrap();
        let stderr_thread = drain(stderr_pipe, Arc::clone(&stderr_capture), "stderr");

        Ok(DemoSession {
            child,
            mode,
            stdout_capture,
            stderr_capture,
            stdout_thread,
            stderr_thread,
        })
    }

    /// Wait for the child to exit and assert the exit code.
    pub fn wait_exit(mut self, expected_code: i32) -> SessionOutput {
        let status = self.child.wait().expect("failed to wait for child");
        let code = status.code().unwrap_or(-1);

        let _ = self.stdout_thread.join();
        let _ = self.stderr_thread.join();

        let mut stdout = String::from_utf8_lossy(&self.stdout_capture.lock().unwrap()).to_string();
        let stderr = String::from_utf8_lossy(&self.stderr_capture.lock().unwrap()).to_string();
        if self.mode == StdoutMode::Pty {
            // The line discipline turns "\n" into "\r\n".
            stdout = stdout.replace("\r\n", "\n");
        }

        assert_eq!(
            code, expected_code,
            "expected exit code {expected_code}, got {code}\nstdout:\n{stdout}\nstderr:\n{stderr}"
        );

        SessionOutput { stdout, stderr }
    }
}

/// Output captured from a completed session.
pub struct SessionOutput {
    pub stdout: String,
    pub stderr: String,
}

impl SessionOutput {
    /// Non-empty stdout lines with trailing whitespace removed.
    pub fn stdout_lines(&self) -> Vec<&str> {
        self.stdout
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.is_empty())
            .collect()
    }
}
