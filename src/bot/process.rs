//! Worker handle around a bot child process.
//!
//! Both pipes are non-blocking and every wait goes through `poll(2)`, so a
//! deadline holds even when the bot never writes a newline or never reads
//! its input.

use std::io::{self, Read, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::process::{Child, ChildStdin, ChildStdout, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::CommError;

/// Delay between exit checks during teardown.
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Exit checks before escalating to the next signal.
const EXIT_POLLS: u32 = 100;

/// Bytes read from the pipe per call.
const READ_CHUNK: usize = 4096;

/// Lifecycle of a bot channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Messages can be exchanged.
    Alive,
    /// A protocol fault ended the exchange; the process still needs closing.
    Faulted,
    /// The pipes are closed and the process reaped.
    Closed,
}

/// A running bot process.
///
/// Dropping the handle does not stop the child. Owners call
/// [`close`](Self::close) on every exit path.
#[derive(Debug)]
pub struct BotProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    buffer: Vec<u8>,
    state: ChannelState,
}

impl BotProcess {
    /// Start `cmdline` through `sh -c` with piped stdin and stdout.
    ///
    /// # Errors
    ///
    /// Returns [`CommError::Spawn`] if the shell cannot be started or its
    /// pipes cannot be made non-blocking.
    pub fn spawn(cmdline: &str) -> Result<Self, CommError> {
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(cmdline)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(CommError::Spawn)?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let configured = match (&stdin, &stdout) {
            (Some(input), Some(out)) => {
                set_nonblocking(input.as_raw_fd()).and_then(|()| set_nonblocking(out.as_raw_fd()))
            }
            _ => Err(io::Error::other("stdio was not captured")),
        };

        let mut process = Self {
            child,
            stdin,
            stdout,
            buffer: Vec::new(),
            state: ChannelState::Alive,
        };
        if let Err(e) = configured {
            // Never handed out, so reap it here.
            let _ = process.close();
            return Err(CommError::Spawn(e));
        }
        Ok(process)
    }

    /// Current channel state.
    #[must_use]
    pub const fn state(&self) -> ChannelState {
        self.state
    }

    /// Whether messages can still be exchanged.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state == ChannelState::Alive
    }

    /// OS process id of the shell.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Mark the channel faulted. No further messages are exchanged.
    pub fn mark_faulted(&mut self) {
        if self.state == ChannelState::Alive {
            self.state = ChannelState::Faulted;
        }
    }

    /// Write one line to the bot's stdin within `deadline`.
    ///
    /// # Errors
    ///
    /// Fails if the channel is not alive. Faults the channel and fails with
    /// [`CommError::SendTimeout`] if the bot does not drain its input in
    /// time, or [`CommError::Send`] if the write fails.
    pub fn send_line(&mut self, line: &str, deadline: Duration) -> Result<(), CommError> {
        if !self.is_alive() {
            return Err(CommError::NotAlive);
        }
        let start = Instant::now();
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');

        let result = self.write_all_within(&bytes, start, deadline);
        if result.is_err() {
            self.mark_faulted();
        }
        result
    }

    fn write_all_within(
        &mut self,
        mut bytes: &[u8],
        start: Instant,
        deadline: Duration,
    ) -> Result<(), CommError> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(CommError::NotAlive);
        };
        let fd = stdin.as_raw_fd();

        while !bytes.is_empty() {
            match stdin.write(bytes) {
                Ok(0) => return Err(CommError::Send(io::ErrorKind::WriteZero.into())),
                Ok(n) => bytes = &bytes[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    let elapsed = start.elapsed();
                    if elapsed >= deadline {
                        return Err(CommError::SendTimeout { limit: deadline });
                    }
                    wait_ready(fd, libc::POLLOUT, deadline - elapsed).map_err(CommError::Send)?;
                }
                Err(e) => return Err(CommError::Send(e)),
            }
        }
        Ok(())
    }

    /// Read one line from the bot's stdout.
    ///
    /// Returns the line without its newline and the time spent waiting.
    /// Bytes already buffered are checked before the deadline, so a line
    /// that completed in an earlier read is always returned.
    ///
    /// # Errors
    ///
    /// Faults the channel and fails with [`CommError::HardTimeout`] if no
    /// complete line is available once `hard` has elapsed, with
    /// [`CommError::Closed`] on end of stream, or [`CommError::Recv`] on a
    /// read error.
    pub fn recv_line(&mut self, hard: Duration) -> Result<(String, Duration), CommError> {
        if !self.is_alive() {
            return Err(CommError::NotAlive);
        }
        let start = Instant::now();
        let result = self.read_until_newline(start, hard);
        if result.is_err() {
            self.mark_faulted();
        }
        result.map(|line| (line, start.elapsed()))
    }

    fn read_until_newline(&mut self, start: Instant, hard: Duration) -> Result<String, CommError> {
        let Some(stdout) = self.stdout.as_mut() else {
            return Err(CommError::NotAlive);
        };
        let fd = stdout.as_raw_fd();
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            if let Some(end) = self.buffer.iter().position(|&b| b == b'\n') {
                let line: Vec<u8> = self.buffer.drain(..=end).take(end).collect();
                return String::from_utf8(line)
                    .map_err(|e| CommError::InvalidJson(e.to_string()));
            }

            let elapsed = start.elapsed();
            if elapsed >= hard {
                return Err(CommError::HardTimeout { limit: hard });
            }
            if !wait_ready(fd, libc::POLLIN, hard - elapsed).map_err(CommError::Recv)? {
                continue;
            }

            match stdout.read(&mut chunk) {
                Ok(0) => return Err(CommError::Closed),
                Ok(n) => self.buffer.extend_from_slice(&chunk[..n]),
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
                    ) => {}
                Err(e) => return Err(CommError::Recv(e)),
            }
        }
    }

    /// Close the pipes and stop the process.
    ///
    /// Waits up to a second for a voluntary exit, then sends `SIGTERM` and
    /// waits another second, then kills. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be signalled or reaped.
    pub fn close(&mut self) -> io::Result<ExitStatus> {
        self.stdin.take();
        self.stdout.take();
        self.buffer.clear();
        self.state = ChannelState::Closed;

        if let Some(status) = self.wait_exit()? {
            return Ok(status);
        }
        self.terminate()?;
        if let Some(status) = self.wait_exit()? {
            return Ok(status);
        }
        match self.child.kill() {
            // Exited between the last check and the kill.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => {}
            other => other?,
        }
        self.child.wait()
    }

    fn wait_exit(&mut self) -> io::Result<Option<ExitStatus>> {
        for _ in 0..EXIT_POLLS {
            if let Some(status) = self.child.try_wait()? {
                return Ok(Some(status));
            }
            thread::sleep(EXIT_POLL_INTERVAL);
        }
        Ok(None)
    }

    fn terminate(&self) -> io::Result<()> {
        let pid = libc::pid_t::try_from(self.child.id()).map_err(io::Error::other)?;
        // SAFETY: plain signal delivery to our own unreaped child.
        let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.raw_os_error() != Some(libc::ESRCH) {
                return Err(err);
            }
        }
        Ok(())
    }
}

fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    // SAFETY: fcntl on a descriptor owned by a live ChildStdout.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: as above.
    if unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) } < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Wait until `fd` is ready for `events` or `timeout` passes. `Ok(false)`
/// on timeout or interruption.
fn wait_ready(fd: RawFd, events: libc::c_short, timeout: Duration) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events,
        revents: 0,
    };
    let millis = libc::c_int::try_from(timeout.as_micros().div_ceil(1000))
        .unwrap_or(libc::c_int::MAX);
    // SAFETY: one valid pollfd for the duration of the call.
    let rc = unsafe { libc::poll(&raw mut pfd, 1, millis) };
    if rc < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == io::ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err);
    }
    Ok(rc > 0)
}
