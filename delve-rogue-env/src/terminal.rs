//! The terminal bridge: a child process on a pseudo-terminal and the
//! emulator interpreting its output.
//!
//! The child believes it is talking to an interactive 80×24 terminal.
//! Its output bytes are forwarded by a reader thread into a channel and
//! drained non-blockingly at every synchronization point, so a `step`
//! never waits for output that may not come; at worst it reads a stale or
//! partial frame. Escape sequences split across reads are handled by the
//! emulator's parser state.
use crate::error::RogueEnvError;
use crate::screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
use alacritty_terminal::event::{Event, EventListener};
use alacritty_terminal::grid::Dimensions;
use alacritty_terminal::index::{Column, Line};
use alacritty_terminal::term::{Config as TermConfig, Term};
use alacritty_terminal::vte::ansi::Processor;
use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use portable_pty::{
    native_pty_system, Child, ChildKiller, CommandBuilder, MasterPty, PtySize, PtySystem,
};
use std::io::{Read, Write};
use std::thread;

/// Upper bound on bytes consumed per synchronization point.
const READ_BUDGET: usize = 64 * 1024;

struct GridSize;

impl Dimensions for GridSize {
    fn total_lines(&self) -> usize {
        SCREEN_ROWS
    }

    fn screen_lines(&self) -> usize {
        SCREEN_ROWS
    }

    fn columns(&self) -> usize {
        SCREEN_COLS
    }
}

/// Discards terminal events; only the grid content is of interest.
struct Quiet;

impl EventListener for Quiet {
    fn send_event(&self, _event: Event) {}
}

/// A fixed-size in-memory terminal fed with raw child output.
pub struct VirtualTerminal {
    term: Term<Quiet>,
    parser: Processor,
}

impl Default for VirtualTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualTerminal {
    /// Creates an empty 80×24 terminal.
    pub fn new() -> Self {
        Self {
            term: Term::new(TermConfig::default(), &GridSize, Quiet),
            parser: Processor::new(),
        }
    }

    /// Interprets `bytes`, updating the screen state.
    ///
    /// Partial escape sequences are carried over to the next call.
    pub fn feed(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.parser.advance(&mut self.term, byte);
        }
    }

    /// The current screen content.
    pub fn snapshot(&self) -> Screen {
        let grid = self.term.grid();
        let rows: Vec<String> = (0..SCREEN_ROWS)
            .map(|i| {
                let row = &grid[Line(i as i32)];
                (0..SCREEN_COLS).map(|j| row[Column(j)].c).collect()
            })
            .collect();
        Screen::from_rows(&rows)
    }
}

/// A child process attached to a pseudo-terminal.
///
/// Owns the process handle, the write end of the pipe and a reader thread
/// forwarding output chunks over a channel.
pub struct PtyProcess {
    child: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
    output: Receiver<Vec<u8>>,
    // Keeps the master side of the pty open for the child's lifetime.
    _master: Box<dyn MasterPty + Send>,
}

impl PtyProcess {
    /// Spawns `command` (program and whitespace-separated arguments) on a
    /// fresh 80×24 pseudo-terminal.
    ///
    /// A missing executable is fatal here; it is reported, not retried.
    pub fn spawn(command: &str) -> Result<Self, RogueEnvError> {
        let pty = native_pty_system();
        let pair = pty
            .openpty(PtySize {
                rows: SCREEN_ROWS as u16,
                cols: SCREEN_COLS as u16,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| RogueEnvError::Spawn(e.to_string()))?;

        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| RogueEnvError::Spawn("empty command".to_string()))?;
        let mut cmd = CommandBuilder::new(program);
        cmd.args(parts);
        cmd.env("TERM", "linux");
        cmd.env("LC_ALL", "en_GB.UTF-8");
        cmd.env("COLUMNS", SCREEN_COLS.to_string());
        cmd.env("LINES", SCREEN_ROWS.to_string());

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| RogueEnvError::Spawn(e.to_string()))?;
        drop(pair.slave);

        let writer = pair
            .master
            .take_writer()
            .map_err(|e| RogueEnvError::Spawn(e.to_string()))?;
        let mut reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| RogueEnvError::Spawn(e.to_string()))?;

        let (tx, output) = unbounded();
        thread::spawn(move || {
            let mut buf = [0u8; 4096];
            loop {
                match reader.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        log::debug!("spawned {:?} (pid {:?})", command, child.process_id());

        Ok(Self {
            child,
            writer,
            output,
            _master: pair.master,
        })
    }

    /// Writes raw bytes to the child.
    pub fn send(&mut self, bytes: &[u8]) -> Result<(), RogueEnvError> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Feeds whatever output is currently buffered into `term`, up to the
    /// read budget. Never blocks. Returns the number of bytes consumed.
    pub fn drain(&mut self, term: &mut VirtualTerminal) -> usize {
        let mut consumed = 0;
        while consumed < READ_BUDGET {
            match self.output.try_recv() {
                Ok(chunk) => {
                    consumed += chunk.len();
                    term.feed(&chunk);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        consumed
    }

    /// Whether the child is still running.
    ///
    /// Non-blocking; a child that exited or cannot be waited on is
    /// reported as not alive.
    pub fn is_alive(&mut self) -> bool {
        match self.child.try_wait() {
            Ok(None) => true,
            Ok(Some(_)) | Err(_) => false,
        }
    }

    /// Kills the child and reaps it.
    ///
    /// The wait is blocking so that no zombie process is left behind;
    /// this is the one intentionally blocking call of the bridge.
    pub fn terminate(&mut self) {
        if self.is_alive() {
            if let Err(e) = self.child.kill() {
                log::warn!("kill failed: {}", e);
            }
        }
        let _ = self.child.wait();
    }
}

impl Drop for PtyProcess {
    fn drop(&mut self) {
        self.terminate();
    }
}
