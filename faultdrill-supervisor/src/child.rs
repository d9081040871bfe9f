//! Child execution and output capture.
//!
//! Both pipes are drained by their own task while the supervisor waits on
//! the child, so a child that writes a lot never stalls on a full pipe.
//! Each channel keeps its last `capture_limit` bytes, since the last marker
//! and the runtime's fault message are written at the end. The diagnostic
//! stream is also scanned in full for runtime messages.
//!
//! When the child ends, by itself or by the budget, its whole process group
//! is killed so leftover descendants cannot hold the pipes open. Draining
//! stops at `budget + DRAIN_GRACE` regardless.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::classify::{MessageScanner, RuntimeMessages, Termination};
use crate::error::SupervisorError;

const READ_CHUNK: usize = 4096;

/// Time allowed after the budget to drain what is left in the pipes.
pub const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// What the supervisor observed about one child.
#[derive(Debug, Clone)]
pub struct ChildOutcome {
    /// How the child ended.
    pub termination: Termination,
    /// Tail of the primary channel (stdout).
    pub primary: String,
    /// Tail of the diagnostic channel (stderr).
    pub diagnostic: String,
    /// Runtime fault messages found anywhere on the diagnostic channel.
    pub runtime: RuntimeMessages,
    /// Bytes dropped from the front of both channels by the capture limit.
    pub discarded_bytes: usize,
    /// Wall-clock time from spawn to reap.
    pub duration: Duration,
}

#[derive(Debug)]
struct Captured {
    text: String,
    discarded: usize,
    runtime: RuntimeMessages,
}

/// Spawn `command`, capture both channels and wait at most `budget`.
///
/// A child still running when the budget expires is killed together with
/// its process group and reported with `timed_out` set.
pub async fn run_child(
    mut command: Command,
    budget: Duration,
    capture_limit: usize,
) -> Result<ChildOutcome, SupervisorError> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);

    let started = Instant::now();
    let drain_deadline = started + budget + DRAIN_GRACE;
    let mut child = command.spawn().map_err(SupervisorError::Spawn)?;
    let pid = child.id();
    debug!(pid, "child spawned");

    let stdout = child
        .stdout
        .take()
        .ok_or(SupervisorError::MissingPipe("stdout"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or(SupervisorError::MissingPipe("stderr"))?;
    let primary_task = tokio::spawn(read_capped(stdout, capture_limit, false, drain_deadline));
    let diagnostic_task = tokio::spawn(read_capped(stderr, capture_limit, true, drain_deadline));

    let (status, timed_out) = match tokio::time::timeout(budget, child.wait()).await {
        Ok(status) => {
            let status = status.map_err(SupervisorError::Wait)?;
            kill_group(pid);
            (status, false)
        }
        Err(_) => {
            warn!(
                pid,
                budget_ms = budget.as_millis() as u64,
                "child exceeded its time budget, killing"
            );
            kill_group(pid);
            if let Err(e) = child.kill().await {
                debug!(error = %e, "child already gone after group kill");
            }
            (child.wait().await.map_err(SupervisorError::Wait)?, true)
        }
    };

    let primary = primary_task.await?.map_err(SupervisorError::Capture)?;
    let diagnostic = diagnostic_task.await?.map_err(SupervisorError::Capture)?;
    let duration = started.elapsed();

    let termination = Termination::from_status(status, timed_out);
    debug!(
        exit_code = termination.exit_code,
        signal = termination.signal,
        timed_out,
        duration_ms = duration.as_millis() as u64,
        "child reaped"
    );

    Ok(ChildOutcome {
        termination,
        primary: primary.text,
        diagnostic: diagnostic.text,
        runtime: diagnostic.runtime,
        discarded_bytes: primary.discarded + diagnostic.discarded,
        duration,
    })
}

/// Kill every process left in the child's group.
///
/// The group outlives a reaped leader while any member is alive, so this
/// also reaches descendants of a child that already exited.
#[cfg(unix)]
fn kill_group(pid: Option<u32>) {
    let Some(pgid) = pid.and_then(|pid| libc::pid_t::try_from(pid).ok()) else {
        return;
    };
    // SAFETY: kill(2) has no memory-safety preconditions; the child leads
    // its own process group, so -pgid targets only the child and its
    // descendants.
    let result = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if result != 0 {
        debug!(
            pgid,
            error = %std::io::Error::last_os_error(),
            "process group kill found nothing to kill"
        );
    }
}

#[cfg(not(unix))]
fn kill_group(_pid: Option<u32>) {}

async fn read_capped<R>(
    mut reader: R,
    limit: usize,
    scan: bool,
    deadline: Instant,
) -> std::io::Result<Captured>
where
    R: AsyncRead + Unpin,
{
    let mut kept: Vec<u8> = Vec::with_capacity(limit.min(READ_CHUNK));
    let mut chunk = [0u8; READ_CHUNK];
    let mut discarded = 0usize;
    let mut scanner = MessageScanner::new();

    loop {
        let n = match tokio::time::timeout_at(deadline, reader.read(&mut chunk)).await {
            Ok(read) => read?,
            Err(_) => {
                warn!("pipe still open past the drain deadline, keeping partial capture");
                break;
            }
        };
        if n == 0 {
            break;
        }
        if scan {
            scanner.feed(&chunk[..n]);
        }
        kept.extend_from_slice(&chunk[..n]);
        let excess = kept.len().saturating_sub(limit);
        if excess > 0 {
            kept.drain(..excess);
            discarded += excess;
        }
    }

    let start = if discarded > 0 { tail_start(&kept) } else { 0 };
    Ok(Captured {
        text: String::from_utf8_lossy(&kept[start..]).into_owned(),
        discarded: discarded + start,
        runtime: scanner.finish(),
    })
}

/// Where a truncated capture should start.
///
/// The partial first line is dropped when a complete non-blank line follows
/// it; otherwise the capture starts at the first char boundary.
fn tail_start(kept: &[u8]) -> usize {
    if let Some(newline) = kept.iter().position(|&b| b == b'\n') {
        let rest = &kept[newline + 1..];
        if rest.iter().any(|b| !b.is_ascii_whitespace()) {
            return newline + 1;
        }
    }
    kept.iter()
        .position(|&b| !is_continuation_byte(b))
        .unwrap_or(kept.len())
}

fn is_continuation_byte(byte: u8) -> bool {
    byte & 0b1100_0000 == 0b1000_0000
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::classify::classify;
    use faultdrill_core::report::last_output;
    use faultdrill_core::types::FaultKind;
    use tokio::io::AsyncWriteExt;

    fn shell(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    const BUDGET: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn captures_channels_separately() {
        let outcome = run_child(shell("echo out; echo err >&2"), BUDGET, 1024)
            .await
            .expect("child should run");

        assert_eq!(outcome.primary, "out\n");
        assert_eq!(outcome.diagnostic, "err\n");
        assert_eq!(outcome.termination.exit_code, Some(0));
        assert!(!outcome.termination.timed_out);
    }

    #[tokio::test]
    async fn reports_terminating_signal() {
        let outcome = run_child(shell("echo 'Hello, world!'; kill -SEGV $$"), BUDGET, 1024)
            .await
            .expect("child should run");

        assert_eq!(outcome.primary, "Hello, world!\n");
        assert_eq!(outcome.termination.signal, Some(libc::SIGSEGV));
        assert_eq!(outcome.termination.exit_code, None);
    }

    #[tokio::test]
    async fn kills_child_that_exceeds_budget() {
        let outcome = run_child(
            shell("echo spinning; sleep 30"),
            Duration::from_millis(300),
            1024,
        )
        .await
        .expect("child should run");

        assert!(outcome.termination.timed_out);
        assert_eq!(outcome.primary, "spinning\n");
        assert!(
            outcome.duration < Duration::from_secs(10),
            "grandchild sleep must not hold the pipes open: {:?}",
            outcome.duration
        );
    }

    #[tokio::test]
    async fn caps_capture_and_drains_the_rest() {
        let outcome = run_child(
            shell("head -c 100000 /dev/zero | tr '\\0' 'x'"),
            BUDGET,
            16,
        )
        .await
        .expect("child should run");

        assert_eq!(outcome.primary, "x".repeat(16));
        assert_eq!(outcome.discarded_bytes, 100_000 - 16);
        assert_eq!(outcome.termination.exit_code, Some(0));
    }

    #[tokio::test]
    async fn stdin_is_null() {
        let outcome = run_child(shell("cat; echo done"), BUDGET, 1024)
            .await
            .expect("child should run");
        assert_eq!(outcome.primary, "done\n");
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let err = run_child(
            Command::new("/nonexistent/faultdrill-child"),
            BUDGET,
            1024,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SupervisorError::Spawn(_)));
    }

    #[tokio::test]
    async fn capture_limit_keeps_tail_and_runtime_messages() {
        // Given: a bounds abort whose marker and message are followed by noise
        let script = "yes y | head -n 500; echo 'function c start'; echo; \
                      echo 'index out of bounds: the len is 0 but the index is 42' >&2; \
                      head -c 20000 /dev/zero | tr '\\0' 'z' >&2; kill -ABRT $$";

        // When: the capture limit is far smaller than the output
        let outcome = run_child(shell(script), BUDGET, 40)
            .await
            .expect("child should run");

        // Then: the last marker and the fault kind survive
        assert!(outcome.primary.len() <= 40);
        assert_eq!(
            last_output(&outcome.primary).as_deref(),
            Some("function c start")
        );
        assert!(outcome.runtime.bounds_violation);
        assert!(!outcome.diagnostic.contains("index out of bounds"));
        assert_eq!(
            classify(&outcome.termination, &outcome.runtime),
            FaultKind::ContainerBoundsViolation
        );
        assert!(outcome.discarded_bytes > 0);
    }

    #[tokio::test]
    async fn descendants_of_an_exited_child_do_not_extend_the_budget() {
        // Given: a child that exits at once but leaves a background job on its pipes
        let script = "echo 'Hello, world!'; sleep 6 & exit 0";

        // When
        let outcome = run_child(shell(script), Duration::from_millis(500), 1024)
            .await
            .expect("child should run");

        // Then: the leftover group is killed and the capture ends promptly
        assert!(
            outcome.duration < Duration::from_secs(3),
            "took {:?}",
            outcome.duration
        );
        assert_eq!(outcome.termination.exit_code, Some(0));
        assert!(!outcome.termination.timed_out);
        assert_eq!(outcome.primary, "Hello, world!\n");
    }

    #[tokio::test]
    async fn drain_stops_at_deadline_with_partial_capture() {
        let (mut writer, reader) = tokio::io::duplex(64);
        writer.write_all(b"partial\n").await.unwrap();

        let deadline = Instant::now() + Duration::from_millis(100);
        let captured = read_capped(reader, 1024, false, deadline).await.unwrap();

        assert_eq!(captured.text, "partial\n");
        assert_eq!(captured.discarded, 0);
        drop(writer);
    }

    #[test]
    fn tail_start_drops_partial_first_line() {
        let kept = b"tart\nfunction c start\n\n";
        assert_eq!(tail_start(kept), 5);
    }

    #[test]
    fn tail_start_keeps_single_line_from_char_boundary() {
        let text = "\u{e9}\u{e9}\u{e9}\u{e9}";
        let kept = &text.as_bytes()[1..];
        let start = tail_start(kept);
        assert_eq!(start, 1);
        assert_eq!(std::str::from_utf8(&kept[start..]).unwrap(), "\u{e9}\u{e9}\u{e9}");
    }

    #[test]
    fn tail_start_keeps_partial_line_when_nothing_follows() {
        assert_eq!(tail_start(b"yyyy\n\n"), 0);
    }
}
