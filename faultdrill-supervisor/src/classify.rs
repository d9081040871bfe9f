//! Termination classification.
//!
//! The checks run in a fixed order and the first match wins:
//!
//! 1. killed by the time budget -> `Timeout`
//! 2. exit status 0 -> `None`
//! 3. runtime reported a stack overflow on stderr -> `StackExhaustion`
//! 4. terminated by SIGSEGV or SIGBUS -> `InvalidMemoryAccess`
//! 5. runtime reported an out-of-bounds index on stderr -> `ContainerBoundsViolation`
//! 6. exit code 3 -> `PropagatedLogicError`
//! 7. exit code 4 -> `HarnessSelfTestFailure`
//! 8. anything else -> `Unrecognized`
//!
//! The stack overflow check precedes the signal check because the runtime
//! turns a guard-page hit into an abort after printing its message.
//!
//! Runtime messages are detected on the whole diagnostic stream by
//! [`MessageScanner`], not on the capped capture, so a noisy child cannot
//! push them out of view.

use std::process::ExitStatus;

use faultdrill_core::exit_code;
use faultdrill_core::types::FaultKind;

/// Printed by the runtime when a thread exhausts its stack.
pub const STACK_OVERFLOW_MESSAGE: &str = "has overflowed its stack";

/// Printed by the runtime when a slice or vector index is out of range.
pub const BOUNDS_MESSAGE: &str = "index out of bounds";

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    /// Exit code, absent when the child died from a signal.
    pub exit_code: Option<i32>,
    /// Terminating signal number (unix only).
    pub signal: Option<i32>,
    /// Whether the supervisor killed the child for exceeding its budget.
    pub timed_out: bool,
}

impl Termination {
    /// Build from an [`ExitStatus`].
    pub fn from_status(status: ExitStatus, timed_out: bool) -> Self {
        Self {
            exit_code: status.code(),
            signal: terminating_signal(&status),
            timed_out,
        }
    }

    /// Whether the child exited normally with status 0.
    pub fn is_success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(exit_code::SUCCESS)
    }
}

/// Runtime fault messages seen on a child's diagnostic channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeMessages {
    pub stack_overflow: bool,
    pub bounds_violation: bool,
}

impl RuntimeMessages {
    /// Scan a complete diagnostic text.
    pub fn scan(diagnostic: &str) -> Self {
        let mut scanner = MessageScanner::new();
        scanner.feed(diagnostic.as_bytes());
        scanner.finish()
    }
}

/// Incremental search for the runtime messages across read boundaries.
///
/// Keeps only the last `longest message - 1` bytes between chunks.
#[derive(Debug, Default)]
pub struct MessageScanner {
    carry: Vec<u8>,
    found: RuntimeMessages,
}

impl MessageScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk of the stream.
    pub fn feed(&mut self, chunk: &[u8]) {
        let keep = STACK_OVERFLOW_MESSAGE.len().max(BOUNDS_MESSAGE.len()) - 1;

        self.carry.extend_from_slice(chunk);
        if !self.found.stack_overflow && contains(&self.carry, STACK_OVERFLOW_MESSAGE) {
            self.found.stack_overflow = true;
        }
        if !self.found.bounds_violation && contains(&self.carry, BOUNDS_MESSAGE) {
            self.found.bounds_violation = true;
        }

        let excess = self.carry.len().saturating_sub(keep);
        self.carry.drain(..excess);
    }

    pub fn finish(self) -> RuntimeMessages {
        self.found
    }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

#[cfg(unix)]
fn is_memory_signal(signal: i32) -> bool {
    signal == libc::SIGSEGV || signal == libc::SIGBUS
}

#[cfg(not(unix))]
fn is_memory_signal(_signal: i32) -> bool {
    false
}

/// Classify a termination using the runtime messages the child printed.
pub fn classify(termination: &Termination, messages: &RuntimeMessages) -> FaultKind {
    if termination.timed_out {
        return FaultKind::Timeout;
    }
    if termination.is_success() {
        return FaultKind::None;
    }
    if messages.stack_overflow {
        return FaultKind::StackExhaustion;
    }
    if termination.signal.is_some_and(is_memory_signal) {
        return FaultKind::InvalidMemoryAccess;
    }
    if messages.bounds_violation {
        return FaultKind::ContainerBoundsViolation;
    }
    match termination.exit_code {
        Some(exit_code::LOGIC_ERROR) => FaultKind::PropagatedLogicError,
        Some(exit_code::HARNESS_FAILURE) => FaultKind::HarnessSelfTestFailure,
        _ => FaultKind::Unrecognized,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;

    fn exited(code: i32) -> Termination {
        Termination::from_status(ExitStatus::from_raw(code << 8), false)
    }

    fn signaled(signal: i32) -> Termination {
        Termination::from_status(ExitStatus::from_raw(signal), false)
    }

    #[test]
    fn from_status_splits_code_and_signal() {
        let t = exited(3);
        assert_eq!(t.exit_code, Some(3));
        assert_eq!(t.signal, None);

        let t = signaled(libc::SIGSEGV);
        assert_eq!(t.exit_code, None);
        assert_eq!(t.signal, Some(libc::SIGSEGV));
    }

    #[test]
    fn clean_exit_is_none() {
        assert_eq!(classify(&exited(0), &RuntimeMessages::scan("")), FaultKind::None);
        assert!(exited(0).is_success());
    }

    #[test]
    fn timeout_wins_over_everything() {
        let mut t = signaled(libc::SIGKILL);
        t.timed_out = true;
        assert_eq!(
            classify(&t, &RuntimeMessages::scan("thread 'main' has overflowed its stack")),
            FaultKind::Timeout
        );
        assert!(!t.is_success());
    }

    #[test]
    fn stack_overflow_abort_is_stack_exhaustion() {
        let diagnostic = "\nthread 'main' has overflowed its stack\nfatal runtime error: stack overflow\n";
        assert_eq!(
            classify(&signaled(libc::SIGABRT), &RuntimeMessages::scan(diagnostic)),
            FaultKind::StackExhaustion
        );
    }

    #[test]
    fn stack_overflow_reported_via_segv_is_still_stack_exhaustion() {
        assert_eq!(
            classify(&signaled(libc::SIGSEGV), &RuntimeMessages::scan("has overflowed its stack")),
            FaultKind::StackExhaustion
        );
    }

    #[test]
    fn segv_and_bus_are_invalid_memory_access() {
        assert_eq!(
            classify(&signaled(libc::SIGSEGV), &RuntimeMessages::scan("")),
            FaultKind::InvalidMemoryAccess
        );
        assert_eq!(
            classify(&signaled(libc::SIGBUS), &RuntimeMessages::scan("")),
            FaultKind::InvalidMemoryAccess
        );
    }

    #[test]
    fn bounds_panic_is_container_bounds_violation_under_abort_or_unwind() {
        let diagnostic = "thread 'main' panicked at src/scenario/bounds.rs:30:5:\n\
                          index out of bounds: the len is 0 but the index is 42\n";
        assert_eq!(
            classify(&signaled(libc::SIGABRT), &RuntimeMessages::scan(diagnostic)),
            FaultKind::ContainerBoundsViolation
        );
        assert_eq!(
            classify(&exited(101), &RuntimeMessages::scan(diagnostic)),
            FaultKind::ContainerBoundsViolation
        );
    }

    #[test]
    fn dedicated_exit_codes_map_to_their_kinds() {
        assert_eq!(
            classify(&exited(3), &RuntimeMessages::scan("Error: logic error: blargh!")),
            FaultKind::PropagatedLogicError
        );
        assert_eq!(
            classify(&exited(4), &RuntimeMessages::scan("")),
            FaultKind::HarnessSelfTestFailure
        );
    }

    #[test]
    fn anything_else_is_unrecognized() {
        assert_eq!(classify(&exited(1), &RuntimeMessages::scan("")), FaultKind::Unrecognized);
        assert_eq!(
            classify(&signaled(libc::SIGABRT), &RuntimeMessages::scan("")),
            FaultKind::Unrecognized
        );
    }

    #[test]
    fn scanner_finds_messages_split_across_chunks() {
        let text = b"thread 'main' has overflowed its stack\nfatal runtime error\n";
        for split in 1..text.len() {
            let mut scanner = MessageScanner::new();
            scanner.feed(&text[..split]);
            scanner.feed(&text[split..]);
            let found = scanner.finish();
            assert!(found.stack_overflow, "split at {split}");
            assert!(!found.bounds_violation);
        }
    }

    #[test]
    fn scanner_remembers_early_message_after_long_noise() {
        let mut scanner = MessageScanner::new();
        scanner.feed(b"index out of bounds: the len is 0 but the index is 42\n");
        for _ in 0..100 {
            scanner.feed(&[b'y'; 4096]);
        }
        assert!(scanner.finish().bounds_violation);
    }
}
