//! 실행 설정: `before`/`after` 훅
//!
//! 전역 함수 대신 명시적인 [`RunConfig`]가 훅을 보관하고 러너 생성 시 전달됩니다.
//! 훅은 실행 전체를 한 번씩 감싸는 제어 골격이며 시험 대상이 아닙니다.

use std::fmt;

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::{Channel, HookPoint};

use crate::sink::OutputSink;

/// `before` 훅 마커
pub const BEFORE_MARKER: &str = "THIS IS BEFORE!";

/// `after` 훅 마커
pub const AFTER_MARKER: &str = "THIS IS AFTER!";

/// 훅당 마커 반복 횟수
pub const MARKER_REPEAT: usize = 3;

/// 훅 호출 가능 객체
pub type Hook = Box<dyn Fn(&mut dyn OutputSink) -> Result<(), ScenarioError> + Send + Sync>;

/// 훅을 담는 실행 설정
#[derive(Default)]
pub struct RunConfig {
    before: Option<Hook>,
    after: Option<Hook>,
}

impl RunConfig {
    /// 훅이 없는 설정
    pub fn new() -> Self {
        Self::default()
    }

    /// 표준 마커 훅 (`THIS IS BEFORE!` / `THIS IS AFTER!` 각 3회)
    pub fn standard() -> Self {
        Self::new()
            .with_before(Box::new(|sink: &mut dyn OutputSink| {
                emit_marker(sink, BEFORE_MARKER)
            }))
            .with_after(Box::new(|sink: &mut dyn OutputSink| {
                emit_marker(sink, AFTER_MARKER)
            }))
    }

    /// `before` 훅을 지정합니다.
    pub fn with_before(mut self, hook: Hook) -> Self {
        self.before = Some(hook);
        self
    }

    /// `after` 훅을 지정합니다.
    pub fn with_after(mut self, hook: Hook) -> Self {
        self.after = Some(hook);
        self
    }

    /// 위치에 해당하는 훅
    pub fn hook(&self, point: HookPoint) -> Option<&Hook> {
        match point {
            HookPoint::Before => self.before.as_ref(),
            HookPoint::After => self.after.as_ref(),
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .finish()
    }
}

/// 마커 줄을 [`MARKER_REPEAT`]번 주 채널에 기록합니다.
pub fn emit_marker(sink: &mut dyn OutputSink, marker: &str) -> Result<(), ScenarioError> {
    for _ in 0..MARKER_REPEAT {
        sink.line(Channel::Primary, marker)?;
    }
    Ok(())
}
