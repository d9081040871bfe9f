//! `timeoutTest`: 슈퍼바이저 시간 예산으로만 끝나는 시나리오
//!
//! 시작 마커를 기록한 뒤 짧게 잠들기를 영원히 반복합니다. 입력을 기다리지 않습니다.

use std::time::Duration;

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::{Channel, FaultKind, ScenarioSpec};

use crate::scenario::Scenario;
use crate::sink::OutputSink;

/// 시나리오 이름
pub const NAME: &str = "timeoutTest";

/// 시작 마커
pub const START_MARKER: &str = "spinning until the time budget expires";

const SLICE: Duration = Duration::from_millis(50);

/// 카탈로그 항목
pub fn scenario() -> Scenario {
    Scenario::new(
        ScenarioSpec::new(NAME, FaultKind::Timeout).with_expected_output(START_MARKER),
        run,
    )
}

fn run(sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
    sink.line(Channel::Primary, START_MARKER)?;
    loop {
        std::thread::sleep(SLICE);
    }
}
