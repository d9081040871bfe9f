//! `exceptionTest`: 호출 체인 가장 안쪽의 범위 초과 접근
//!
//! `a → b → c` 각 프레임이 시작 마커를 기록하고, `c`는 빈 줄을 하나 더 기록한 뒤
//! 길이 0인 `Vec`의 42번 인덱스를 읽습니다. 제어가 돌아오지 않으므로
//! `function … end` 마커는 기록되지 않습니다.

use std::hint::black_box;

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::{Channel, FaultKind, ScenarioSpec};

use crate::chain::CallChain;
use crate::scenario::Scenario;
use crate::sink::OutputSink;

/// 시나리오 이름
pub const NAME: &str = "exceptionTest";

/// 폴트 직전 마지막 출력
pub const LAST_MARKER: &str = "function c start";

/// 읽으려는 인덱스
pub const PROBE_INDEX: usize = 42;

/// 체인 프레임
pub const FRAMES: [&str; 3] = ["a", "b", "c"];

/// 카탈로그 항목
pub fn scenario() -> Scenario {
    Scenario::new(
        ScenarioSpec::new(NAME, FaultKind::ContainerBoundsViolation).with_expected_output(LAST_MARKER),
        run,
    )
}

fn run(sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
    let value = CallChain::announced(&FRAMES).invoke(sink, read_past_end)?;
    sink.line(Channel::Primary, &value.to_string())?;
    Ok(())
}

#[inline(never)]
fn read_past_end(sink: &mut dyn OutputSink) -> Result<i32, ScenarioError> {
    sink.line(Channel::Primary, "")?;
    let values: Vec<i32> = black_box(Vec::new());
    let value = values[black_box(PROBE_INDEX)];
    Ok(value)
}
