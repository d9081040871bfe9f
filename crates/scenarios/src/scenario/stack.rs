//! `stackOverflowTest`: 무한 자기 재귀로 스택 고갈
//!
//! 프레임마다 큰 버퍼를 잡고, 버퍼 값을 읽어(최적화기에 불투명하게) 조건부로 출력합니다.
//! 재귀 호출 뒤에 버퍼 값을 더하므로 꼬리 호출이 아니며 루프로 바뀌지 않습니다.

use std::hint::black_box;

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::{Channel, FaultKind, ScenarioSpec};

use crate::scenario::Scenario;
use crate::sink::OutputSink;

/// 시나리오 이름
pub const NAME: &str = "stackOverflowTest";

/// 프레임당 버퍼 크기 (u64 단위, 4KiB)
pub const FRAME_WORDS: usize = 512;

/// 진행 마커 간격
pub const REPORT_EVERY: u64 = 1000;

/// 카탈로그 항목
pub fn scenario() -> Scenario {
    // 마지막 진행 마커는 플랫폼 스택 크기에 따라 달라지므로 기대 출력을 고정하지 않습니다.
    Scenario::new(ScenarioSpec::new(NAME, FaultKind::StackExhaustion), run)
}

/// `n`번째 프레임의 진행 마커
pub fn progress_marker(n: u64) -> String {
    format!("stack overflow n={n}")
}

fn run(sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
    let depth = recurse(sink, 0)?;
    sink.line(Channel::Primary, &format!("returned from depth {depth}"))?;
    Ok(())
}

#[inline(never)]
#[allow(unconditional_recursion)]
fn recurse(sink: &mut dyn OutputSink, n: u64) -> Result<u64, ScenarioError> {
    let frame = black_box([0u64; FRAME_WORDS]);
    if frame[0] != 0 || n % REPORT_EVERY == 0 {
        sink.line(Channel::Primary, &progress_marker(n))?;
    }
    let deeper = recurse(sink, n + 1)?;
    Ok(deeper.wrapping_add(frame[(n as usize) % FRAME_WORDS]))
}
