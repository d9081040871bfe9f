//! `segfaultTest`: 잘못된 포인터 역참조
//!
//! `Hello, world!`를 기록한 뒤 마커 없는 `segA → segB → segC` 체인 끝에서
//! 0번 페이지 안쪽 주소를 읽습니다. 널 주소 자체를 읽으면 디버그 빌드의
//! 널 포인터 검사가 패닉으로 바꿔 버리므로, 같은 매핑되지 않은 페이지의
//! 정렬된 0이 아닌 주소를 사용합니다.

use std::hint::black_box;

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::{Channel, FaultKind, ScenarioSpec};

use crate::chain::CallChain;
use crate::scenario::Scenario;
use crate::sink::OutputSink;

/// 시나리오 이름
pub const NAME: &str = "segfaultTest";

/// 폴트 직전 마지막 출력
pub const START_MARKER: &str = "Hello, world!";

/// 읽기 대상 주소 (0번 페이지, 8바이트 정렬)
pub const ZERO_PAGE_PROBE: usize = 0x10;

/// 카탈로그 항목
pub fn scenario() -> Scenario {
    Scenario::new(
        ScenarioSpec::new(NAME, FaultKind::InvalidMemoryAccess).with_expected_output(START_MARKER),
        run,
    )
}

fn run(sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
    sink.line(Channel::Primary, START_MARKER)?;
    let value = CallChain::silent(&["segA", "segB", "segC"]).invoke(sink, |_| Ok(dereference()))?;
    sink.line(Channel::Primary, &value.to_string())?;
    Ok(())
}

#[inline(never)]
fn dereference() -> u64 {
    let probe = std::ptr::without_provenance::<u64>(black_box(ZERO_PAGE_PROBE));
    // SAFETY: 없음. 이 읽기가 시험 대상 폴트이며 프로세스는 여기서 SIGSEGV로 종료됩니다.
    unsafe { std::ptr::read_volatile(probe) }
}
