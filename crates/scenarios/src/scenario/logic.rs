//! `errorTest`: 호출 체인을 거쳐 전파되는 논리 에러
//!
//! `c`가 `blargh!` 논리 에러를 일으키면 `?`로 모든 프레임을 지나 진입점까지 올라갑니다.
//! 러너는 이를 잡지 않으며, 프로세스는 논리 에러 종료 코드로 끝납니다.

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::{Channel, FaultKind, ScenarioSpec};

use crate::chain::CallChain;
use crate::scenario::Scenario;
use crate::sink::OutputSink;

/// 시나리오 이름
pub const NAME: &str = "errorTest";

/// 논리 에러 메시지
pub const MESSAGE: &str = "blargh!";

/// 카탈로그 항목
pub fn scenario() -> Scenario {
    Scenario::new(
        ScenarioSpec::new(NAME, FaultKind::PropagatedLogicError)
            .with_expected_output("function c start"),
        run,
    )
}

fn run(sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
    CallChain::announced(&["a", "b", "c"]).invoke(sink, raise)
}

fn raise(sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
    sink.line(Channel::Primary, "")?;
    Err(ScenarioError::Logic(MESSAGE.to_owned()))
}
