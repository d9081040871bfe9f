//! 시나리오: 이름, 선언된 폴트 종류, 실행 절차의 묶음
//!
//! | 이름 | 폴트 종류 | 모듈 |
//! |------|-----------|------|
//! | `exceptionTest` | ContainerBoundsViolation | [`bounds`] |
//! | `errorTest` | PropagatedLogicError | [`logic`] |
//! | `stackOverflowTest` | StackExhaustion | [`stack`] |
//! | `segfaultTest` | InvalidMemoryAccess | [`memory`] |
//! | `timeoutTest` | Timeout | [`runaway`] |
//! | `coutCerrMixTest` | None | [`interleave`] |

pub mod bounds;
pub mod interleave;
pub mod logic;
pub mod memory;
pub mod runaway;
pub mod stack;

use std::fmt;

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::{FaultKind, ScenarioSpec};

use crate::sink::OutputSink;

/// 시나리오 실행 절차
///
/// 하드 폴트 시나리오는 반환하지 않습니다.
pub type Procedure = fn(&mut dyn OutputSink) -> Result<(), ScenarioError>;

/// 명세와 절차를 묶은 시나리오
#[derive(Clone)]
pub struct Scenario {
    spec: ScenarioSpec,
    procedure: Procedure,
}

impl Scenario {
    /// 시나리오를 생성합니다.
    pub fn new(spec: ScenarioSpec, procedure: Procedure) -> Self {
        Self { spec, procedure }
    }

    /// 시나리오 이름
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// 선언된 폴트 종류
    pub fn kind(&self) -> FaultKind {
        self.spec.kind
    }

    /// 슈퍼바이저에 넘길 명세
    pub fn spec(&self) -> &ScenarioSpec {
        &self.spec
    }

    /// 절차를 실행합니다. 에러는 가공 없이 반환됩니다.
    pub fn invoke(&self, sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
        (self.procedure)(sink)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use faultdrill_core::types::Channel;

    fn hello(sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
        sink.line(Channel::Primary, "hello")?;
        Ok(())
    }

    #[test]
    fn scenario_exposes_spec_fields() {
        let scenario = Scenario::new(ScenarioSpec::new("helloTest", FaultKind::None), hello);
        assert_eq!(scenario.name(), "helloTest");
        assert_eq!(scenario.kind(), FaultKind::None);
        assert_eq!(scenario.spec().name, "helloTest");
    }

    #[test]
    fn invoke_runs_procedure() {
        let scenario = Scenario::new(ScenarioSpec::new("helloTest", FaultKind::None), hello);
        let mut sink = MemorySink::new();
        scenario.invoke(&mut sink).unwrap();
        assert_eq!(sink.lines(Channel::Primary), vec!["hello"]);
    }
}
