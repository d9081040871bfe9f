//! 러너 에러 타입 및 종료 코드 매핑

use faultdrill_core::error::ScenarioError;
use faultdrill_core::exit_code;
use faultdrill_core::types::{FaultKind, HookPoint};

/// 인프로세스 러너 에러
///
/// `Scenario` 에러는 시나리오 자신의 폴트가 바깥으로 전파된 것입니다.
/// 러너는 최상위 시나리오 이름만 덧붙이고 삼키지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// 같은 이름으로 두 시나리오가 등록됨
    #[error("duplicate scenario name: {0}")]
    DuplicateScenario(String),

    /// 카탈로그에 없는 시나리오
    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    /// 훅 실패: 항상 하네스 결함
    #[error("hook '{hook}' faulted: {source}")]
    Hook {
        hook: HookPoint,
        #[source]
        source: ScenarioError,
    },

    /// 호출 체인 밖으로 전파된 시나리오 에러
    #[error("scenario '{name}' raised {source}")]
    Scenario {
        name: String,
        #[source]
        source: ScenarioError,
    },

    /// 폴트를 선언한 시나리오가 정상 반환함
    #[error("scenario '{name}' completed normally but declares {declared}")]
    Mismatch { name: String, declared: FaultKind },
}

impl RunnerError {
    /// 슈퍼바이저가 기대하는 프로세스 종료 코드로 매핑합니다.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Scenario {
                source: ScenarioError::Logic(_),
                ..
            } => exit_code::LOGIC_ERROR,
            Self::Scenario {
                source: ScenarioError::Output(_),
                ..
            } => exit_code::IO,
            Self::Hook { .. } | Self::Mismatch { .. } => exit_code::HARNESS_FAILURE,
            Self::DuplicateScenario(_) | Self::UnknownScenario(_) => exit_code::GENERAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logic_error_maps_to_logic_exit_code() {
        let err = RunnerError::Scenario {
            name: "errorTest".to_owned(),
            source: ScenarioError::Logic("blargh!".to_owned()),
        };
        assert_eq!(err.exit_code(), exit_code::LOGIC_ERROR);
        assert_eq!(
            err.to_string(),
            "scenario 'errorTest' raised logic error: blargh!"
        );
    }

    #[test]
    fn hook_fault_is_harness_failure() {
        let err = RunnerError::Hook {
            hook: HookPoint::Before,
            source: ScenarioError::Logic("broken hook".to_owned()),
        };
        assert_eq!(err.exit_code(), exit_code::HARNESS_FAILURE);
        assert!(err.to_string().contains("hook 'before' faulted"));
    }

    #[test]
    fn mismatch_is_harness_failure() {
        let err = RunnerError::Mismatch {
            name: "stackOverflowTest".to_owned(),
            declared: FaultKind::StackExhaustion,
        };
        assert_eq!(err.exit_code(), exit_code::HARNESS_FAILURE);
    }

    #[test]
    fn unknown_scenario_is_general_error() {
        let err = RunnerError::UnknownScenario("nope".to_owned());
        assert_eq!(err.exit_code(), exit_code::GENERAL);
    }

    #[test]
    fn output_failure_is_io_error() {
        let err = RunnerError::Scenario {
            name: "coutCerrMixTest".to_owned(),
            source: ScenarioError::Output(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "closed",
            )),
        };
        assert_eq!(err.exit_code(), exit_code::IO);
    }
}
