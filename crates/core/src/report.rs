//! 실행 리포트: 슈퍼바이저가 시나리오별로 생성하는 구조화된 결과
//!
//! [`RunReport`]는 훅 결과, 시나리오 결과, 전체 상태를 담으며
//! 전체 상태로부터 프로세스 종료 코드를 결정합니다.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::exit_code;
use crate::types::{FaultKind, HookPoint};

/// 시나리오 판정 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioStatus {
    /// 관측 종류 == 선언 종류
    Matched,
    /// 관측 종류 != 선언 종류
    Mismatched,
    /// `halt` 정책 또는 훅 폴트로 실행되지 않음
    Skipped,
}

/// 단일 시나리오 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// 최상위 시나리오 이름 (내부 프레임 이름이 아님)
    pub scenario: String,
    /// 선언된 폴트 종류
    pub declared: FaultKind,
    /// 관측된 폴트 종류 (건너뛴 경우 없음)
    pub observed: Option<FaultKind>,
    /// 판정 상태
    pub status: ScenarioStatus,
    /// 주 채널에서 마지막으로 관측된 비어있지 않은 줄
    pub last_output: Option<String>,
    /// 종료 코드 (시그널 종료 시 없음)
    pub exit_code: Option<i32>,
    /// 종료 시그널 번호
    pub signal: Option<i32>,
    /// 실행 시간 (밀리초)
    pub duration_ms: u64,
}

impl ScenarioReport {
    /// 관측 결과로 리포트를 생성하고 판정합니다.
    pub fn observed(
        scenario: impl Into<String>,
        declared: FaultKind,
        observed: FaultKind,
        last_output: Option<String>,
    ) -> Self {
        let status = if declared == observed {
            ScenarioStatus::Matched
        } else {
            ScenarioStatus::Mismatched
        };
        Self {
            scenario: scenario.into(),
            declared,
            observed: Some(observed),
            status,
            last_output,
            exit_code: None,
            signal: None,
            duration_ms: 0,
        }
    }

    /// 실행되지 않은 시나리오의 리포트를 생성합니다.
    pub fn skipped(scenario: impl Into<String>, declared: FaultKind) -> Self {
        Self {
            scenario: scenario.into(),
            declared,
            observed: None,
            status: ScenarioStatus::Skipped,
            last_output: None,
            exit_code: None,
            signal: None,
            duration_ms: 0,
        }
    }

    /// 선언 종류와 일치했는지 여부
    pub fn is_matched(&self) -> bool {
        self.status == ScenarioStatus::Matched
    }

    /// 사람이 읽는 한 줄 요약
    ///
    /// 예: `scenario exceptionTest failed after emitting: function c start`
    pub fn summary(&self) -> String {
        match (self.observed, &self.last_output) {
            (None, _) => format!("scenario {} skipped", self.scenario),
            (Some(FaultKind::None), _) => format!("scenario {} completed", self.scenario),
            (Some(kind), Some(marker)) => format!(
                "scenario {} failed ({}) after emitting: {}",
                self.scenario, kind, marker
            ),
            (Some(kind), None) => format!(
                "scenario {} failed ({}) before emitting any output",
                self.scenario, kind
            ),
        }
    }
}

/// 훅 실행 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookReport {
    /// 훅 위치
    pub hook: HookPoint,
    /// 관측 종류 (`None` 또는 `HarnessSelfTestFailure`)
    pub observed: FaultKind,
    /// 주 채널 출력 줄 수
    pub marker_lines: usize,
}

impl HookReport {
    /// 훅이 폴트 없이 끝났는지 여부
    pub fn is_clean(&self) -> bool {
        self.observed.is_none()
    }
}

/// 전체 실행 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// 모든 시나리오가 선언과 일치
    Passed,
    /// 불일치 또는 훅 폴트
    Failed,
    /// 불일치는 없으나 `halt` 정책으로 일부 시나리오를 건너뜀
    Halted,
}

impl RunStatus {
    /// 프로세스 종료 코드
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Passed => exit_code::SUCCESS,
            Self::Failed => exit_code::HARNESS_FAILURE,
            Self::Halted => exit_code::HALTED,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Failed => f.write_str("failed"),
            Self::Halted => f.write_str("halted"),
        }
    }
}

/// 전체 실행 리포트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// 실행 ID (UUID v4)
    pub run_id: String,
    /// 격리 정책 이름
    pub policy: String,
    /// 훅 결과 (실행된 순서)
    pub hooks: Vec<HookReport>,
    /// 시나리오 결과 (선언 순서)
    pub scenarios: Vec<ScenarioReport>,
    /// 전체 상태
    pub status: RunStatus,
}

impl RunReport {
    /// 새 실행 ID로 빈 리포트를 생성합니다.
    pub fn new(policy: impl Into<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            policy: policy.into(),
            hooks: Vec::new(),
            scenarios: Vec::new(),
            status: RunStatus::Passed,
        }
    }

    /// 수집된 결과로 전체 상태를 계산합니다.
    ///
    /// 훅 폴트 또는 불일치가 하나라도 있으면 `Failed`,
    /// 그 외에 건너뛴 시나리오가 있으면 `Halted`입니다.
    pub fn finalize(&mut self) {
        let hook_fault = self.hooks.iter().any(|h| !h.is_clean());
        let mismatch = self
            .scenarios
            .iter()
            .any(|s| s.status == ScenarioStatus::Mismatched);
        let skipped = self
            .scenarios
            .iter()
            .any(|s| s.status == ScenarioStatus::Skipped);

        self.status = if hook_fault || mismatch {
            RunStatus::Failed
        } else if skipped {
            RunStatus::Halted
        } else {
            RunStatus::Passed
        };
    }

    /// 이름으로 시나리오 결과를 찾습니다.
    pub fn scenario(&self, name: &str) -> Option<&ScenarioReport> {
        self.scenarios.iter().find(|s| s.scenario == name)
    }

    /// 프로세스 종료 코드
    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }
}

/// 주 채널 캡처에서 마지막 비어있지 않은 줄을 추출합니다.
pub fn last_output(primary: &str) -> Option<String> {
    primary
        .lines()
        .map(str::trim_end)
        .rfind(|line| !line.is_empty())
        .map(str::to_owned)
}
