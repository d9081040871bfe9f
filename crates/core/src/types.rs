//! 도메인 타입: 러너와 슈퍼바이저가 공유하는 공통 타입
//!
//! 시나리오 명세([`ScenarioSpec`])는 러너가 정적으로 선언하고,
//! 슈퍼바이저는 이를 기준으로 관측 결과를 판정합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 폴트 종류
///
/// 시나리오가 선언하는 종류와 슈퍼바이저가 관측하는 종류가 같은 열거형을 사용합니다.
/// `Timeout`, `HarnessSelfTestFailure`, `Unrecognized`는 슈퍼바이저만 생성합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaultKind {
    /// 정상 종료
    None,
    /// 스택 고갈
    StackExhaustion,
    /// 잘못된 메모리 접근
    InvalidMemoryAccess,
    /// 컨테이너 범위 초과 접근
    ContainerBoundsViolation,
    /// 호출 체인을 거쳐 전파된 논리 에러
    PropagatedLogicError,
    /// 슈퍼바이저 시간 예산 초과로 강제 종료
    Timeout,
    /// 하네스 자체 결함 (불일치, 훅 폴트)
    HarnessSelfTestFailure,
    /// 알려진 형태로 분류할 수 없는 비정상 종료
    Unrecognized,
}

impl FaultKind {
    /// 정상 종료 여부
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// 리포트/로그에 쓰는 고정 문자열
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::StackExhaustion => "StackExhaustion",
            Self::InvalidMemoryAccess => "InvalidMemoryAccess",
            Self::ContainerBoundsViolation => "ContainerBoundsViolation",
            Self::PropagatedLogicError => "PropagatedLogicError",
            Self::Timeout => "Timeout",
            Self::HarnessSelfTestFailure => "HarnessSelfTestFailure",
            Self::Unrecognized => "Unrecognized",
        }
    }

    /// 이 종류가 발생했을 때 기대되는 프로세스 종료 방식
    pub fn termination(&self) -> TerminationMode {
        match self {
            Self::None => TerminationMode::Continues,
            Self::PropagatedLogicError | Self::HarnessSelfTestFailure => TerminationMode::Exits,
            Self::StackExhaustion | Self::ContainerBoundsViolation | Self::Unrecognized => {
                TerminationMode::Aborts
            }
            Self::InvalidMemoryAccess | Self::Timeout => TerminationMode::Killed,
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 프로세스 종료 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationMode {
    /// 프로세스가 계속 진행 (다음 시나리오로)
    Continues,
    /// 에러 상태 코드로 종료
    Exits,
    /// 런타임이 abort
    Aborts,
    /// 시그널로 강제 종료 (OS 또는 슈퍼바이저)
    Killed,
}

impl fmt::Display for TerminationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Continues => "continues",
            Self::Exits => "exits",
            Self::Aborts => "aborts",
            Self::Killed => "killed",
        };
        f.write_str(s)
    }
}

/// 출력 채널
///
/// `Primary`는 stdout, `Diagnostic`은 stderr에 대응합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// 주 출력 (stdout)
    Primary,
    /// 진단 출력 (stderr)
    Diagnostic,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Diagnostic => f.write_str("diagnostic"),
        }
    }
}

/// 출력 이벤트: 순서 번호가 붙은 (채널, 조각) 쌍
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEvent {
    /// 전체 싱크 기준 기록 순서
    pub seq: u64,
    /// 기록된 채널
    pub channel: Channel,
    /// 기록된 텍스트 조각 (개행 포함 가능)
    pub text: String,
}

/// 훅 위치
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPoint {
    /// 모든 시나리오 이전
    Before,
    /// 모든 시나리오 이후
    After,
}

impl HookPoint {
    /// CLI 인자/리포트에 쓰는 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookPoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            other => Err(format!("unknown hook '{other}', expected 'before' or 'after'")),
        }
    }
}

/// 시나리오 명세
///
/// 러너가 실행하는 절차와 분리된, 슈퍼바이저가 판정에 사용하는 메타데이터입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// 시나리오 이름 (실행 내 고유)
    pub name: String,
    /// 선언된 폴트 종류
    pub kind: FaultKind,
    /// 폴트 직전 마지막으로 관측되어야 하는 주 채널 출력
    pub expected_output: Option<String>,
    /// 기대 종료 방식
    pub termination: TerminationMode,
}

impl ScenarioSpec {
    /// 폴트 종류로부터 종료 방식을 유도하여 명세를 생성합니다.
    pub fn new(name: impl Into<String>, kind: FaultKind) -> Self {
        Self {
            name: name.into(),
            kind,
            expected_output: None,
            termination: kind.termination(),
        }
    }

    /// 기대 마지막 출력을 지정합니다.
    pub fn with_expected_output(mut self, marker: impl Into<String>) -> Self {
        self.expected_output = Some(marker.into());
        self
    }
}

impl fmt::Display for ScenarioSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.kind, self.termination)
    }
}
