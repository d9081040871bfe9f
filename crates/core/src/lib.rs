//! faultdrill 공통 크레이트
//!
//! 시나리오 러너, 슈퍼바이저, CLI가 공유하는 타입을 정의합니다.
//!
//! - [`types`]: 폴트 종류, 채널, 출력 이벤트, 시나리오 명세
//! - [`report`]: 슈퍼바이저가 생성하는 실행 리포트
//! - [`config`]: `faultdrill.toml` 설정
//! - [`error`]: 도메인 에러
//! - [`exit_code`]: 프로세스 종료 코드 규약

pub mod config;
pub mod error;
pub mod exit_code;
pub mod report;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, FaultdrillError, ScenarioError};

// 설정
pub use config::FaultdrillConfig;

// 리포트
pub use report::{HookReport, RunReport, RunStatus, ScenarioReport};

// 도메인 타입
pub use types::{Channel, FaultKind, HookPoint, OutputEvent, ScenarioSpec, TerminationMode};
