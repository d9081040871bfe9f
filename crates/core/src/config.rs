//! 설정 관리: faultdrill.toml 파싱 및 런타임 설정
//!
//! [`FaultdrillConfig`]는 모든 구성 요소의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`FAULTDRILL_SUPERVISOR_POLICY=halt` 형식)
//! 3. 설정 파일 (`faultdrill.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), faultdrill_core::error::FaultdrillError> {
//! use faultdrill_core::config::FaultdrillConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = FaultdrillConfig::load("faultdrill.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = FaultdrillConfig::parse("[supervisor]\npolicy = \"halt\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, FaultdrillError};

/// 허용되는 격리 정책 이름
pub const POLICIES: [&str; 2] = ["isolate", "halt"];

/// faultdrill 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FaultdrillConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 슈퍼바이저 설정
    #[serde(default)]
    pub supervisor: SupervisorConfig,
    /// 시나리오 선택
    #[serde(default)]
    pub scenarios: ScenarioSelection,
}

impl FaultdrillConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, FaultdrillError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 경로가 주어지면 파일에서, 없으면 기본값에서 시작합니다.
    ///
    /// 두 경우 모두 환경변수 오버라이드와 검증을 거칩니다.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, FaultdrillError> {
        match path {
            Some(path) => Self::load(path).await,
            None => {
                let mut config = Self::default();
                config.apply_env_overrides();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, FaultdrillError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FaultdrillError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                FaultdrillError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, FaultdrillError> {
        toml::from_str(toml_str).map_err(|e| {
            FaultdrillError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `FAULTDRILL_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "FAULTDRILL_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "FAULTDRILL_GENERAL_LOG_FORMAT");

        // Supervisor
        override_string(&mut self.supervisor.policy, "FAULTDRILL_SUPERVISOR_POLICY");
        override_u64(
            &mut self.supervisor.scenario_timeout_ms,
            "FAULTDRILL_SUPERVISOR_SCENARIO_TIMEOUT_MS",
        );
        override_u64(
            &mut self.supervisor.hook_timeout_ms,
            "FAULTDRILL_SUPERVISOR_HOOK_TIMEOUT_MS",
        );
        override_usize(
            &mut self.supervisor.capture_limit_bytes,
            "FAULTDRILL_SUPERVISOR_CAPTURE_LIMIT_BYTES",
        );

        // Scenarios
        override_csv(&mut self.scenarios.only, "FAULTDRILL_SCENARIOS_ONLY");
        override_csv(&mut self.scenarios.skip, "FAULTDRILL_SCENARIOS_SKIP");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), FaultdrillError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // policy 검증
        if !POLICIES.contains(&self.supervisor.policy.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "supervisor.policy".to_owned(),
                reason: format!("must be one of: {}", POLICIES.join(", ")),
            }
            .into());
        }

        // 시간 예산 검증
        if self.supervisor.scenario_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "supervisor.scenario_timeout_ms".to_owned(),
                reason: "must be greater than zero".to_owned(),
            }
            .into());
        }
        if self.supervisor.hook_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "supervisor.hook_timeout_ms".to_owned(),
                reason: "must be greater than zero".to_owned(),
            }
            .into());
        }

        if self.supervisor.capture_limit_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "supervisor.capture_limit_bytes".to_owned(),
                reason: "must be greater than zero".to_owned(),
            }
            .into());
        }

        // only/skip 동시 지정 검증
        if let Some(name) = self
            .scenarios
            .only
            .iter()
            .find(|name| self.scenarios.skip.contains(name))
        {
            return Err(ConfigError::InvalidValue {
                field: "scenarios.skip".to_owned(),
                reason: format!("'{name}' is listed in both only and skip"),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 슈퍼바이저 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupervisorConfig {
    /// 격리 정책 (isolate, halt)
    pub policy: String,
    /// 시나리오당 시간 예산 (밀리초)
    pub scenario_timeout_ms: u64,
    /// 훅당 시간 예산 (밀리초)
    pub hook_timeout_ms: u64,
    /// 채널별 캡처 상한 (바이트)
    pub capture_limit_bytes: usize,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            policy: "isolate".to_owned(),
            scenario_timeout_ms: 5_000,
            hook_timeout_ms: 5_000,
            capture_limit_bytes: 64 * 1024, // 64KB
        }
    }
}

/// 시나리오 선택
///
/// `only`가 비어있으면 카탈로그 전체가 대상입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSelection {
    /// 실행할 시나리오 (비어있으면 전체)
    pub only: Vec<String>,
    /// 제외할 시나리오
    pub skip: Vec<String>,
}

impl ScenarioSelection {
    /// 주어진 시나리오가 선택에 포함되는지 여부
    pub fn includes(&self, name: &str) -> bool {
        let listed = self.only.is_empty() || self.only.iter().any(|n| n == name);
        listed && !self.skip.iter().any(|n| n == name)
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_u64(target: &mut u64, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u64>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u64 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
