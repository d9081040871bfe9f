//! 에러 타입: 도메인별 에러 정의

/// faultdrill 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum FaultdrillError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 시나리오 실행 에러
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 시나리오/훅 내부에서 발생하는 에러
///
/// 러너는 이 에러를 잡지 않고 진입점까지 그대로 전파합니다.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// 호출 체인 깊은 곳에서 발생한 논리 에러
    #[error("logic error: {0}")]
    Logic(String),

    /// 출력 채널 쓰기 실패
    #[error("output channel write failed: {0}")]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logic_error_display_carries_message() {
        let err = ScenarioError::Logic("blargh!".to_owned());
        assert_eq!(err.to_string(), "logic error: blargh!");
    }

    #[test]
    fn scenario_error_converts_into_top_level() {
        let err: FaultdrillError = ScenarioError::Logic("boom".to_owned()).into();
        assert!(matches!(err, FaultdrillError::Scenario(_)));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn config_error_display_names_field() {
        let err = ConfigError::InvalidValue {
            field: "supervisor.policy".to_owned(),
            reason: "must be one of: isolate, halt".to_owned(),
        };
        assert!(err.to_string().contains("supervisor.policy"));
    }
}
