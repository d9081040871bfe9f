//! 폴트 시나리오 카탈로그와 인프로세스 러너
//!
//! 각 시나리오는 정확히 하나의 폴트 종류(인터리빙 시나리오는 하나의 출력 순서 조건)를
//! 결정적으로 유발하는 절차입니다. [`Runner`]는 `before` 훅, 선언 순서대로의 시나리오,
//! `after` 훅을 실행하며 [`OutputSink`]에 직접 기록합니다.
//!
//! # 모듈 구성
//!
//! - [`sink`]: 주/진단 채널 싱크 (stdout/stderr, 인메모리)
//! - [`chain`]: 폴트 위치를 고정하는 호출 체인
//! - [`hooks`]: `before`/`after` 훅을 담는 실행 설정
//! - [`scenario`]: 개별 폴트 시나리오
//! - [`catalog`]: 이름이 고유한 시나리오 목록
//! - [`runner`]: 실행 진입점
//!
//! 러너는 폴트를 가로채지 않습니다. 논리 에러는 [`RunnerError`]로 호출자에게 전파되고,
//! 하드 폴트(스택 오버플로, 잘못된 메모리 접근, 범위 초과)는 프로세스를 종료시키며
//! 외부 슈퍼바이저가 분류합니다.
//!
//! # 사용 예시
//!
//! ```no_run
//! use faultdrill_scenarios::{Runner, RunConfig, StdSink, catalog};
//!
//! # fn main() -> Result<(), faultdrill_scenarios::RunnerError> {
//! let runner = Runner::new(catalog::standard()?, RunConfig::standard());
//! let mut sink = StdSink::new();
//! runner.run_scenario("coutCerrMixTest", &mut sink)?;
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod chain;
pub mod error;
pub mod hooks;
pub mod runner;
pub mod scenario;
pub mod sink;

pub use catalog::Catalog;
pub use chain::CallChain;
pub use error::RunnerError;
pub use hooks::{Hook, RunConfig};
pub use runner::{RunSummary, Runner};
pub use scenario::{Procedure, Scenario};
pub use sink::{MemorySink, OutputSink, StdSink};
