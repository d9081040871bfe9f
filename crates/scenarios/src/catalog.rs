//! 시나리오 카탈로그: 이름이 고유한 시나리오의 선언 순서 목록
//!
//! 표준 카탈로그의 순서는 고정입니다. `None` 시나리오가 마지막이어서,
//! 격리 실행 시 앞선 폴트 시나리오들이 이를 막지 않는지 확인할 수 있습니다.

use faultdrill_core::config::ScenarioSelection;
use faultdrill_core::types::ScenarioSpec;

use crate::error::RunnerError;
use crate::scenario::{self, Scenario};

/// 시나리오 목록
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    scenarios: Vec<Scenario>,
}

impl Catalog {
    /// 빈 카탈로그
    pub fn new() -> Self {
        Self::default()
    }

    /// 시나리오 목록으로 카탈로그를 만듭니다. 이름 중복 시 실패합니다.
    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Result<Self, RunnerError> {
        let mut catalog = Self::new();
        for scenario in scenarios {
            catalog.register(scenario)?;
        }
        Ok(catalog)
    }

    /// 시나리오를 끝에 등록합니다.
    pub fn register(&mut self, scenario: Scenario) -> Result<(), RunnerError> {
        if self.get(scenario.name()).is_some() {
            return Err(RunnerError::DuplicateScenario(scenario.name().to_owned()));
        }
        self.scenarios.push(scenario);
        Ok(())
    }

    /// 이름으로 조회
    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name() == name)
    }

    /// 선언 순서 순회
    pub fn iter(&self) -> impl Iterator<Item = &Scenario> {
        self.scenarios.iter()
    }

    /// 등록된 시나리오 수
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// 비어있는지 여부
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// 슈퍼바이저에 넘길 명세 목록 (선언 순서)
    pub fn specs(&self) -> Vec<ScenarioSpec> {
        self.scenarios.iter().map(|s| s.spec().clone()).collect()
    }

    /// 선택 조건에 맞는 시나리오만 남긴 카탈로그 (순서 유지)
    ///
    /// `only`에 카탈로그에 없는 이름이 있으면 실패합니다.
    pub fn select(&self, selection: &ScenarioSelection) -> Result<Self, RunnerError> {
        if let Some(unknown) = selection.only.iter().find(|name| self.get(name).is_none()) {
            return Err(RunnerError::UnknownScenario(unknown.clone()));
        }
        Ok(Self {
            scenarios: self
                .scenarios
                .iter()
                .filter(|s| selection.includes(s.name()))
                .cloned()
                .collect(),
        })
    }
}

/// 표준 카탈로그
pub fn standard() -> Result<Catalog, RunnerError> {
    Catalog::from_scenarios(vec![
        scenario::bounds::scenario(),
        scenario::logic::scenario(),
        scenario::stack::scenario(),
        scenario::memory::scenario(),
        scenario::runaway::scenario(),
        scenario::interleave::scenario(),
    ])
}
