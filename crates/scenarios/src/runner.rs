//! 러너: `before`, 선언 순서의 시나리오, `after`를 한 번씩 실행하는 진입점
//!
//! 러너는 폴트 핸들러를 설치하지 않습니다. 시나리오 에러는 시나리오 이름만 붙여
//! 그대로 호출자에게 반환되고, 하드 폴트는 프로세스를 종료시킵니다.
//! 폴트를 선언한 시나리오가 정상 반환하면 불일치([`RunnerError::Mismatch`])입니다.

use tracing::{debug, info};

use faultdrill_core::types::HookPoint;

use crate::catalog::Catalog;
use crate::error::RunnerError;
use crate::hooks::RunConfig;
use crate::sink::OutputSink;

/// 인프로세스 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// 정상 완료된 시나리오 이름 (실행 순서)
    pub completed: Vec<String>,
}

/// 시나리오 러너
#[derive(Debug)]
pub struct Runner {
    catalog: Catalog,
    config: RunConfig,
}

impl Runner {
    /// 카탈로그와 실행 설정으로 러너를 생성합니다.
    pub fn new(catalog: Catalog, config: RunConfig) -> Self {
        Self { catalog, config }
    }

    /// 전체 실행: `before` → 모든 시나리오 → `after`
    ///
    /// 첫 번째 에러에서 즉시 반환하며, 이 경우 `after`는 실행되지 않습니다.
    pub fn run(&self, sink: &mut dyn OutputSink) -> Result<RunSummary, RunnerError> {
        self.run_hook(HookPoint::Before, sink)?;

        let mut summary = RunSummary::default();
        for scenario in self.catalog.iter() {
            debug!(scenario = scenario.name(), kind = %scenario.kind(), "invoking scenario");
            self.invoke(scenario.name(), sink)?;
            summary.completed.push(scenario.name().to_owned());
        }

        self.run_hook(HookPoint::After, sink)?;
        info!(completed = summary.completed.len(), "run finished");
        Ok(summary)
    }

    /// 이름으로 시나리오 하나를 실행합니다.
    pub fn run_scenario(&self, name: &str, sink: &mut dyn OutputSink) -> Result<(), RunnerError> {
        self.invoke(name, sink)
    }

    /// 훅 하나를 실행합니다. 지정되지 않은 훅은 아무 것도 하지 않습니다.
    pub fn run_hook(&self, point: HookPoint, sink: &mut dyn OutputSink) -> Result<(), RunnerError> {
        let Some(hook) = self.config.hook(point) else {
            debug!(hook = %point, "no hook configured");
            return Ok(());
        };
        hook(sink).map_err(|source| RunnerError::Hook {
            hook: point,
            source,
        })
    }

    fn invoke(&self, name: &str, sink: &mut dyn OutputSink) -> Result<(), RunnerError> {
        let scenario = self
            .catalog
            .get(name)
            .ok_or_else(|| RunnerError::UnknownScenario(name.to_owned()))?;

        scenario
            .invoke(sink)
            .map_err(|source| RunnerError::Scenario {
                name: scenario.name().to_owned(),
                source,
            })?;

        if !scenario.kind().is_none() {
            return Err(RunnerError::Mismatch {
                name: scenario.name().to_owned(),
                declared: scenario.kind(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::hooks::{AFTER_MARKER, BEFORE_MARKER};
    use crate::scenario::{Scenario, interleave, logic};
    use crate::sink::{MemorySink, OutputSink};
    use faultdrill_core::error::ScenarioError;
    use faultdrill_core::types::{Channel, FaultKind, ScenarioSpec};

    fn quiet(_: &mut dyn OutputSink) -> Result<(), ScenarioError> {
        Ok(())
    }

    fn interleave_only() -> Catalog {
        Catalog::from_scenarios(vec![interleave::scenario()]).unwrap()
    }

    #[test]
    fn run_brackets_scenarios_with_hooks() {
        let runner = Runner::new(interleave_only(), RunConfig::standard());
        let mut sink = MemorySink::new();

        let summary = runner.run(&mut sink).unwrap();

        assert_eq!(summary.completed, vec!["coutCerrMixTest"]);
        let lines = sink.lines(Channel::Primary);
        assert_eq!(&lines[..3], &[BEFORE_MARKER; 3]);
        assert_eq!(&lines[lines.len() - 3..], &[AFTER_MARKER; 3]);
    }

    #[test]
    fn hook_markers_appear_exactly_three_times_and_are_not_interleaved() {
        let runner = Runner::new(interleave_only(), RunConfig::standard());
        let mut sink = MemorySink::new();
        runner.run(&mut sink).unwrap();

        let lines = sink.lines(Channel::Primary);
        let before: Vec<usize> = positions(&lines, BEFORE_MARKER);
        let after: Vec<usize> = positions(&lines, AFTER_MARKER);
        assert_eq!(before, vec![0, 1, 2]);
        assert_eq!(after.len(), 3);
        // after 마커는 연속된 마지막 세 줄
        assert_eq!(after, vec![lines.len() - 3, lines.len() - 2, lines.len() - 1]);
    }

    fn positions(lines: &[String], marker: &str) -> Vec<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, l)| l.as_str() == marker)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn logic_error_propagates_out_of_run_and_skips_after() {
        let catalog =
            Catalog::from_scenarios(vec![logic::scenario(), interleave::scenario()]).unwrap();
        let runner = Runner::new(catalog, RunConfig::standard());
        let mut sink = MemorySink::new();

        let err = runner.run(&mut sink).unwrap_err();

        assert!(matches!(err, RunnerError::Scenario { ref name, .. } if name == "errorTest"));
        assert_eq!(err.exit_code(), faultdrill_core::exit_code::LOGIC_ERROR);
        let lines = sink.lines(Channel::Primary);
        assert!(!lines.iter().any(|l| l == AFTER_MARKER));
        assert!(!lines.iter().any(|l| l.starts_with("Hello, world!")));
    }

    #[test]
    fn declared_fault_that_returns_is_a_mismatch() {
        let catalog = Catalog::from_scenarios(vec![Scenario::new(
            ScenarioSpec::new("fakeOverflowTest", FaultKind::StackExhaustion),
            quiet,
        )])
        .unwrap();
        let runner = Runner::new(catalog, RunConfig::new());
        let mut sink = MemorySink::new();

        let err = runner.run(&mut sink).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Mismatch {
                declared: FaultKind::StackExhaustion,
                ..
            }
        ));
    }

    #[test]
    fn failing_before_hook_is_fatal_and_not_attributed_to_a_scenario() {
        let config = RunConfig::new().with_before(Box::new(|_: &mut dyn OutputSink| {
            Err(ScenarioError::Logic("hook bug".to_owned()))
        }));
        let runner = Runner::new(interleave_only(), config);
        let mut sink = MemorySink::new();

        let err = runner.run(&mut sink).unwrap_err();

        assert!(matches!(
            err,
            RunnerError::Hook {
                hook: HookPoint::Before,
                ..
            }
        ));
        assert!(sink.events().is_empty(), "no scenario may run after a hook fault");
    }

    #[test]
    fn run_scenario_rejects_unknown_name() {
        let runner = Runner::new(interleave_only(), RunConfig::new());
        let mut sink = MemorySink::new();
        let err = runner.run_scenario("missingTest", &mut sink).unwrap_err();
        assert!(matches!(err, RunnerError::UnknownScenario(_)));
    }

    #[test]
    fn run_scenario_is_idempotent() {
        let runner = Runner::new(catalog::standard().unwrap(), RunConfig::new());
        let mut first = MemorySink::new();
        let mut second = MemorySink::new();

        runner.run_scenario("coutCerrMixTest", &mut first).unwrap();
        runner.run_scenario("coutCerrMixTest", &mut second).unwrap();

        assert_eq!(first.events(), second.events());
    }

    #[test]
    fn run_hook_without_hook_is_a_no_op() {
        let runner = Runner::new(interleave_only(), RunConfig::new());
        let mut sink = MemorySink::new();
        runner.run_hook(HookPoint::After, &mut sink).unwrap();
        assert!(sink.events().is_empty());
    }
}
