//! 호출 체인: 폴트를 알려진 스택 깊이에 놓기 위한 고정 프레임 목록
//!
//! 상속이나 동적 디스패치를 흉내 내지 않고, 프레임 이름의 평탄한 목록을
//! 하나의 재귀 호출기([`CallChain::invoke`])가 따라 내려갑니다.
//!
//! 알림(announced) 체인은 각 프레임 진입 시 `function <frame> start`,
//! 정상 복귀 시 `function <frame> end`를 주 채널에 기록합니다.
//! 가장 안쪽에서 폴트가 나면 `end` 마커는 하나도 기록되지 않습니다.

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::Channel;

use crate::sink::OutputSink;

/// 이름 붙은 프레임의 순서 있는 목록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallChain {
    frames: Vec<&'static str>,
    announce: bool,
}

impl CallChain {
    /// 진입/복귀 마커를 기록하는 체인
    pub fn announced(frames: &[&'static str]) -> Self {
        Self {
            frames: frames.to_vec(),
            announce: true,
        }
    }

    /// 마커 없이 깊이만 만드는 체인
    pub fn silent(frames: &[&'static str]) -> Self {
        Self {
            frames: frames.to_vec(),
            announce: false,
        }
    }

    /// 체인을 따라 내려가 가장 안쪽에서 `leaf`를 실행합니다.
    ///
    /// `leaf`의 에러는 모든 프레임을 거쳐 그대로 반환됩니다.
    pub fn invoke<T, F>(&self, sink: &mut dyn OutputSink, leaf: F) -> Result<T, ScenarioError>
    where
        F: FnOnce(&mut dyn OutputSink) -> Result<T, ScenarioError>,
    {
        descend(&self.frames, self.announce, sink, leaf)
    }
}

#[inline(never)]
fn descend<T, F>(
    frames: &[&'static str],
    announce: bool,
    sink: &mut dyn OutputSink,
    leaf: F,
) -> Result<T, ScenarioError>
where
    F: FnOnce(&mut dyn OutputSink) -> Result<T, ScenarioError>,
{
    let Some((frame, rest)) = frames.split_first() else {
        return leaf(sink);
    };

    if announce {
        sink.line(Channel::Primary, &format!("function {frame} start"))?;
    }
    let value = descend(rest, announce, sink, leaf)?;
    if announce {
        sink.line(Channel::Primary, &format!("function {frame} end"))?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn announced_chain_brackets_leaf_with_markers() {
        let chain = CallChain::announced(&["a", "b", "c"]);
        let mut sink = MemorySink::new();

        let value = chain
            .invoke(&mut sink, |sink| {
                sink.line(Channel::Primary, "leaf")?;
                Ok(7)
            })
            .unwrap();

        assert_eq!(value, 7);
        assert_eq!(
            sink.lines(Channel::Primary),
            vec![
                "function a start",
                "function b start",
                "function c start",
                "leaf",
                "function c end",
                "function b end",
                "function a end",
            ]
        );
    }

    #[test]
    fn leaf_error_skips_every_end_marker() {
        let chain = CallChain::announced(&["a", "b", "c"]);
        let mut sink = MemorySink::new();

        let err = chain
            .invoke(&mut sink, |_| -> Result<(), ScenarioError> {
                Err(ScenarioError::Logic("blargh!".to_owned()))
            })
            .unwrap_err();

        assert!(matches!(err, ScenarioError::Logic(ref m) if m == "blargh!"));
        let lines = sink.lines(Channel::Primary);
        assert_eq!(lines.last().map(String::as_str), Some("function c start"));
        assert!(lines.iter().all(|l| !l.ends_with(" end")));
    }

    #[test]
    fn silent_chain_writes_nothing() {
        let chain = CallChain::silent(&["segA", "segB", "segC"]);
        let mut sink = MemorySink::new();

        chain.invoke(&mut sink, |_| Ok(())).unwrap();

        assert!(sink.events().is_empty());
    }

    #[test]
    fn empty_chain_runs_leaf_directly() {
        let chain = CallChain::announced(&[]);
        let mut sink = MemorySink::new();
        let value = chain.invoke(&mut sink, |_| Ok("done")).unwrap();
        assert_eq!(value, "done");
        assert!(sink.events().is_empty());
    }
}
