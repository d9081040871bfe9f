//! `coutCerrMixTest`: 주/진단 채널 인터리빙 순서 오라클
//!
//! 두 채널에 번갈아 기록하며, 마지막 논리적 한 줄은 양쪽 채널 조각으로 조립된 뒤
//! 주 채널에만 개행이 기록됩니다. 폴트를 일으키지 않습니다.
//!
//! 채널 간 순서는 외부 버퍼링 정책에 따라 달라질 수 있지만,
//! 채널 내부 순서는 [`SCRIPT`]의 선언 순서와 정확히 같아야 합니다.

use faultdrill_core::error::ScenarioError;
use faultdrill_core::types::{Channel, FaultKind, ScenarioSpec};

use crate::scenario::Scenario;
use crate::sink::OutputSink;

/// 시나리오 이름
pub const NAME: &str = "coutCerrMixTest";

/// 선언된 기록 순서
pub const SCRIPT: &[(Channel, &str)] = &[
    (Channel::Primary, "Hello, world! This is main!\n"),
    (Channel::Diagnostic, "This message comes from cerr\n"),
    (Channel::Primary, "Another one from cout!\n"),
    (Channel::Diagnostic, "This message ALSO comes from cerr\n"),
    (Channel::Primary, "A third one from cout!\n"),
    (Channel::Diagnostic, "HOW "),
    (Channel::Primary, "about "),
    (Channel::Diagnostic, "A "),
    (Channel::Primary, "mixed "),
    (Channel::Diagnostic, "LINE??"),
    (Channel::Primary, "\n"),
];

/// 카탈로그 항목
pub fn scenario() -> Scenario {
    Scenario::new(ScenarioSpec::new(NAME, FaultKind::None), run)
}

/// 한 채널에 선언된 조각 순서
pub fn declared(channel: Channel) -> Vec<&'static str> {
    SCRIPT
        .iter()
        .filter(|(c, _)| *c == channel)
        .map(|(_, text)| *text)
        .collect()
}

fn run(sink: &mut dyn OutputSink) -> Result<(), ScenarioError> {
    for (channel, text) in SCRIPT {
        sink.write(*channel, text)?;
        sink.flush(*channel)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn each_channel_preserves_declared_order() {
        let mut sink = MemorySink::new();
        scenario().invoke(&mut sink).unwrap();

        for channel in [Channel::Primary, Channel::Diagnostic] {
            assert_eq!(sink.fragments(channel), declared(channel));
        }
    }

    #[test]
    fn mixed_line_is_terminated_on_primary_only() {
        let mut sink = MemorySink::new();
        scenario().invoke(&mut sink).unwrap();

        assert_eq!(
            sink.text(Channel::Primary),
            "Hello, world! This is main!\nAnother one from cout!\nA third one from cout!\nabout mixed \n"
        );
        assert_eq!(
            sink.text(Channel::Diagnostic),
            "This message comes from cerr\nThis message ALSO comes from cerr\nHOW A LINE??"
        );
    }

    #[test]
    fn fragments_alternate_in_global_sequence() {
        let mut sink = MemorySink::new();
        scenario().invoke(&mut sink).unwrap();

        let recorded: Vec<(Channel, &str)> = sink
            .events()
            .iter()
            .map(|e| (e.channel, e.text.as_str()))
            .collect();
        assert_eq!(recorded, SCRIPT.to_vec());
    }

    #[test]
    fn declares_no_fault() {
        assert_eq!(scenario().kind(), FaultKind::None);
    }
}
