//! 출력 싱크: 주(primary)/진단(diagnostic) 두 개의 독립 append-only 채널
//!
//! - [`StdSink`]: 주 채널 = stdout, 진단 채널 = stderr. 실제 프로세스 실행용
//! - [`MemorySink`]: 모든 조각을 순서 번호와 함께 기록. 순서 검증 테스트용

use std::io::{self, Write};

use faultdrill_core::types::{Channel, OutputEvent};

/// 두 채널에 텍스트 조각을 기록하는 싱크
///
/// 시나리오와 훅은 이 trait만 통해 출력합니다.
pub trait OutputSink {
    /// 채널에 조각을 기록합니다. 개행은 호출자가 넣습니다.
    fn write(&mut self, channel: Channel, text: &str) -> io::Result<()>;

    /// 채널의 버퍼를 비웁니다.
    fn flush(&mut self, channel: Channel) -> io::Result<()>;

    /// 한 줄을 기록하고 즉시 플러시합니다.
    ///
    /// 폴트 직전 마커는 반드시 이 메서드로 기록해야 슈퍼바이저가 관측할 수 있습니다.
    fn line(&mut self, channel: Channel, text: &str) -> io::Result<()> {
        self.write(channel, &format!("{text}\n"))?;
        self.flush(channel)
    }
}

/// stdout/stderr 싱크
#[derive(Debug)]
pub struct StdSink {
    primary: io::Stdout,
    diagnostic: io::Stderr,
}

impl StdSink {
    /// 프로세스 표준 스트림에 연결된 싱크를 생성합니다.
    pub fn new() -> Self {
        Self {
            primary: io::stdout(),
            diagnostic: io::stderr(),
        }
    }
}

impl Default for StdSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for StdSink {
    fn write(&mut self, channel: Channel, text: &str) -> io::Result<()> {
        match channel {
            Channel::Primary => self.primary.lock().write_all(text.as_bytes()),
            Channel::Diagnostic => self.diagnostic.lock().write_all(text.as_bytes()),
        }
    }

    fn flush(&mut self, channel: Channel) -> io::Result<()> {
        match channel {
            Channel::Primary => self.primary.lock().flush(),
            Channel::Diagnostic => self.diagnostic.lock().flush(),
        }
    }
}

/// 인메모리 싱크
///
/// 기록 순서대로 [`OutputEvent`]를 쌓습니다. 순서 번호는 두 채널에 걸쳐 단조 증가합니다.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Vec<OutputEvent>,
    next_seq: u64,
    flushes: usize,
}

impl MemorySink {
    /// 빈 싱크를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기록된 모든 이벤트 (기록 순서)
    pub fn events(&self) -> &[OutputEvent] {
        &self.events
    }

    /// 한 채널의 조각들 (기록 순서)
    pub fn fragments(&self, channel: Channel) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.channel == channel)
            .map(|e| e.text.as_str())
            .collect()
    }

    /// 한 채널의 전체 텍스트
    pub fn text(&self, channel: Channel) -> String {
        self.fragments(channel).concat()
    }

    /// 한 채널의 줄 목록
    pub fn lines(&self, channel: Channel) -> Vec<String> {
        self.text(channel).lines().map(str::to_owned).collect()
    }

    /// flush 호출 횟수
    pub fn flush_count(&self) -> usize {
        self.flushes
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, channel: Channel, text: &str) -> io::Result<()> {
        self.events.push(OutputEvent {
            seq: self.next_seq,
            channel,
            text: text.to_owned(),
        });
        self.next_seq += 1;
        Ok(())
    }

    fn flush(&mut self, _channel: Channel) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn memory_sink_numbers_events_across_channels() {
        let mut sink = MemorySink::new();
        sink.write(Channel::Primary, "one").unwrap();
        sink.write(Channel::Diagnostic, "two").unwrap();
        sink.write(Channel::Primary, "three").unwrap();

        let seqs: Vec<u64> = sink.events().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![0, 1, 2]);
        assert_eq!(sink.fragments(Channel::Primary), vec!["one", "three"]);
        assert_eq!(sink.fragments(Channel::Diagnostic), vec!["two"]);
    }

    #[test]
    fn line_appends_newline_and_flushes() {
        let mut sink = MemorySink::new();
        sink.line(Channel::Primary, "function c start").unwrap();
        assert_eq!(sink.text(Channel::Primary), "function c start\n");
        assert_eq!(sink.flush_count(), 1);
    }

    #[test]
    fn lines_split_assembled_fragments() {
        let mut sink = MemorySink::new();
        sink.write(Channel::Primary, "about ").unwrap();
        sink.write(Channel::Primary, "mixed ").unwrap();
        sink.write(Channel::Primary, "\n").unwrap();
        assert_eq!(sink.lines(Channel::Primary), vec!["about mixed "]);
    }

    #[test]
    fn std_sink_accepts_writes() {
        let mut sink = StdSink::new();
        sink.write(Channel::Diagnostic, "").unwrap();
        sink.flush(Channel::Primary).unwrap();
    }

    fn channel_strategy() -> impl Strategy<Value = Channel> {
        prop_oneof![Just(Channel::Primary), Just(Channel::Diagnostic)]
    }

    proptest! {
        #[test]
        fn per_channel_order_matches_write_order(
            script in proptest::collection::vec((channel_strategy(), "[a-z ]{0,8}"), 0..64)
        ) {
            let mut sink = MemorySink::new();
            for (channel, text) in &script {
                sink.write(*channel, text).unwrap();
            }

            for channel in [Channel::Primary, Channel::Diagnostic] {
                let expected: Vec<&str> = script
                    .iter()
                    .filter(|(c, _)| *c == channel)
                    .map(|(_, t)| t.as_str())
                    .collect();
                prop_assert_eq!(sink.fragments(channel), expected);
            }
        }
    }
}
