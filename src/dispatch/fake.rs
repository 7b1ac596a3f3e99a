// Recording `Host` for tests.

use crate::editor::CharPosition;

use super::Host;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HostCall {
    SetTimer { id: usize, interval_ms: u32 },
    IBeam,
    Invalidate,
    PostQuit(i32),
    AnswerCharPosition(CharPosition),
}

#[derive(Default)]
pub(crate) struct RecordingHost {
    pub(crate) calls: Vec<HostCall>,
    /// Stands in for the OS-owned `IMECHARPOSITION`.
    pub(crate) char_position: CharPosition,
    pub(crate) refuse_timers: bool,
}

impl RecordingHost {
    pub(crate) fn timers(&self) -> Vec<(usize, u32)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::SetTimer { id, interval_ms } => Some((*id, *interval_ms)),
                _ => None,
            })
            .collect()
    }
}

impl Host for RecordingHost {
    fn set_timer(&mut self, id: usize, interval_ms: u32) -> bool {
        self.calls.push(HostCall::SetTimer { id, interval_ms });
        !self.refuse_timers
    }

    fn set_ibeam_cursor(&mut self) {
        self.calls.push(HostCall::IBeam);
    }

    fn invalidate(&mut self) {
        self.calls.push(HostCall::Invalidate);
    }

    fn post_quit(&mut self, exit_code: i32) {
        self.calls.push(HostCall::PostQuit(exit_code));
    }

    fn answer_char_position(&mut self, _request: isize, answer: &mut dyn FnMut(&mut CharPosition)) {
        answer(&mut self.char_position);
        self.calls
            .push(HostCall::AnswerCharPosition(self.char_position));
    }
}
