//! RAII guard pairing every entry with exactly one exit.

use std::fmt::Display;
use std::sync::Arc;

use crate::correlation::CorrelationId;
use crate::recording::recorder::{EventRecorder, InvocationHandle, Outcome};

pub const ABORTED: &str = "invocation aborted";
pub const PANICKED: &str = "invocation panicked";

/// Open invocation. Call [`complete`](Self::complete) or
/// [`fail`](Self::fail); dropping it without either records an ERROR
/// (`invocation aborted`, or `invocation panicked` while unwinding).
///
/// The correlation binding is thread-local unless the guard lives inside
/// `CorrelationContext::scope`, so a guard held across `.await` points on a
/// multi-threaded runtime needs a task scope.
#[derive(Debug)]
#[must_use = "dropping the guard immediately records an aborted invocation"]
pub struct InvocationGuard {
    recorder: Arc<EventRecorder>,
    handle: Option<InvocationHandle>,
}

impl InvocationGuard {
    pub(crate) fn new(recorder: Arc<EventRecorder>, handle: Option<InvocationHandle>) -> Self {
        Self { recorder, handle }
    }

    /// False when monitoring was disabled at entry.
    pub fn is_recording(&self) -> bool {
        self.handle.is_some()
    }

    pub fn correlation_id(&self) -> Option<CorrelationId> {
        self.handle.as_ref().map(InvocationHandle::correlation_id)
    }

    pub fn complete(mut self) {
        if let Some(handle) = self.handle.take() {
            self.recorder.finish(handle, Outcome::Completed);
        }
    }

    /// Record an ERROR carrying the error's message.
    pub fn fail(mut self, error: &dyn Display) {
        if let Some(handle) = self.handle.take() {
            self.recorder.finish(handle, Outcome::Failed(error.to_string()));
        }
    }

    /// Record the outcome of `result` and hand it back unchanged.
    pub fn finish<T, E: Display>(self, result: Result<T, E>) -> Result<T, E> {
        match &result {
            Ok(_) => self.complete(),
            Err(e) => self.fail(e),
        }
        result
    }
}

impl Drop for InvocationGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let description = if std::thread::panicking() { PANICKED } else { ABORTED };
            self.recorder.finish(handle, Outcome::Failed(description.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::recording::event::EventKind;
    use crate::recording::thread::ThreadInfo;

    fn guard(recorder: &Arc<EventRecorder>) -> InvocationGuard {
        let handle = recorder.on_enter("Repo.find", ThreadInfo::current());
        InvocationGuard::new(recorder.clone(), handle)
    }

    fn recorder() -> Arc<EventRecorder> {
        Arc::new(EventRecorder::new(MonitorConfig::default().shared()))
    }

    #[test]
    fn test_finish_passes_result_through() {
        let recorder = recorder();
        let result: Result<u32, String> = guard(&recorder).finish(Err("disk full".into()));
        assert_eq!(result, Err("disk full".to_string()));

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].error_description(), Some("disk full"));
    }

    #[test]
    fn test_drop_without_exit_records_abort() {
        let recorder = recorder();
        drop(guard(&recorder));

        let events = recorder.events();
        assert_eq!(events[1].kind(), EventKind::Error);
        assert_eq!(events[1].error_description(), Some(ABORTED));
    }

    #[test]
    fn test_panic_records_single_terminal_event() {
        let recorder = recorder();
        let inner = recorder.clone();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = guard(&inner);
            panic!("operation blew up");
        }));
        assert!(outcome.is_err());

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].error_description(), Some(PANICKED));
    }

    #[test]
    fn test_disabled_guard_is_inert() {
        let mut config = MonitorConfig::default();
        config.monitoring.enabled = false;
        let recorder = Arc::new(EventRecorder::new(config.shared()));

        let g = guard(&recorder);
        assert!(!g.is_recording());
        assert!(g.correlation_id().is_none());
        g.complete();
        assert!(recorder.is_empty());
    }
}
