//! Caller stack capture for START events.

use std::backtrace::Backtrace;

/// Frames belonging to the capture machinery or the recording hooks.
const INTERNAL_FRAMES: [&str; 5] = [
    "std::backtrace",
    "std::rt::",
    "txn_monitor::recording::",
    "txn_monitor::monitor::",
    "core::ops::function",
];

/// Capture up to `depth` caller frames, innermost first.
pub fn capture(depth: usize) -> Vec<String> {
    frames(&Backtrace::force_capture().to_string(), depth)
}

/// Extract symbol names from a rendered backtrace.
///
/// Frame lines look like `  12: crate::module::function`; the `at file:line`
/// lines that follow them are skipped.
pub fn frames(rendered: &str, depth: usize) -> Vec<String> {
    rendered
        .lines()
        .filter_map(|line| {
            let (index, symbol) = line.trim_start().split_once(": ")?;
            index.chars().all(|c| c.is_ascii_digit()).then(|| symbol.trim())
        })
        .filter(|symbol| !INTERNAL_FRAMES.iter().any(|internal| symbol.starts_with(internal)))
        .take(depth)
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDERED: &str = "   0: std::backtrace::Backtrace::force_capture
             at /rustc/library/std/src/backtrace.rs:312:9
   1: txn_monitor::recording::stack::capture
             at ./src/recording/stack.rs:16:5
   2: txn_monitor::recording::recorder::EventRecorder::on_enter
   3: app::service::load_instruments
             at ./src/service.rs:40:9
   4: app::main
   5: core::ops::function::FnOnce::call_once";

    #[test]
    fn test_frames_skip_internals_and_locations() {
        assert_eq!(
            frames(RENDERED, 10),
            vec!["app::service::load_instruments".to_string(), "app::main".to_string()]
        );
    }

    #[test]
    fn test_frames_respect_depth() {
        assert_eq!(frames(RENDERED, 1), vec!["app::service::load_instruments".to_string()]);
        assert!(frames(RENDERED, 0).is_empty());
    }
}
