//! Best-effort call-site capture for `metadata.stackTrace`.
//!
//! Structured capture resolves frames with the `backtrace` crate. If it
//! panics or yields nothing, the textual form of
//! `std::backtrace::Backtrace` is used instead. Neither path is allowed to
//! fail the log call.

use crate::record::{StackFrame, StackTrace};
use std::panic::{self, AssertUnwindSafe};

/// Text stored when even the raw capture produced nothing.
pub const UNAVAILABLE_STACK: &str = "<stack trace unavailable>";

/// Path prefixes of frames that belong to the capture machinery itself.
const OWN_FRAME_MARKERS: &[&str] = &[
    concat!(env!("CARGO_CRATE_NAME"), "::stacktrace::"),
    concat!(env!("CARGO_CRATE_NAME"), "::logger::"),
];

/// Capture the current call stack, excluding this crate's own frames.
pub fn capture() -> StackTrace {
    capture_with(capture_frames)
}

pub(crate) fn capture_with<F>(structured: F) -> StackTrace
where
    F: FnOnce() -> Vec<StackFrame>,
{
    match panic::catch_unwind(AssertUnwindSafe(structured)) {
        Ok(frames) if !frames.is_empty() => StackTrace::Frames(frames),
        _ => StackTrace::Raw(capture_raw()),
    }
}

fn capture_raw() -> String {
    let text = panic::catch_unwind(|| std::backtrace::Backtrace::force_capture().to_string())
        .unwrap_or_default();
    if text.trim().is_empty() {
        UNAVAILABLE_STACK.to_string()
    } else {
        text
    }
}

fn capture_frames() -> Vec<StackFrame> {
    let backtrace = backtrace::Backtrace::new();
    let frames: Vec<StackFrame> = backtrace
        .frames()
        .iter()
        .flat_map(|frame| frame.symbols())
        .filter_map(describe_symbol)
        .collect();

    strip_own_frames(frames)
}

fn describe_symbol(symbol: &backtrace::BacktraceSymbol) -> Option<StackFrame> {
    let path = symbol.name().map(|name| format!("{:#}", name));
    let file = symbol.filename().map(|p| p.display().to_string());
    describe(path.as_deref(), file, symbol.lineno(), symbol.colno())
}

/// Map one resolved symbol to a frame descriptor. Symbols without a name,
/// or with an empty one, are dropped.
pub(crate) fn describe(
    path: Option<&str>,
    file: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
) -> Option<StackFrame> {
    match path {
        Some(path) if !path.is_empty() => Some(frame_from_path(path, file, line, column)),
        _ => None,
    }
}

pub(crate) fn frame_from_path(
    path: &str,
    file: Option<String>,
    line: Option<u32>,
    column: Option<u32>,
) -> StackFrame {
    let (type_name, method) = match path.rfind("::") {
        Some(idx) => (Some(path[..idx].to_string()), path[idx + 2..].to_string()),
        None => (None, path.to_string()),
    };

    StackFrame {
        is_native: file.is_none(),
        file,
        line,
        column,
        type_name,
        is_constructor: method == "new",
        method: Some(method),
    }
}

fn qualified_name(frame: &StackFrame) -> String {
    match (&frame.type_name, &frame.method) {
        (Some(ty), Some(method)) => format!("{}::{}", ty, method),
        (None, Some(method)) => method.clone(),
        (Some(ty), None) => ty.clone(),
        (None, None) => String::new(),
    }
}

/// Path that owns the code of a frame. For `<T as Trait>::m` this is the
/// trait path, for `<T>::m` the type path.
fn owning_path(name: &str) -> &str {
    match name.strip_prefix('<') {
        Some(rest) => match rest.find(" as ") {
            Some(idx) => &rest[idx + 4..],
            None => rest,
        },
        None => name,
    }
}

fn is_own_frame(frame: &StackFrame) -> bool {
    let name = qualified_name(frame);
    let path = owning_path(&name);
    path.starts_with("backtrace::") || OWN_FRAME_MARKERS.iter().any(|marker| path.starts_with(marker))
}

/// Drop everything up to and including the last frame of the capture
/// machinery. If none is found, only leading `backtrace::` frames go.
pub(crate) fn strip_own_frames(frames: Vec<StackFrame>) -> Vec<StackFrame> {
    match frames.iter().rposition(is_own_frame) {
        Some(last) => frames.into_iter().skip(last + 1).collect(),
        None => frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(path: &str) -> StackFrame {
        frame_from_path(path, Some("src/lib.rs".into()), Some(1), Some(1))
    }

    #[test]
    fn splits_type_and_method() {
        let f = frame_from_path("app::service::Worker::new", None, None, None);
        assert_eq!(f.type_name.as_deref(), Some("app::service::Worker"));
        assert_eq!(f.method.as_deref(), Some("new"));
        assert!(f.is_constructor);
        assert!(f.is_native);
    }

    #[test]
    fn free_function_has_no_type() {
        let f = frame_from_path("main", Some("src/main.rs".into()), Some(3), None);
        assert_eq!(f.type_name, None);
        assert!(!f.is_native);
        assert!(!f.is_constructor);
    }

    #[test]
    fn strips_capture_frames() {
        let frames = vec![
            frame("backtrace::backtrace::trace"),
            frame(concat!(env!("CARGO_CRATE_NAME"), "::stacktrace::capture")),
            frame(concat!(env!("CARGO_CRATE_NAME"), "::logger::ApiLogger::info")),
            frame("app::handler"),
            frame("main"),
        ];
        let kept = strip_own_frames(frames);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].method.as_deref(), Some("handler"));
    }

    #[test]
    fn keeps_user_trait_impls_on_crate_types() {
        let user_impl = concat!("<", env!("CARGO_CRATE_NAME"), "::logger::ApiLogger as app::Audit>::audit");
        let frames = vec![
            frame(concat!(env!("CARGO_CRATE_NAME"), "::stacktrace::capture")),
            frame(concat!(env!("CARGO_CRATE_NAME"), "::logger::normalize")),
            frame(user_impl),
            frame("main"),
        ];
        let kept = strip_own_frames(frames);
        assert_eq!(kept.len(), 2);
        assert_eq!(qualified_name(&kept[0]), user_impl);
    }

    #[test]
    fn strips_inherent_impl_frames_in_angle_form() {
        let frames = vec![
            frame(concat!("<", env!("CARGO_CRATE_NAME"), "::logger::ApiLogger>::log")),
            frame("app::handler"),
        ];
        let kept = strip_own_frames(frames);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].method.as_deref(), Some("handler"));
    }

    #[test]
    fn drops_only_unnamed_symbols() {
        let symbols = [
            (Some("app::first"), Some(10)),
            (None, Some(20)),
            (Some(""), Some(25)),
            (Some("app::last"), Some(30)),
        ];
        let frames: Vec<StackFrame> = symbols
            .iter()
            .filter_map(|(path, line)| describe(*path, Some("src/app.rs".into()), *line, None))
            .collect();

        let methods: Vec<&str> = frames.iter().filter_map(|f| f.method.as_deref()).collect();
        assert_eq!(methods, vec!["first", "last"]);
        assert_eq!(frames[0].line, Some(10));
        assert_eq!(frames[1].line, Some(30));
    }

    #[test]
    fn falls_back_to_raw_text_when_structured_capture_panics() {
        let trace = capture_with(|| panic!("symbolization failed"));
        match trace {
            StackTrace::Raw(text) => assert!(!text.is_empty()),
            StackTrace::Frames(_) => panic!("expected raw fallback"),
        }
    }

    #[test]
    fn falls_back_when_nothing_resolves() {
        assert!(matches!(capture_with(Vec::new), StackTrace::Raw(_)));
    }

    #[test]
    fn capture_is_well_formed() {
        match capture() {
            StackTrace::Frames(frames) => assert!(!frames.is_empty()),
            StackTrace::Raw(text) => assert!(!text.is_empty()),
        }
    }
}
