use crate::error::{ContractError, DeliveryError};
use crate::sink::{Done, LogSink, LogType, LoggerMiddleware};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Multi-target logging facade.
///
/// Every log call is handed to each registered middleware in order. The
/// facade doubles as the [`LogSink`] behind an
/// [`ApiLogger`](crate::logger::ApiLogger).
#[derive(Clone, Default)]
pub struct Logger {
    middlewares: Vec<Arc<dyn LoggerMiddleware>>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a middleware after the existing ones.
    pub fn with_middleware(mut self, middleware: Arc<dyn LoggerMiddleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Dispatch one call to every middleware without a completion callback.
    ///
    /// Stops at the first contract violation.
    pub fn log(&self, log_type: LogType, args: Vec<Value>) -> Result<(), ContractError> {
        for middleware in &self.middlewares {
            middleware.handle(log_type, args.clone(), None)?;
        }
        Ok(())
    }
}

impl LogSink for Logger {
    fn write(&self, log_type: LogType, record: Value) -> Result<(), ContractError> {
        self.log(log_type, vec![record])
    }
}

/// Middleware that tries each inner middleware in turn until one of them
/// completes without a delivery error.
///
/// The caller's callback sees `Ok(())` from the first success, or the
/// error of the last middleware once all of them failed.
#[derive(Clone)]
pub struct Fallback {
    chain: Arc<[Arc<dyn LoggerMiddleware>]>,
}

/// Chain `middlewares` so that each one only runs when the previous one
/// reported a delivery failure.
pub fn use_fallback(middlewares: Vec<Arc<dyn LoggerMiddleware>>) -> Arc<dyn LoggerMiddleware> {
    Arc::new(Fallback::new(middlewares))
}

impl Fallback {
    pub fn new(middlewares: Vec<Arc<dyn LoggerMiddleware>>) -> Self {
        Fallback { chain: middlewares.into() }
    }
}

fn dispatch(
    chain: Arc<[Arc<dyn LoggerMiddleware>]>,
    index: usize,
    log_type: LogType,
    args: Vec<Value>,
    done: Done,
) -> Result<(), ContractError> {
    let Some(current) = chain.get(index).cloned() else {
        done(Ok(()));
        return Ok(());
    };

    if index + 1 == chain.len() {
        return current.handle(log_type, args, Some(done));
    }

    let retry_args = args.clone();
    current.handle(
        log_type,
        args,
        Some(Box::new(move |result: Result<(), DeliveryError>| match result {
            Ok(()) => done(Ok(())),
            Err(e) => {
                warn!(error = %e, index, "log middleware failed, trying next");
                if let Err(violation) = dispatch(chain, index + 1, log_type, retry_args, done) {
                    warn!(error = %violation, "fallback log middleware rejected the call");
                }
            }
        })),
    )
}

impl LoggerMiddleware for Fallback {
    fn handle(&self, log_type: LogType, args: Vec<Value>, done: Option<Done>) -> Result<(), ContractError> {
        let done = done.unwrap_or_else(crate::sink::noop_done);
        dispatch(Arc::clone(&self.chain), 0, log_type, args, done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Completes immediately with a fixed outcome and counts calls.
    struct Fixed {
        fail: bool,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Fixed { fail, calls: AtomicUsize::new(0) })
        }
    }

    impl LoggerMiddleware for Fixed {
        fn handle(&self, _log_type: LogType, _args: Vec<Value>, done: Option<Done>) -> Result<(), ContractError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(done) = done {
                if self.fail {
                    done(Err(DeliveryError::Validation("rejected".into())));
                } else {
                    done(Ok(()));
                }
            }
            Ok(())
        }
    }

    fn capture() -> (Done, Arc<Mutex<Option<Result<(), DeliveryError>>>>) {
        let slot = Arc::new(Mutex::new(None));
        let inner = slot.clone();
        let done: Done = Box::new(move |result: Result<(), DeliveryError>| {
            *inner.lock().unwrap() = Some(result);
        });
        (done, slot)
    }

    #[test]
    fn logger_calls_every_middleware() {
        let a = Fixed::new(false);
        let b = Fixed::new(true);
        let logger = Logger::new().with_middleware(a.clone()).with_middleware(b.clone());

        logger.info(json!({ "message": "m" })).unwrap();
        assert_eq!(a.calls.load(Ordering::SeqCst), 1);
        assert_eq!(b.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fallback_stops_at_first_success() {
        let first = Fixed::new(false);
        let second = Fixed::new(false);
        let fallback = use_fallback(vec![first.clone() as Arc<dyn LoggerMiddleware>, second.clone()]);
        let (done, slot) = capture();

        fallback.handle(LogType::Info, vec![json!({})], Some(done)).unwrap();
        assert!(matches!(*slot.lock().unwrap(), Some(Ok(()))));
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn fallback_moves_on_after_delivery_error() {
        let first = Fixed::new(true);
        let second = Fixed::new(false);
        let fallback = use_fallback(vec![first.clone() as Arc<dyn LoggerMiddleware>, second.clone()]);
        let (done, slot) = capture();

        fallback.handle(LogType::Warn, vec![json!({})], Some(done)).unwrap();
        assert!(matches!(*slot.lock().unwrap(), Some(Ok(()))));
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fallback_reports_last_error() {
        let fallback = use_fallback(vec![Fixed::new(true) as Arc<dyn LoggerMiddleware>, Fixed::new(true)]);
        let (done, slot) = capture();

        fallback.handle(LogType::Error, vec![json!({})], Some(done)).unwrap();
        assert!(matches!(*slot.lock().unwrap(), Some(Err(DeliveryError::Validation(_)))));
    }

    #[test]
    fn empty_fallback_completes() {
        let fallback = use_fallback(Vec::new());
        let (done, slot) = capture();
        fallback.handle(LogType::Info, Vec::new(), Some(done)).unwrap();
        assert!(matches!(*slot.lock().unwrap(), Some(Ok(()))));
    }
}
