/// Log sink handed to the resolver and the organizer at construction.
///
/// `info` and `error` carry the per-file result lines; `debug` carries
/// stage-level detail and is silent unless an implementation opts in.
pub trait Logger {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, _message: &str) {}
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn info(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards to the `log` facade, so whatever logger the binary installs
/// decides destination, level and formatting.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl Logger for LogFacade {
    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }

    fn debug(&self, message: &str) {
        log::debug!("{}", message);
    }
}
