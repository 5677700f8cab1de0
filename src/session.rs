//! A session groups together the settings that affect a single document load/render, so
//! that they don't have to be threaded through every function call individually.  At the
//! moment this is just whether debug logging is enabled, but it is the natural place to add
//! further per-load settings later (a resource limit, a base URL override, etc).

/// Per-load/per-render settings, cheaply clonable so it can be handed to every subsystem
/// that needs to consult or log against it.
#[derive(Clone)]
pub struct Session {
    log_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            log_enabled: log::log_enabled!(log::Level::Debug),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// A session with logging unconditionally enabled, for use in the test suite where
    /// `rsvg_log!` output is part of what's being verified.
    pub fn new_for_test_suite() -> Self {
        Session { log_enabled: true }
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suite_session_logs() {
        assert!(Session::new_for_test_suite().log_enabled());
    }
}
