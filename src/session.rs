//! Scoped execution context of a training run
//!
//! A [`Session`] is acquired once at the start of a run and handed to every stage explicitly.
//! Releasing it happens exactly once: either through [`Session::stop`] or, on every other exit
//! path including early returns with an error, when the value is dropped.
//!
//! ```rust
//! use flightforest::Session;
//!
//! let session = Session::builder("RandomForest").start();
//! assert_eq!(session.app_name(), "RandomForest");
//! session.stop();
//! ```
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tracing::{info, info_span, warn, Span};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

type ReleaseHook = Box<dyn FnOnce(&SessionInfo) + Send>;

/// Identity of a session, passed to release hooks
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: u64,
    pub app_name: String,
}

/// Configures a [`Session`] before it is started
pub struct SessionBuilder {
    app_name: String,
    hooks: Vec<ReleaseHook>,
}

impl SessionBuilder {
    /// Registers a hook which runs when the session is released
    ///
    /// Hooks run in registration order.
    pub fn on_release(mut self, hook: impl FnOnce(&SessionInfo) + Send + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    /// Acquires the session
    pub fn start(self) -> Session {
        let info = SessionInfo {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            app_name: self.app_name,
        };
        let span = info_span!("session", id = info.id, app = %info.app_name);
        span.in_scope(|| info!("session started"));

        Session {
            info,
            started: Instant::now(),
            span,
            hooks: self.hooks,
            released: false,
        }
    }
}

/// Explicit handle of a single run
pub struct Session {
    info: SessionInfo,
    started: Instant,
    span: Span,
    hooks: Vec<ReleaseHook>,
    released: bool,
}

impl Session {
    pub fn builder(app_name: impl Into<String>) -> SessionBuilder {
        SessionBuilder {
            app_name: app_name.into(),
            hooks: Vec::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.info.id
    }

    pub fn app_name(&self) -> &str {
        &self.info.app_name
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Tracing span all work of this session is recorded under
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Releases the session on the regular exit path
    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let elapsed = self.elapsed();
        self.span
            .in_scope(|| info!(elapsed_ms = elapsed.as_millis() as u64, "session stopped"));
        for hook in self.hooks.drain(..) {
            hook(&self.info);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.released {
            self.span
                .in_scope(|| warn!("session dropped before it was stopped, releasing"));
            self.release();
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.info.id)
            .field("app_name", &self.info.app_name)
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};

    fn counting(counter: &Arc<AtomicUsize>) -> impl FnOnce(&SessionInfo) + Send + 'static {
        let counter = Arc::clone(counter);
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn stop_releases_once() {
        let released = Arc::new(AtomicUsize::new(0));
        let session = Session::builder("test").on_release(counting(&released)).start();

        session.stop();
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_on_error_path() {
        let released = Arc::new(AtomicUsize::new(0));

        fn failing_run(session: &Session) -> Result<(), String> {
            let _ = session.id();
            Err("malformed record".to_string())
        }

        let result = (|| {
            let session = Session::builder("test").on_release(counting(&released)).start();
            failing_run(&session)?;
            session.stop();
            Ok::<_, String>(())
        })();

        assert!(result.is_err());
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn sessions_are_isolated() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let push = |order: &Arc<Mutex<Vec<u64>>>| {
            let order = Arc::clone(order);
            move |info: &SessionInfo| order.lock().unwrap().push(info.id)
        };

        let first = Session::builder("first").on_release(push(&order)).start();
        let second = Session::builder("second").on_release(push(&order)).start();
        assert_ne!(first.id(), second.id());

        let (first_id, second_id) = (first.id(), second.id());
        second.stop();
        first.stop();

        assert_eq!(*order.lock().unwrap(), vec![second_id, first_id]);
    }

    #[test]
    fn hooks_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = (Arc::clone(&order), Arc::clone(&order));

        Session::builder("test")
            .on_release(move |_| a.lock().unwrap().push("first"))
            .on_release(move |_| b.lock().unwrap().push("second"))
            .start()
            .stop();

        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }
}
