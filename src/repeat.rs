//! A module for running an asynchronous action on a steady cadence.
//!
//! The [`Repeater`] invokes an action immediately, waits for it to
//! complete, pauses for its interval and starts over. The pause is measured
//! from the *end* of one run to the *start* of the next, so a slow action
//! stretches the cycle instead of overlapping with itself.
//!
//! Every started loop is a separate tokio task controlled by the returned
//! [`RepeaterHandle`]. Cancelling it never interrupts a running action; it
//! only prevents the next one.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use grow_sensors::repeat;
//!
//! # tokio_test::block_on(async {
//! let handle = repeat::start(|| async { println!("tick") }, Duration::from_secs(1));
//!
//! handle.cancel();
//! handle.join().await.unwrap();
//! # })
//! ```

use std::convert::Infallible;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};

/// Lifecycle of a polling loop.
///
/// ```text
/// Idle ──▶ Running ──▶ Cancelled
/// Idle ──▶ Cancelled
/// ```
///
/// [`Cancelled`](RepeaterState::Cancelled) is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeaterState {
  /// The loop was created but its task has not run yet.
  Idle,

  /// The loop is invoking its action or waiting for the next run.
  Running,

  /// No further invocations will be made.
  Cancelled,
}

/// What a loop does when a fallible action returns an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
  /// Log the error and keep the cadence.
  #[default]
  Continue,

  /// Log the error and stop the loop.
  Halt,
}

/// Settings shared by every loop started from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeater {
  interval: Duration,
  on_failure: FailurePolicy,
}

impl Repeater {
  /// Create a repeater pausing `interval` between runs.
  pub fn new(interval: Duration) -> Self {
    Self {
      interval,
      on_failure: FailurePolicy::default(),
    }
  }

  /// Set the policy applied by [`start_fallible`](Repeater::start_fallible).
  pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
    self.on_failure = policy;
    self
  }

  /// Pause between the end of one run and the start of the next.
  pub fn interval(&self) -> Duration {
    self.interval
  }

  /// Start a loop invoking `action`. Its output is discarded.
  ///
  /// Must be called from within a tokio runtime.
  pub fn start<F, Fut>(&self, mut action: F) -> RepeaterHandle
  where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future + Send + 'static,
  {
    self.spawn(move || {
      let run = action();

      async move {
        run.await;
        Ok::<(), Infallible>(())
      }
    })
  }

  /// Start a loop invoking an `action` that may fail.
  ///
  /// Errors are logged and then handled according to the configured
  /// [`FailurePolicy`]. Successful outputs are discarded.
  pub fn start_fallible<F, Fut, T, E>(&self, action: F) -> RepeaterHandle
  where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
  {
    self.spawn(action)
  }

  fn spawn<F, Fut, T, E>(&self, mut action: F) -> RepeaterHandle
  where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
    T: Send + 'static,
    E: Display + Send + 'static,
  {
    let Repeater {
      interval,
      on_failure,
    } = *self;
    let state = Arc::new(watch::Sender::new(RepeaterState::Idle));
    let shared = Arc::clone(&state);

    let task = tokio::spawn(async move {
      let mut signal = shared.subscribe();

      if transition(&shared, RepeaterState::Running) {
        debug!("repeater started, interval {:?}", interval);
      }

      loop {
        let failed = match action().await {
          Ok(_) => false,
          Err(error) => {
            warn!("repeated action failed: {}", error);
            true
          }
        };

        if failed
          && on_failure == FailurePolicy::Halt
          && transition(&shared, RepeaterState::Cancelled)
        {
          debug!("repeater halted after a failed action");
        }

        if *signal.borrow() == RepeaterState::Cancelled {
          break;
        }

        debug!("next run in {:?}", interval);

        tokio::select! {
          _ = tokio::time::sleep(interval) => {}
          _ = signal.wait_for(|state| *state == RepeaterState::Cancelled) => break,
        }
      }

      debug!("repeater stopped");
    });

    RepeaterHandle { state, task }
  }
}

/// Cancellation capability for one running loop.
///
/// Dropping the handle does not stop the loop.
#[derive(Debug)]
pub struct RepeaterHandle {
  state: Arc<watch::Sender<RepeaterState>>,
  task: JoinHandle<()>,
}

impl RepeaterHandle {
  /// Prevent any further invocation.
  ///
  /// An invocation already in flight runs to completion. A pending pause is
  /// abandoned immediately. Calling it again has no effect.
  pub fn cancel(&self) {
    if transition(&self.state, RepeaterState::Cancelled) {
      debug!("repeater cancelled");
    }
  }

  /// Current state of the loop.
  pub fn state(&self) -> RepeaterState {
    *self.state.borrow()
  }

  /// Whether [`cancel`](RepeaterHandle::cancel) was called or the loop halted.
  pub fn is_cancelled(&self) -> bool {
    self.state() == RepeaterState::Cancelled
  }

  /// Whether the loop's task has exited.
  pub fn is_finished(&self) -> bool {
    self.task.is_finished()
  }

  /// Wait for the loop's task to exit.
  ///
  /// Only returns once the loop is cancelled, halted, or its action panicked;
  /// the panic is reported as a [`JoinError`].
  pub async fn join(self) -> Result<(), JoinError> {
    self.task.await
  }
}

/// Start a loop invoking `action`, pausing `interval` between runs.
///
/// Shorthand for [`Repeater::new(interval).start(action)`](Repeater::start).
/// Each call creates an independent loop.
pub fn start<F, Fut>(action: F, interval: Duration) -> RepeaterHandle
where
  F: FnMut() -> Fut + Send + 'static,
  Fut: Future + Send + 'static,
{
  Repeater::new(interval).start(action)
}

/// Start a loop invoking a fallible `action`, applying `policy` to errors.
pub fn start_fallible<F, Fut, T, E>(action: F, interval: Duration, policy: FailurePolicy) -> RepeaterHandle
where
  F: FnMut() -> Fut + Send + 'static,
  Fut: Future<Output = Result<T, E>> + Send + 'static,
  T: Send + 'static,
  E: Display + Send + 'static,
{
  Repeater::new(interval).on_failure(policy).start_fallible(action)
}

/// Move the loop to `to` if the transition is allowed.
///
/// Returns `true` only when the state actually changed.
fn transition(state: &watch::Sender<RepeaterState>, to: RepeaterState) -> bool {
  state.send_if_modified(|current| {
    let allowed = matches!(
      (*current, to),
      (RepeaterState::Idle, RepeaterState::Running)
        | (RepeaterState::Idle, RepeaterState::Cancelled)
        | (RepeaterState::Running, RepeaterState::Cancelled)
    );

    if allowed {
      *current = to;
    }

    allowed
  })
}
