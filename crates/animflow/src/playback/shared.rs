//! Thread-safe handle around a [`PlaybackController`].

use std::{
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{
    playback::{PlaybackController, PlaybackEvent, TransportState, UtteranceToken},
    scheduler::{Scheduler, TimelineClock},
};

/// Serializes access to a controller shared between a tick loop and a
/// narration engine callback.
///
/// A panic while holding the lock does not poison the player; the next
/// caller continues with the controller as it was left.
///
/// Narration completions are queued rather than applied under the
/// controller lock. The queue is drained at the start of every call, so an
/// engine may report completion from inside `speak` without deadlocking.
pub struct SharedPlayer<S: Scheduler = TimelineClock> {
    inner: Arc<Mutex<PlaybackController<S>>>,
    completed: Arc<Mutex<Vec<UtteranceToken>>>,
}

impl<S: Scheduler> Clone for SharedPlayer<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            completed: Arc::clone(&self.completed),
        }
    }
}

impl<S: Scheduler + Send + 'static> SharedPlayer<S> {
    pub fn new(controller: PlaybackController<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
            completed: Arc::default(),
        }
    }

    /// Runs `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut PlaybackController<S>) -> R) -> R {
        let mut player = lock(&self.inner);
        let completed = mem::take(&mut *lock(&self.completed));
        for token in completed {
            player.on_narration_end(token);
        }
        f(&mut player)
    }

    pub fn play(&self) {
        self.with(PlaybackController::play);
    }

    pub fn pause(&self) {
        self.with(PlaybackController::pause);
    }

    pub fn stop(&self) {
        self.with(PlaybackController::stop);
    }

    pub fn seek(&self, time: f64) {
        self.with(|player| player.seek(time));
    }

    pub fn tick(&self, elapsed: f64) {
        self.with(|player| player.tick(elapsed));
    }

    pub fn state(&self) -> TransportState {
        self.with(|player| player.state())
    }

    pub fn current_time(&self) -> f64 {
        self.with(|player| player.current_time())
    }

    pub fn drain_events(&self) -> Vec<PlaybackEvent> {
        self.with(PlaybackController::drain_events)
    }

    /// A completion callback to hand to a speech engine.
    ///
    /// The token takes effect on the next call into the player.
    pub fn narration_callback(&self) -> Box<dyn Fn(UtteranceToken) + Send + Sync> {
        let completed = Arc::clone(&self.completed);
        Box::new(move |token| lock(&completed).push(token))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
