use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::error::AnalysisError;

/// Progress and cancellation channel between the analysis and its caller.
pub trait Feedback {
    /// Returns `true` once the caller has asked the analysis to stop.
    fn is_canceled(&self) -> bool;

    /// Adds `amount` percentage points to the reported progress.
    fn advance_progress(&self, amount: f64);
}

/// Feedback that never cancels and discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn is_canceled(&self) -> bool {
        false
    }

    fn advance_progress(&self, _amount: f64) {}
}

/// Thread-safe cancellation token that also accumulates progress.
///
/// Share it behind an `Arc` to cancel a running analysis from another thread.
#[derive(Debug, Default)]
pub struct ProgressFeedback {
    canceled: AtomicBool,
    progress_bits: AtomicU64,
}

impl ProgressFeedback {
    /// Creates a token with zero progress that is not canceled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Relaxed);
    }

    /// Returns the accumulated progress in percent, capped at 100.
    #[must_use]
    pub fn progress(&self) -> f64 {
        f64::from_bits(self.progress_bits.load(Ordering::Relaxed)).min(100.0)
    }
}

impl Feedback for ProgressFeedback {
    fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Relaxed)
    }

    fn advance_progress(&self, amount: f64) {
        let mut current = self.progress_bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + amount).to_bits();
            match self.progress_bits.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

/// Progress share of the stage currently running.
#[derive(Debug, Clone, Copy)]
struct StageBudget {
    amount: f64,
    total_work: usize,
    reported: f64,
}

/// Cancellation checkpoints for the pipeline stages.
///
/// `check` polls the feedback unconditionally and is used at stage
/// boundaries. `tick` counts loop iterations and polls once every
/// `interval` of them, reporting the matching share of the stage's
/// progress budget at the same time. Opening a stage restarts the count.
pub struct Checkpoint<'a> {
    feedback: &'a dyn Feedback,
    interval: usize,
    ticks: usize,
    polls: usize,
    stage: Option<StageBudget>,
}

impl<'a> Checkpoint<'a> {
    /// Creates checkpoints polling `feedback` every `interval` iterations.
    ///
    /// An `interval` of zero is treated as one.
    #[must_use]
    pub fn new(feedback: &'a dyn Feedback, interval: usize) -> Self {
        Self {
            feedback,
            interval: interval.max(1),
            ticks: 0,
            polls: 0,
            stage: None,
        }
    }

    /// Returns how many times the feedback has been polled.
    #[must_use]
    pub fn polls(&self) -> usize {
        self.polls
    }

    /// Polls for cancellation.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Canceled` if cancellation was requested.
    pub fn check(&mut self) -> Result<(), AnalysisError> {
        self.polls += 1;
        if self.feedback.is_canceled() {
            Err(AnalysisError::Canceled)
        } else {
            Ok(())
        }
    }

    /// Records one loop iteration, polling every `interval` iterations.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::Canceled` if cancellation was requested.
    pub fn tick(&mut self) -> Result<(), AnalysisError> {
        self.ticks += 1;
        if self.ticks % self.interval != 0 {
            return Ok(());
        }
        if let Some(stage) = self.stage.as_mut() {
            #[allow(clippy::cast_precision_loss)]
            let target = if stage.total_work == 0 {
                stage.amount
            } else {
                (stage.amount * self.ticks as f64 / stage.total_work as f64).min(stage.amount)
            };
            let delta = target - stage.reported;
            stage.reported = target;
            if delta > 0.0 {
                self.feedback.advance_progress(delta);
            }
        }
        self.check()
    }

    /// Opens a stage worth `amount` percentage points spread over `total_work` ticks.
    pub fn begin_stage(&mut self, amount: f64, total_work: usize) {
        self.finish_stage();
        self.ticks = 0;
        self.stage = Some(StageBudget {
            amount,
            total_work,
            reported: 0.0,
        });
    }

    /// Reports whatever is left of the current stage's budget.
    pub fn finish_stage(&mut self) {
        if let Some(stage) = self.stage.take() {
            let rest = stage.amount - stage.reported;
            if rest > 0.0 {
                self.feedback.advance_progress(rest);
            }
        }
    }

    /// Reports progress outside of any stage budget.
    pub fn advance(&self, amount: f64) {
        self.feedback.advance_progress(amount);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tick_polls_once_per_interval() {
        let fb = NoFeedback;
        let mut cp = Checkpoint::new(&fb, 4);
        for _ in 0..10 {
            cp.tick().unwrap();
        }
        assert_eq!(cp.polls(), 2);
    }

    #[test]
    fn check_always_polls() {
        let fb = NoFeedback;
        let mut cp = Checkpoint::new(&fb, 100);
        cp.check().unwrap();
        cp.check().unwrap();
        assert_eq!(cp.polls(), 2);
    }

    #[test]
    fn canceled_token_stops_at_next_poll() {
        let fb = ProgressFeedback::new();
        let mut cp = Checkpoint::new(&fb, 3);
        cp.tick().unwrap();
        fb.cancel();
        cp.tick().unwrap();
        assert!(matches!(cp.tick(), Err(AnalysisError::Canceled)));
    }

    #[test]
    fn stage_budget_is_reported_exactly_once() {
        let fb = ProgressFeedback::new();
        let mut cp = Checkpoint::new(&fb, 2);
        cp.begin_stage(10.0, 5);
        for _ in 0..5 {
            cp.tick().unwrap();
        }
        assert_relative_eq!(fb.progress(), 8.0, epsilon = 1e-9);
        cp.finish_stage();
        assert_relative_eq!(fb.progress(), 10.0, epsilon = 1e-9);
        cp.finish_stage();
        assert_relative_eq!(fb.progress(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_interval_behaves_like_one() {
        let fb = NoFeedback;
        let mut cp = Checkpoint::new(&fb, 0);
        cp.tick().unwrap();
        cp.tick().unwrap();
        assert_eq!(cp.polls(), 2);
    }

    #[test]
    fn progress_is_capped() {
        let fb = ProgressFeedback::new();
        fb.advance_progress(70.0);
        fb.advance_progress(50.0);
        assert_relative_eq!(fb.progress(), 100.0);
    }

    #[test]
    fn concurrent_advances_are_all_counted() {
        let fb = ProgressFeedback::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        fb.advance_progress(0.0125);
                    }
                });
            }
        });
        assert_relative_eq!(fb.progress(), 50.0, epsilon = 1e-9);
    }
}
