//! Cancellable repeating actions
//!
//! The engine runs one continuous-render action and two fixed-interval
//! actions. They share a single thread and interleave however the host
//! schedules them; nothing here orders one kind against the other.
//!
//! `FrameScheduler` keeps the due times for hosts that pump it (the virtual
//! clock), and hands out its `CancelToken` to hosts that register real timers
//! (the browser). Cancelling the token stops both kinds.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::EngineConfig;

/// The repeating actions the engine knows how to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Progress channels + sprites, every rendered frame
    Frame,
    /// Pulse/glow phases
    Ambient,
    /// Glyph rain redraw
    Rain,
}

/// How often an action repeats
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cadence {
    /// Re-invoked after each completion at roughly `hz`; missed frames are dropped
    Continuous { hz: f64 },
    /// Fixed period timer
    Interval { period_ms: f64 },
}

impl Cadence {
    pub fn period_ms(&self) -> f64 {
        match *self {
            Cadence::Continuous { hz } => 1000.0 / hz,
            Cadence::Interval { period_ms } => period_ms,
        }
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// One registered action
#[derive(Debug, Clone)]
pub struct RepeatingTask {
    pub action: Action,
    pub cadence: Cadence,
    next_due_ms: f64,
    runs: u64,
}

impl RepeatingTask {
    fn new(action: Action, cadence: Cadence) -> Self {
        Self {
            action,
            cadence,
            next_due_ms: f64::INFINITY,
            runs: 0,
        }
    }

    pub fn next_due_ms(&self) -> f64 {
        self.next_due_ms
    }

    pub fn runs(&self) -> u64 {
        self.runs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct FrameScheduler {
    tasks: Vec<RepeatingTask>,
    token: CancelToken,
    state: SchedulerState,
}

impl FrameScheduler {
    /// Register the engine's three actions from the configured cadences
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_tasks(&[
            (Action::Frame, Cadence::Continuous { hz: config.frame_hz }),
            (
                Action::Ambient,
                Cadence::Interval {
                    period_ms: config.ambient_period_ms,
                },
            ),
            (
                Action::Rain,
                Cadence::Interval {
                    period_ms: config.rain_period_ms,
                },
            ),
        ])
    }

    pub fn with_tasks(tasks: &[(Action, Cadence)]) -> Self {
        Self {
            tasks: tasks
                .iter()
                .map(|&(action, cadence)| RepeatingTask::new(action, cadence))
                .collect(),
            token: CancelToken::new(),
            state: SchedulerState::Idle,
        }
    }

    pub fn tasks(&self) -> &[RepeatingTask] {
        &self.tasks
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running && !self.token.is_cancelled()
    }

    /// Token host timers must check before each run
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Arm every task. Continuous tasks are due immediately, interval tasks
    /// after one period. Starting a running scheduler does nothing.
    pub fn start(&mut self, now_ms: f64) {
        if self.is_running() {
            return;
        }
        if self.state == SchedulerState::Stopped || self.token.is_cancelled() {
            // Old token stays cancelled for any timers still holding it
            self.token = CancelToken::new();
        }
        for task in &mut self.tasks {
            task.next_due_ms = match task.cadence {
                Cadence::Continuous { .. } => now_ms,
                Cadence::Interval { period_ms } => now_ms + period_ms,
            };
        }
        self.state = SchedulerState::Running;
        log::info!("Scheduler started with {} actions", self.tasks.len());
    }

    /// Cancel everything pending. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Running {
            return;
        }
        self.token.cancel();
        for task in &mut self.tasks {
            task.next_due_ms = f64::INFINITY;
        }
        self.state = SchedulerState::Stopped;
        log::info!("Scheduler stopped");
    }

    /// Earliest due time over all tasks
    pub fn next_due(&self) -> Option<f64> {
        if !self.is_running() {
            return None;
        }
        self.tasks
            .iter()
            .map(|t| t.next_due_ms)
            .filter(|t| t.is_finite())
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Take the earliest action due at `now_ms` and re-arm it.
    /// Ties go to the task registered first.
    pub fn poll(&mut self, now_ms: f64) -> Option<Action> {
        if !self.is_running() {
            return None;
        }
        let mut best: Option<usize> = None;
        for (i, task) in self.tasks.iter().enumerate() {
            if task.next_due_ms > now_ms {
                continue;
            }
            match best {
                Some(b) if self.tasks[b].next_due_ms <= task.next_due_ms => {}
                _ => best = Some(i),
            }
        }

        let task = &mut self.tasks[best?];
        let period = task.cadence.period_ms();
        task.next_due_ms = match task.cadence {
            Cadence::Continuous { .. } => now_ms + period,
            Cadence::Interval { .. } => {
                // Timers that fell behind fire once, not once per missed period
                let next = task.next_due_ms + period;
                if next <= now_ms { now_ms + period } else { next }
            }
        };
        task.runs += 1;
        Some(task.action)
    }

    /// Record a run driven by an external timer
    pub fn note_run(&mut self, action: Action) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.action == action) {
            task.runs += 1;
        }
    }

    pub fn runs(&self, action: Action) -> u64 {
        self.tasks
            .iter()
            .filter(|t| t.action == action)
            .map(|t| t.runs)
            .sum()
    }
}
