//! Periodic tasks on a single timeline
//!
//! The swing, decision and session ticks are fixed-step accumulators fed
//! by one `advance` call, so tick callbacks always run one after another
//! and each sees the previous one's writes. Every task can be canceled
//! independently and all of them together; canceling is idempotent.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_SUBSTEPS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Hook angle update
    Swing,
    /// Autoplay evaluation
    Decision,
    /// Once-per-second countdown
    Session,
}

impl TaskKind {
    /// Order in which due tasks run within one update
    pub const ALL: [TaskKind; 3] = [TaskKind::Swing, TaskKind::Decision, TaskKind::Session];
}

/// A fixed-period accumulator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub period_ms: u32,
    accumulated: f32,
}

impl Interval {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulated: 0.0,
        }
    }

    /// Feed elapsed time, returning how many periods fired. Capped at
    /// MAX_SUBSTEPS; any excess backlog is dropped.
    fn feed(&mut self, delta_ms: f32) -> u32 {
        self.accumulated += delta_ms.max(0.0);
        let period = self.period_ms as f32;

        let mut fired = 0;
        while self.accumulated >= period && fired < MAX_SUBSTEPS {
            self.accumulated -= period;
            fired += 1;
        }
        if fired == MAX_SUBSTEPS && self.accumulated >= period {
            log::debug!(
                "Dropping {:.0}ms of backlog on a {}ms task",
                self.accumulated,
                self.period_ms
            );
            self.accumulated %= period;
        }
        fired
    }
}

/// The live periodic tasks. At most one of each kind exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timers {
    swing: Option<Interval>,
    decision: Option<Interval>,
    session: Option<Interval>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: TaskKind) -> &mut Option<Interval> {
        match kind {
            TaskKind::Swing => &mut self.swing,
            TaskKind::Decision => &mut self.decision,
            TaskKind::Session => &mut self.session,
        }
    }

    /// Start a task, replacing (and so canceling) any running one of the same kind
    pub fn start(&mut self, kind: TaskKind, period_ms: u32) {
        if self.cancel(kind) {
            log::debug!("Restarting {kind:?} timer");
        }
        *self.slot(kind) = Some(Interval::new(period_ms));
    }

    /// Stop a task. Returns whether one was running.
    pub fn cancel(&mut self, kind: TaskKind) -> bool {
        self.slot(kind).take().is_some()
    }

    pub fn cancel_all(&mut self) {
        for kind in TaskKind::ALL {
            self.cancel(kind);
        }
    }

    pub fn is_running(&self, kind: TaskKind) -> bool {
        match kind {
            TaskKind::Swing => self.swing.is_some(),
            TaskKind::Decision => self.decision.is_some(),
            TaskKind::Session => self.session.is_some(),
        }
    }

    pub fn any_running(&self) -> bool {
        TaskKind::ALL.iter().any(|k| self.is_running(*k))
    }

    /// Advance every running task by `delta_ms` and list the ticks that
    /// fell due, interleaved in period order so a long frame replays like
    /// several short ones.
    pub fn advance(&mut self, delta_ms: f32) -> Vec<TaskKind> {
        let mut due: Vec<(u32, u32, TaskKind)> = Vec::new();

        for (order, kind) in TaskKind::ALL.into_iter().enumerate() {
            let Some(interval) = self.slot(kind).as_mut() else {
                continue;
            };
            let period = interval.period_ms;
            let fired = interval.feed(delta_ms);
            for n in 1..=fired {
                due.push((n * period, order as u32, kind));
            }
        }

        // Stable on (time, kind order)
        due.sort_by_key(|(at, order, _)| (*at, *order));
        due.into_iter().map(|(_, _, kind)| kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_fires_per_period() {
        let mut interval = Interval::new(50);
        assert_eq!(interval.feed(30.0), 0);
        assert_eq!(interval.feed(30.0), 1);
        assert_eq!(interval.feed(100.0), 2);
    }

    #[test]
    fn test_interval_caps_substeps() {
        let mut interval = Interval::new(50);
        assert_eq!(interval.feed(10_000.0), MAX_SUBSTEPS);
        // Backlog dropped, not carried forward
        assert_eq!(interval.feed(0.0), 0);
    }

    #[test]
    fn test_start_replaces_existing_timer() {
        let mut timers = Timers::new();
        timers.start(TaskKind::Swing, 50);
        timers.advance(40.0);
        timers.start(TaskKind::Swing, 50);
        // Fresh accumulator: the old 40ms did not survive
        assert!(timers.advance(20.0).is_empty());
        assert_eq!(timers.advance(30.0), vec![TaskKind::Swing]);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut timers = Timers::new();
        timers.start(TaskKind::Decision, 50);
        assert!(timers.cancel(TaskKind::Decision));
        assert!(!timers.cancel(TaskKind::Decision));
        timers.cancel_all();
        timers.cancel_all();
        assert!(!timers.any_running());
        assert!(timers.advance(1_000.0).is_empty());
    }

    #[test]
    fn test_due_ticks_interleave_by_time() {
        let mut timers = Timers::new();
        timers.start(TaskKind::Swing, 50);
        timers.start(TaskKind::Decision, 100);
        timers.start(TaskKind::Session, 1000);

        let due = timers.advance(100.0);
        assert_eq!(
            due,
            vec![TaskKind::Swing, TaskKind::Swing, TaskKind::Decision]
        );

        let due = timers.advance(900.0);
        assert_eq!(due.last(), Some(&TaskKind::Session));
        assert_eq!(due.iter().filter(|k| **k == TaskKind::Swing).count(), 8);
    }
}
