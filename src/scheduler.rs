use crate::config::Config;
use crate::Pathfinder;
use log::{debug, warn};

/// Work that can be advanced in small increments, one unit per [advance](Steppable::advance).
pub trait Steppable {
    /// Prepares the work before the first advance.
    fn begin(&mut self);
    /// Performs one unit of work.
    fn advance(&mut self);
    fn is_finished(&self) -> bool;
}

impl Steppable for Pathfinder {
    fn begin(&mut self) {
        self.begin_search();
    }
    fn advance(&mut self) {
        self.step();
    }
    /// A search that is not running, including one that was never started, has nothing
    /// left to do.
    fn is_finished(&self) -> bool {
        !self.status().is_running()
    }
}

/// Drives a [Steppable] from an animation loop: each [tick](Scheduler::tick) advances the
/// target a fixed number of times, so the speed of the animation is independent of the
/// work done per step. Stopping the scheduler is the only cancellation there is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduler {
    steps_per_tick: usize,
    running: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Scheduler::from_config(&Config::default())
    }
}

impl Scheduler {
    pub fn new(steps_per_tick: usize) -> Scheduler {
        let mut scheduler = Scheduler {
            steps_per_tick: 1,
            running: false,
        };
        scheduler.set_steps_per_tick(steps_per_tick);
        scheduler
    }

    pub fn from_config(config: &Config) -> Scheduler {
        Scheduler::new(config.steps_per_tick)
    }

    pub fn steps_per_tick(&self) -> usize {
        self.steps_per_tick
    }

    /// Changes the speed; values below one are raised to one.
    pub fn set_steps_per_tick(&mut self, steps_per_tick: usize) {
        if steps_per_tick == 0 {
            warn!("Cannot run zero steps per tick, using one");
        }
        self.steps_per_tick = steps_per_tick.max(1);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begins the target and schedules it, unless it has nothing to do.
    pub fn start<S: Steppable>(&mut self, target: &mut S) {
        target.begin();
        self.running = !target.is_finished();
        debug!("Scheduler started, running: {}", self.running);
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advances the target up to `steps_per_tick` times and returns how many advances were
    /// made. Stops scheduling once the target is finished.
    pub fn tick<S: Steppable>(&mut self, target: &mut S) -> usize {
        if !self.running {
            return 0;
        }
        let mut steps = 0;
        while steps < self.steps_per_tick && !target.is_finished() {
            target.advance();
            steps += 1;
        }
        if target.is_finished() {
            debug!("Target finished, scheduler stopping");
            self.running = false;
        }
        steps
    }
}
