use std::time::{Duration, Instant};

use crate::core::machine::Machine;

/// Paces instruction execution against wall-clock time.
///
/// Each `tick()` converts the wall time elapsed since the previous tick into
/// a cycle budget at the configured clock rate and steps the machine until
/// the budget is met. Slow ticks catch up by executing more instructions;
/// the loop never runs ahead of the deficit. For interactive machines the
/// scheduler also delivers a hardware interrupt at a fixed real cadence,
/// checked once at the start of a tick so interrupts land between batches,
/// never mid-batch.
///
/// The scheduler owns its wall-clock reference and cycle accumulator; it has
/// exactly two states, stopped and running, and transitions only on explicit
/// `start()`/`stop()`/`reset()` calls. `tick()` takes `&mut self`, so batch
/// execution can never be re-entered concurrently with itself.
pub struct Scheduler {
    clock_hz: u64,
    interrupt_interval: Option<Duration>,
    cycles_run: u64,
    clock: Option<TickClock>,
}

/// Wall-clock references, present only while running.
struct TickClock {
    last_tick: Instant,
    last_interrupt: Instant,
}

impl Scheduler {
    /// Scheduler without interrupt delivery (diagnostics-style machines).
    pub fn new(clock_hz: u64) -> Self {
        Self {
            clock_hz,
            interrupt_interval: None,
            cycles_run: 0,
            clock: None,
        }
    }

    /// Scheduler that additionally delivers a hardware interrupt whenever
    /// `interval` has elapsed since the last delivery and the machine's
    /// interrupt-enable latch is set.
    pub fn with_interrupts(clock_hz: u64, interval: Duration) -> Self {
        Self {
            clock_hz,
            interrupt_interval: Some(interval),
            cycles_run: 0,
            clock: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_some()
    }

    /// Begin consuming wall-clock time. No-op if already running.
    pub fn start(&mut self) {
        if self.clock.is_none() {
            let now = Instant::now();
            self.clock = Some(TickClock {
                last_tick: now,
                last_interrupt: now,
            });
        }
    }

    /// Stop unconditionally and immediately. Instructions are atomic, so no
    /// half-done machine state ever needs cleanup.
    pub fn stop(&mut self) {
        self.clock = None;
        self.cycles_run = 0;
    }

    /// Restamp the wall-clock references without changing the run state.
    /// Call after a machine reset so the next tick does not try to "catch
    /// up" across the reset gap.
    pub fn reset(&mut self) {
        self.cycles_run = 0;
        if let Some(clock) = &mut self.clock {
            let now = Instant::now();
            clock.last_tick = now;
            clock.last_interrupt = now;
        }
    }

    /// Run one pacing tick: deliver a due interrupt, then execute whole
    /// instructions until the elapsed-time cycle budget is met. Returns the
    /// number of cycles executed (0 while stopped).
    pub fn tick(&mut self, machine: &mut dyn Machine) -> u64 {
        let Some(clock) = &mut self.clock else {
            return 0;
        };

        let now = Instant::now();

        // Interrupt cadence is checked before cycle catch-up, once per tick.
        if let Some(interval) = self.interrupt_interval
            && now.duration_since(clock.last_interrupt) >= interval
            && machine.interrupts_enabled()
        {
            machine.deliver_interrupt();
            clock.last_interrupt = now;
        }

        let elapsed = now.duration_since(clock.last_tick);
        let budget = (elapsed.as_secs_f64() * self.clock_hz as f64) as u64;

        let mut executed = 0u64;
        while executed < budget {
            executed += machine.step() as u64;
        }

        self.cycles_run += executed;
        clock.last_tick = now;
        executed
    }

    /// Total cycles executed since the last `start()`/`reset()`.
    pub fn cycles_run(&self) -> u64 {
        self.cycles_run
    }
}
