use std::thread;
use std::time::Duration;

use cathode_core::core::{InputButton, Machine, Scheduler};

/// Machine stand-in with a fixed per-step cost and interrupt bookkeeping.
struct CountingMachine {
    steps: u64,
    cycles_per_step: u32,
    interrupts_enabled: bool,
    interrupts_delivered: u32,
}

impl CountingMachine {
    fn new(cycles_per_step: u32) -> Self {
        Self {
            steps: 0,
            cycles_per_step,
            interrupts_enabled: false,
            interrupts_delivered: 0,
        }
    }
}

impl Machine for CountingMachine {
    fn step(&mut self) -> u32 {
        self.steps += 1;
        self.cycles_per_step
    }

    fn interrupts_enabled(&self) -> bool {
        self.interrupts_enabled
    }

    fn deliver_interrupt(&mut self) {
        self.interrupts_delivered += 1;
    }

    fn set_input(&mut self, _button: u8, _pressed: bool) {}

    fn input_map(&self) -> &[InputButton] {
        &[]
    }

    fn display_size(&self) -> (u32, u32) {
        (0, 0)
    }

    fn video_memory(&self) -> &[u8] {
        &[]
    }

    fn reset(&mut self) {
        self.steps = 0;
    }
}

// --- run state ---

#[test]
fn test_stopped_scheduler_runs_nothing() {
    let mut scheduler = Scheduler::new(2_000_000);
    let mut machine = CountingMachine::new(4);

    assert!(!scheduler.is_running());
    assert_eq!(scheduler.tick(&mut machine), 0);
    assert_eq!(machine.steps, 0);
}

#[test]
fn test_start_is_idempotent() {
    let mut scheduler = Scheduler::new(2_000_000);
    scheduler.start();
    assert!(scheduler.is_running());
    scheduler.start();
    assert!(scheduler.is_running());
}

#[test]
fn test_stop_clears_accumulator() {
    let mut scheduler = Scheduler::new(2_000_000);
    let mut machine = CountingMachine::new(4);
    scheduler.start();
    thread::sleep(Duration::from_millis(2));
    scheduler.tick(&mut machine);

    scheduler.stop();
    assert!(!scheduler.is_running());
    assert_eq!(scheduler.cycles_run(), 0);
    assert_eq!(scheduler.tick(&mut machine), 0, "stopped again, nothing runs");
}

// --- pacing ---

#[test]
fn test_budget_tracks_wall_clock() {
    let mut scheduler = Scheduler::new(2_000_000);
    let mut machine = CountingMachine::new(4);
    scheduler.start();

    thread::sleep(Duration::from_millis(10));
    let executed = scheduler.tick(&mut machine);

    // 10 ms at 2 MHz is 20_000 cycles. Allow generous slack for timer
    // resolution and scheduling delay, but never less than the budget.
    assert!(executed >= 20_000, "ran {executed} cycles, expected >= 20000");
    assert!(executed < 400_000, "ran {executed} cycles, runaway budget");
    assert_eq!(scheduler.cycles_run(), executed);
}

#[test]
fn test_budget_overshoots_by_less_than_one_instruction() {
    let mut scheduler = Scheduler::new(2_000_000);
    let mut machine = CountingMachine::new(7);
    scheduler.start();

    thread::sleep(Duration::from_millis(5));
    let executed = scheduler.tick(&mut machine);
    assert_eq!(
        executed,
        machine.steps * 7,
        "every step's cycles are accounted"
    );
}

#[test]
fn test_consecutive_ticks_accumulate() {
    let mut scheduler = Scheduler::new(2_000_000);
    let mut machine = CountingMachine::new(4);
    scheduler.start();

    thread::sleep(Duration::from_millis(2));
    let first = scheduler.tick(&mut machine);
    thread::sleep(Duration::from_millis(2));
    let second = scheduler.tick(&mut machine);

    assert_eq!(scheduler.cycles_run(), first + second);
}

#[test]
fn test_reset_restamps_clock() {
    let mut scheduler = Scheduler::new(2_000_000);
    let mut machine = CountingMachine::new(4);
    scheduler.start();
    thread::sleep(Duration::from_millis(20));

    // Reset right before the tick: the 20 ms gap must not be billed.
    scheduler.reset();
    let executed = scheduler.tick(&mut machine);
    assert!(executed < 20_000, "ran {executed} cycles across a reset gap");
    assert!(scheduler.is_running(), "reset keeps the run state");
}

// --- interrupt delivery ---

#[test]
fn test_interrupt_requires_enable_latch() {
    let mut scheduler = Scheduler::with_interrupts(2_000_000, Duration::ZERO);
    let mut machine = CountingMachine::new(4);
    machine.interrupts_enabled = false;
    scheduler.start();

    thread::sleep(Duration::from_millis(1));
    scheduler.tick(&mut machine);
    assert_eq!(machine.interrupts_delivered, 0, "latch clear, nothing delivered");

    machine.interrupts_enabled = true;
    thread::sleep(Duration::from_millis(1));
    scheduler.tick(&mut machine);
    assert_eq!(machine.interrupts_delivered, 1);
}

#[test]
fn test_interrupt_once_per_tick() {
    // A zero interval is always due, but delivery is checked only at the
    // start of a tick, so each tick delivers at most one.
    let mut scheduler = Scheduler::with_interrupts(2_000_000, Duration::ZERO);
    let mut machine = CountingMachine::new(4);
    machine.interrupts_enabled = true;
    scheduler.start();

    for _ in 0..3 {
        thread::sleep(Duration::from_millis(1));
        scheduler.tick(&mut machine);
    }
    assert_eq!(machine.interrupts_delivered, 3);
}

#[test]
fn test_interrupt_interval_is_honored() {
    let mut scheduler = Scheduler::with_interrupts(2_000_000, Duration::from_secs(3600));
    let mut machine = CountingMachine::new(4);
    machine.interrupts_enabled = true;
    scheduler.start();

    thread::sleep(Duration::from_millis(2));
    scheduler.tick(&mut machine);
    assert_eq!(machine.interrupts_delivered, 0, "interval not yet elapsed");
}

#[test]
fn test_plain_scheduler_never_interrupts() {
    let mut scheduler = Scheduler::new(2_000_000);
    let mut machine = CountingMachine::new(4);
    machine.interrupts_enabled = true;
    scheduler.start();

    thread::sleep(Duration::from_millis(2));
    scheduler.tick(&mut machine);
    assert_eq!(machine.interrupts_delivered, 0);
}
