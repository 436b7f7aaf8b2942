/// Describes a single input button that a machine accepts.
pub struct InputButton {
    /// Machine-defined button identifier, passed to `set_input()`.
    pub id: u8,
    /// Human-readable name for display/configuration (e.g., "P1 Left", "Coin").
    pub name: &'static str,
}

/// Machine-agnostic interface for emulated systems.
///
/// Each machine (Space Invaders, diagnostics, ...) implements this trait so
/// the scheduler and any hosting front end can drive it without knowing
/// about specific hardware (shift registers, port maps, syscall hooks).
pub trait Machine {
    /// Execute exactly one instruction and return its cycle cost.
    ///
    /// Instructions are atomic: the machine is never observable in a
    /// half-applied state between calls.
    fn step(&mut self) -> u32;

    /// State of the CPU's interrupt-enable latch. The scheduler only
    /// delivers hardware interrupts while this is set.
    fn interrupts_enabled(&self) -> bool;

    /// Deliver the machine's next hardware interrupt. Which vector fires
    /// (and how vectors alternate) is machine policy, not CPU policy.
    ///
    /// Non-interactive machines take the default no-op.
    fn deliver_interrupt(&mut self) {}

    /// Handle an input event. `button` is a machine-defined ID from
    /// `input_map()`. `pressed` is true for key-down, false for key-up.
    /// Each call latches the button state so that subsequent steps see the
    /// accumulated input.
    fn set_input(&mut self, button: u8, pressed: bool);

    /// Get the list of input buttons this machine accepts.
    fn input_map(&self) -> &[InputButton];

    /// Native display resolution as (width, height) in pixels.
    fn display_size(&self) -> (u32, u32);

    /// Raw video memory for an external renderer: a 1-bit-per-pixel bitmap,
    /// columns packed 8 pixels per byte. May be empty for headless machines.
    ///
    /// A renderer on another timeline reads this concurrently with emulation
    /// and must tolerate tearing; the emulation timeline never blocks on it.
    fn video_memory(&self) -> &[u8];

    /// Reset the machine to its initial power-on state (ROM contents kept).
    fn reset(&mut self);
}
