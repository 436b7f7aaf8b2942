//! CP/M-style diagnostics machine for CPU self-test programs.
//!
//! Runs a .COM test binary (8080EXER, CPUTEST, ...) loaded at 0x0100
//! with no I/O hardware at all. Test programs report through the CP/M
//! BDOS convention: CALL 5 with C=9 prints the '$'-terminated string at
//! DE, C=2 prints the character in E. A RET is seeded at 0x0005 so the
//! call returns straight to the test; the machine intercepts the program
//! counter at the call target to capture the output. A jump to 0x0000
//! (CP/M warm boot) marks the suite complete.

use cathode_core::core::machine::{InputButton, Machine};
use cathode_core::core::ports::NullPorts;
use cathode_core::cpu::I8080;

use crate::registry::MachineEntry;
use crate::rom_loader::{RomLoadError, RomSet, load_raw_image};

/// CPU clock rate in Hz. Pacing only matters when hosted interactively;
/// batch runs drive `step()` directly.
pub const CLOCK_HZ: u64 = 2_000_000;

/// .COM programs load and start at 0x0100.
const PROGRAM_BASE: u16 = 0x0100;

/// BDOS entry point intercepted for console output.
const SYSCALL_ADDR: u16 = 0x0005;

/// Warm-boot address; reaching it ends the suite.
const EXIT_ADDR: u16 = 0x0000;

/// Room from the program base to the top of memory.
const PROGRAM_LIMIT: usize = 0x10000 - PROGRAM_BASE as usize;

/// String terminator for the C=9 print call.
const STRING_TERMINATOR: u8 = b'$';

pub struct DiagnosticsSystem {
    cpu: I8080,
    program: Vec<u8>,
    console: Vec<String>,
    completed: bool,
}

impl DiagnosticsSystem {
    /// Load a .COM image at 0x0100 and prepare the syscall intercept.
    pub fn new(program: &[u8]) -> Result<Self, RomLoadError> {
        if program.len() > PROGRAM_LIMIT {
            return Err(RomLoadError::ImageTooLarge {
                actual: program.len(),
                limit: PROGRAM_LIMIT,
            });
        }
        let mut sys = Self {
            cpu: I8080::new(),
            program: program.to_vec(),
            console: Vec::new(),
            completed: false,
        };
        sys.prepare();
        Ok(sys)
    }

    fn prepare(&mut self) {
        // The load is validated in new(); re-preparation cannot fail.
        load_raw_image(&mut self.cpu, PROGRAM_BASE, &self.program, PROGRAM_LIMIT)
            .expect("program image validated at construction");
        self.cpu.write_byte(SYSCALL_ADDR, 0xC9); // RET
        self.cpu.pc = PROGRAM_BASE;
    }

    /// True once the program has jumped back to 0x0000.
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Console lines captured so far.
    pub fn console(&self) -> &[String] {
        &self.console
    }

    /// The whole console as one string.
    pub fn console_text(&self) -> String {
        self.console.concat()
    }

    /// Step until the program completes or `max_steps` instructions have
    /// run. Returns true on completion. The cap keeps a wedged or
    /// long-running test binary from hanging the caller.
    pub fn run_to_completion(&mut self, max_steps: u64) -> bool {
        for _ in 0..max_steps {
            if self.completed {
                return true;
            }
            self.step();
        }
        self.completed
    }

    pub fn cpu(&self) -> &I8080 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut I8080 {
        &mut self.cpu
    }

    /// BDOS console output, keyed on register C.
    fn capture_output(&mut self) {
        match self.cpu.c {
            0x09 => {
                let mut addr = self.cpu.get_de();
                let mut line = String::new();
                loop {
                    let byte = self.cpu.read_byte(addr);
                    if byte == STRING_TERMINATOR {
                        break;
                    }
                    line.push(byte as char);
                    addr = addr.wrapping_add(1);
                }
                self.console.push(line);
            }
            0x02 => self.console.push((self.cpu.e as char).to_string()),
            _ => {}
        }
    }
}

impl Machine for DiagnosticsSystem {
    fn step(&mut self) -> u32 {
        if self.completed {
            return 4;
        }
        if self.cpu.pc == SYSCALL_ADDR {
            self.capture_output();
        }
        if self.cpu.pc == EXIT_ADDR {
            self.completed = true;
            return 4;
        }
        self.cpu.step(&mut NullPorts)
    }

    fn interrupts_enabled(&self) -> bool {
        self.cpu.interrupts_enabled
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
        self.cpu.reset();
        self.console.clear();
        self.completed = false;
        self.prepare();
    }
}

fn create_machine(rom_set: &RomSet) -> Result<Box<dyn Machine>, RomLoadError> {
    let program = rom_set.require("8080EXER.COM")?;
    Ok(Box::new(DiagnosticsSystem::new(program)?))
}

inventory::submit! {
    MachineEntry::new("diagnostics", "8080exer", create_machine)
}
