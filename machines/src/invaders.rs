//! Space Invaders (Taito/Midway, 1978).
//!
//! Intel 8080 at 2 MHz driving a 224x256 1bpp raster rotated 90 degrees
//! in the cabinet. The board has no multiply or barrel shift, so a
//! discrete 16-bit shift register hangs off the I/O ports to help the
//! program slide sprites across the bit-packed framebuffer. Video
//! hardware fires two interrupts per frame: RST 1 mid-screen and RST 2
//! at the end of vblank.

use std::time::Duration;

use cathode_core::core::machine::{InputButton, Machine};
use cathode_core::core::ports::IoPorts;
use cathode_core::cpu::I8080;

use crate::registry::MachineEntry;
use crate::rom_loader::{RomEntry, RomLoadError, RomMap, RomSet, load_raw_image};

/// CPU clock rate in Hz.
pub const CLOCK_HZ: u64 = 2_000_000;

/// Real-time cadence of the alternating video interrupts.
pub const INTERRUPT_INTERVAL: Duration = Duration::from_millis(10);

const DISPLAY_WIDTH: u32 = 224;
const DISPLAY_HEIGHT: u32 = 256;

/// Framebuffer span: 1 bit per pixel, 224 columns of 256 pixels.
const VRAM_BASE: usize = 0x2400;
const VRAM_END: usize = 0x4000;

/// Program ROM occupies 0x0000..0x2000.
const ROM_LIMIT: usize = 0x2000;

// Input bit positions on port 1. Bit 3 is wired high on the board.
pub const BUTTON_COIN: u8 = 0;
pub const BUTTON_P2_START: u8 = 1;
pub const BUTTON_P1_START: u8 = 2;
pub const BUTTON_FIRE: u8 = 4;
pub const BUTTON_LEFT: u8 = 5;
pub const BUTTON_RIGHT: u8 = 6;

const INPUT_MAP: [InputButton; 6] = [
    InputButton {
        id: BUTTON_COIN,
        name: "Coin",
    },
    InputButton {
        id: BUTTON_P1_START,
        name: "P1 Start",
    },
    InputButton {
        id: BUTTON_P2_START,
        name: "P2 Start",
    },
    InputButton {
        id: BUTTON_FIRE,
        name: "Fire",
    },
    InputButton {
        id: BUTTON_LEFT,
        name: "Left",
    },
    InputButton {
        id: BUTTON_RIGHT,
        name: "Right",
    },
];

/// The four 2 KiB program ROMs of the standard MAME `invaders` set.
static PROGRAM_ROMS: [RomEntry; 4] = [
    RomEntry {
        name: "invaders.h",
        size: 0x0800,
        base: 0x0000,
        crc32: Some(0x734F_5AD8),
    },
    RomEntry {
        name: "invaders.g",
        size: 0x0800,
        base: 0x0800,
        crc32: Some(0x6BFA_CA4A),
    },
    RomEntry {
        name: "invaders.f",
        size: 0x0800,
        base: 0x1000,
        crc32: Some(0x0CCE_AD96),
    },
    RomEntry {
        name: "invaders.e",
        size: 0x0800,
        base: 0x1800,
        crc32: Some(0x14E5_38B0),
    },
];

static PROGRAM_MAP: RomMap = RomMap {
    entries: &PROGRAM_ROMS,
};

/// The discrete 16-bit shift register on ports 2/3/4.
///
/// OUT 4 shifts a byte in (old high byte becomes the low byte); OUT 2
/// sets a 3-bit window offset; IN 3 reads 8 bits starting `offset` bits
/// down from the top.
#[derive(Default)]
struct ShiftRegister {
    hi: u8,
    lo: u8,
    offset: u8,
}

impl ShiftRegister {
    fn push(&mut self, value: u8) {
        self.lo = self.hi;
        self.hi = value;
    }

    fn set_offset(&mut self, value: u8) {
        self.offset = value & 0x07;
    }

    fn read(&self) -> u8 {
        let pair = ((self.hi as u16) << 8) | self.lo as u16;
        ((pair >> (8 - self.offset as u16)) & 0xFF) as u8
    }
}

/// A sound-latch write whose newly-set bits select effects to trigger.
///
/// The board retriggers a sample on a 0-to-1 transition of its bit, so
/// only rising edges are reported; an audio host drains these with
/// [`InvadersSystem::take_sound_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoundEvent {
    /// Latch port, 3 or 5.
    pub port: u8,
    /// Bits that went from 0 to 1 in this write.
    pub rising_bits: u8,
}

/// Port map of the Space Invaders board.
struct InvadersPorts {
    shift: ShiftRegister,
    port1: u8,
    dips: u8,
    sound_latch: [u8; 2],
    sound_events: Vec<SoundEvent>,
}

impl InvadersPorts {
    fn new() -> Self {
        Self {
            shift: ShiftRegister::default(),
            port1: 0,
            dips: 0,
            sound_latch: [0; 2],
            sound_events: Vec::new(),
        }
    }

    fn latch_sound(&mut self, slot: usize, port: u8, value: u8) {
        let rising = value & !self.sound_latch[slot];
        self.sound_latch[slot] = value;
        if rising != 0 {
            self.sound_events.push(SoundEvent {
                port,
                rising_bits: rising,
            });
        }
    }
}

impl IoPorts for InvadersPorts {
    fn read_port(&mut self, port: u8) -> u8 {
        match port {
            0 => 0x01,
            // Bit 3 is wired high.
            1 => self.port1 | 0x08,
            2 => self.dips,
            3 => self.shift.read(),
            _ => 0,
        }
    }

    fn write_port(&mut self, port: u8, value: u8) {
        match port {
            2 => self.shift.set_offset(value),
            4 => self.shift.push(value),
            3 => self.latch_sound(0, 3, value),
            5 => self.latch_sound(1, 5, value),
            // Port 6: watchdog kick, nothing to emulate.
            _ => {}
        }
    }
}

/// The assembled Space Invaders machine.
pub struct InvadersSystem {
    cpu: I8080,
    io: InvadersPorts,
    rom: Vec<u8>,
    next_vector: u8,
}

impl InvadersSystem {
    fn empty() -> Self {
        Self {
            cpu: I8080::new(),
            io: InvadersPorts::new(),
            rom: Vec::new(),
            next_vector: 1,
        }
    }

    /// Build the machine from the standard four-file ROM set, verifying
    /// sizes and checksums.
    pub fn from_rom_set(rom_set: &RomSet) -> Result<Self, RomLoadError> {
        let mut sys = Self::empty();
        PROGRAM_MAP.load_into(rom_set, &mut sys.cpu)?;
        sys.rom = sys.cpu.memory[..ROM_LIMIT].to_vec();
        Ok(sys)
    }

    /// Build the machine from one pre-joined program image of at most
    /// 8 KiB, loaded at address 0. No checksum is enforced.
    pub fn from_single_rom(image: &[u8]) -> Result<Self, RomLoadError> {
        let mut sys = Self::empty();
        load_raw_image(&mut sys.cpu, 0, image, ROM_LIMIT)?;
        sys.rom = image.to_vec();
        Ok(sys)
    }

    /// Set the DIP-switch bank read on port 2 (ship count, bonus life,
    /// coin info). All-zero is the factory default.
    pub fn set_dip_switches(&mut self, value: u8) {
        self.io.dips = value;
    }

    /// Drain the sound-trigger events recorded since the last call.
    pub fn take_sound_events(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.io.sound_events)
    }

    pub fn cpu(&self) -> &I8080 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut I8080 {
        &mut self.cpu
    }
}

impl Machine for InvadersSystem {
    fn step(&mut self) -> u32 {
        self.cpu.step(&mut self.io)
    }

    fn interrupts_enabled(&self) -> bool {
        self.cpu.interrupts_enabled
    }

    fn deliver_interrupt(&mut self) {
        self.cpu.interrupt(self.next_vector);
        // Mid-screen (1) and end-of-vblank (2) alternate.
        self.next_vector = if self.next_vector == 1 { 2 } else { 1 };
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        let bit = 1u8 << (button & 0x07);
        if pressed {
            self.io.port1 |= bit;
        } else {
            self.io.port1 &= !bit;
        }
    }

    fn input_map(&self) -> &[InputButton] {
        &INPUT_MAP
    }

    fn display_size(&self) -> (u32, u32) {
        (DISPLAY_WIDTH, DISPLAY_HEIGHT)
    }

    fn video_memory(&self) -> &[u8] {
        &self.cpu.memory[VRAM_BASE..VRAM_END]
    }

    fn reset(&mut self) {
        // Physical DIP switches survive a power cycle.
        let dips = self.io.dips;
        self.cpu.reset();
        self.cpu.load(0, &self.rom);
        self.io = InvadersPorts::new();
        self.io.dips = dips;
        self.next_vector = 1;
    }
}

fn create_machine(rom_set: &RomSet) -> Result<Box<dyn Machine>, RomLoadError> {
    Ok(Box::new(InvadersSystem::from_rom_set(rom_set)?))
}

inventory::submit! {
    MachineEntry::new("invaders", "invaders", create_machine)
}
