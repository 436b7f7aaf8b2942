//! CPU state snapshot types

use crate::cpu::i8080::Flags;

/// I8080 CPU state snapshot (registers and latches, no memory).
#[derive(Debug, Clone, PartialEq)]
pub struct I8080State {
    pub a: u8,       // Accumulator
    pub b: u8,       // Register B
    pub c: u8,       // Register C
    pub d: u8,       // Register D
    pub e: u8,       // Register E
    pub h: u8,       // Register H
    pub l: u8,       // Register L
    pub sp: u16,     // Stack pointer
    pub pc: u16,     // Program counter
    pub flags: Flags,
    pub interrupts_enabled: bool,
    pub halted: bool,
    pub cycle: u64,  // Cycles executed since reset
}
