//! Intel 8080 CPU implementation

mod alu;
mod branch;
mod load_store;
mod stack;

use crate::core::ports::IoPorts;
use crate::cpu::state::I8080State;

/// Size of the flat 16-bit address space.
pub const MEMORY_SIZE: usize = 0x10000;

/// Cycles charged per step while the CPU sits in the halted state.
const HALT_IDLE_CYCLES: u32 = 4;

/// The five 8080 condition flags.
///
/// Parity is even parity: set when the result has an even number of one
/// bits. Aux carry records the carry out of bit 3 on the addition path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub zero: bool,
    pub sign: bool,
    pub parity: bool,
    pub carry: bool,
    pub aux_carry: bool,
}

impl Flags {
    /// Pack into the PSW flag byte: bit 7 sign, bit 6 zero, bit 2 parity,
    /// bit 0 carry. Bit 1 always reads 1, bit 5 always reads 0. Aux carry
    /// is not represented in the PSW image.
    pub fn to_psw(self) -> u8 {
        let mut byte = 0b0000_0010;
        if self.sign {
            byte |= 0x80;
        }
        if self.zero {
            byte |= 0x40;
        }
        if self.parity {
            byte |= 0x04;
        }
        if self.carry {
            byte |= 0x01;
        }
        byte
    }

    /// Unpack a PSW flag byte. Aux carry has no bit in the image and is
    /// left unchanged.
    pub fn set_from_psw(&mut self, byte: u8) {
        self.sign = byte & 0x80 != 0;
        self.zero = byte & 0x40 != 0;
        self.parity = byte & 0x04 != 0;
        self.carry = byte & 0x01 != 0;
    }
}

/// Intel 8080 CPU with its flat 64 KiB memory.
///
/// I/O is not owned by the CPU: `step()` borrows an [`IoPorts`]
/// implementation and routes IN/OUT through it, so the same core drives
/// any port map.
pub struct I8080 {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
    pub flags: Flags,
    pub interrupts_enabled: bool,
    pub halted: bool,
    pub cycle: u64,
    pub memory: Box<[u8; MEMORY_SIZE]>,
}

impl Default for I8080 {
    fn default() -> Self {
        Self::new()
    }
}

impl I8080 {
    pub fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            c: 0,
            d: 0,
            e: 0,
            h: 0,
            l: 0,
            sp: 0,
            pc: 0,
            flags: Flags::default(),
            interrupts_enabled: false,
            halted: false,
            cycle: 0,
            memory: vec![0u8; MEMORY_SIZE].into_boxed_slice().try_into().unwrap(),
        }
    }

    /// Return to the power-on state: all registers, flags, latches and
    /// memory zeroed. Callers reload their program afterwards.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Copy `data` into memory starting at `base`.
    ///
    /// Panics if the image would run past the end of the address space;
    /// that is a caller defect, not a runtime condition.
    pub fn load(&mut self, base: u16, data: &[u8]) {
        let start = base as usize;
        assert!(
            start + data.len() <= MEMORY_SIZE,
            "image of {} bytes at {base:#06x} exceeds the address space",
            data.len()
        );
        self.memory[start..start + data.len()].copy_from_slice(data);
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.memory[addr as usize] = value;
    }

    /// Read a little-endian word at `addr`, wrapping at the top of memory.
    pub fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read_byte(addr) as u16;
        let hi = self.read_byte(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn write_word(&mut self, addr: u16, value: u16) {
        self.write_byte(addr, value as u8);
        self.write_byte(addr.wrapping_add(1), (value >> 8) as u8);
    }

    /// Immediate byte of the instruction at `pc`.
    fn imm8(&self) -> u8 {
        self.read_byte(self.pc.wrapping_add(1))
    }

    /// Immediate little-endian word of the instruction at `pc`.
    fn imm16(&self) -> u16 {
        self.read_word(self.pc.wrapping_add(1))
    }

    pub fn get_bc(&self) -> u16 {
        ((self.b as u16) << 8) | self.c as u16
    }

    pub fn set_bc(&mut self, value: u16) {
        self.b = (value >> 8) as u8;
        self.c = value as u8;
    }

    pub fn get_de(&self) -> u16 {
        ((self.d as u16) << 8) | self.e as u16
    }

    pub fn set_de(&mut self, value: u16) {
        self.d = (value >> 8) as u8;
        self.e = value as u8;
    }

    pub fn get_hl(&self) -> u16 {
        ((self.h as u16) << 8) | self.l as u16
    }

    pub fn set_hl(&mut self, value: u16) {
        self.h = (value >> 8) as u8;
        self.l = value as u8;
    }

    /// Register pair selected by bits 5:4 of an opcode, SP variant.
    fn get_rp(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.get_bc(),
            1 => self.get_de(),
            2 => self.get_hl(),
            3 => self.sp,
            _ => unreachable!(),
        }
    }

    fn set_rp(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.set_bc(value),
            1 => self.set_de(value),
            2 => self.set_hl(value),
            3 => self.sp = value,
            _ => unreachable!(),
        }
    }

    /// Register pair selected by bits 5:4 of a PUSH/POP opcode, PSW variant.
    fn get_rp_psw(&self, index: u8) -> u16 {
        match index & 0x03 {
            0 => self.get_bc(),
            1 => self.get_de(),
            2 => self.get_hl(),
            3 => ((self.a as u16) << 8) | self.flags.to_psw() as u16,
            _ => unreachable!(),
        }
    }

    fn set_rp_psw(&mut self, index: u8, value: u16) {
        match index & 0x03 {
            0 => self.set_bc(value),
            1 => self.set_de(value),
            2 => self.set_hl(value),
            3 => {
                self.a = (value >> 8) as u8;
                self.flags.set_from_psw(value as u8);
            }
            _ => unreachable!(),
        }
    }

    /// Register selected by a 3-bit opcode field. Index 6 is the memory
    /// pseudo-register at (HL).
    fn get_reg8(&self, index: u8) -> u8 {
        match index & 0x07 {
            0 => self.b,
            1 => self.c,
            2 => self.d,
            3 => self.e,
            4 => self.h,
            5 => self.l,
            6 => self.read_byte(self.get_hl()),
            7 => self.a,
            _ => unreachable!(),
        }
    }

    fn set_reg8(&mut self, index: u8, value: u8) {
        match index & 0x07 {
            0 => self.b = value,
            1 => self.c = value,
            2 => self.d = value,
            3 => self.e = value,
            4 => self.h = value,
            5 => self.l = value,
            6 => self.write_byte(self.get_hl(), value),
            7 => self.a = value,
            _ => unreachable!(),
        }
    }

    pub(crate) fn push16(&mut self, value: u16) {
        self.sp = self.sp.wrapping_sub(1);
        self.write_byte(self.sp, (value >> 8) as u8);
        self.sp = self.sp.wrapping_sub(1);
        self.write_byte(self.sp, value as u8);
    }

    pub(crate) fn pop16(&mut self) -> u16 {
        let value = self.read_word(self.sp);
        self.sp = self.sp.wrapping_add(2);
        value
    }

    /// Advance `pc` past an instruction of `len` bytes and report its cost.
    fn advance(&mut self, len: u16, cycles: u32) -> u32 {
        self.pc = self.pc.wrapping_add(len);
        cycles
    }

    /// Execute exactly one instruction and return its cycle cost.
    ///
    /// While halted, no fetch happens; the step burns a few idle cycles so
    /// a pacing loop keeps consuming its budget until an interrupt or reset
    /// resumes execution.
    pub fn step<P: IoPorts + ?Sized>(&mut self, ports: &mut P) -> u32 {
        if self.halted {
            self.cycle += HALT_IDLE_CYCLES as u64;
            return HALT_IDLE_CYCLES;
        }
        let opcode = self.read_byte(self.pc);
        let cycles = self.execute_instruction(opcode, ports);
        self.cycle += cycles as u64;
        cycles
    }

    /// Accept a hardware interrupt on RST vector `vector` (0..=7): push the
    /// resume address, disable further interrupts, leave any halt and jump
    /// to the vector's service routine.
    pub fn interrupt(&mut self, vector: u8) {
        self.push16(self.pc);
        self.interrupts_enabled = false;
        self.halted = false;
        self.pc = (vector as u16 & 0x07) * 8;
        self.cycle += 11;
    }

    /// Snapshot the register file and latches (memory excluded).
    pub fn snapshot(&self) -> I8080State {
        I8080State {
            a: self.a,
            b: self.b,
            c: self.c,
            d: self.d,
            e: self.e,
            h: self.h,
            l: self.l,
            sp: self.sp,
            pc: self.pc,
            flags: self.flags,
            interrupts_enabled: self.interrupts_enabled,
            halted: self.halted,
            cycle: self.cycle,
        }
    }

    /// Decode and execute one instruction. Specific opcodes are matched
    /// first; the bit-field families (MOV, ALU, conditionals, ...) follow
    /// as masked guards. The table is closed over all 256 opcodes, with
    /// the undocumented gaps executing as NOP.
    fn execute_instruction<P: IoPorts + ?Sized>(&mut self, opcode: u8, ports: &mut P) -> u32 {
        match opcode {
            // NOP, documented (0x00) and the undocumented gaps
            0x00 | 0x08 | 0x10 | 0x18 | 0x20 | 0x28 | 0x30 | 0x38 | 0xCB | 0xD9 | 0xDD
            | 0xED | 0xFD => self.advance(1, 4),

            // HLT latches the halted state; pc moves past the instruction so
            // an interrupt return resumes after it
            0x76 => {
                self.halted = true;
                self.advance(1, 7)
            }

            0x07 => self.op_rlc(),
            0x0F => self.op_rrc(),
            0x17 => self.op_ral(),
            0x1F => self.op_rar(),

            0x22 => self.op_shld(),
            0x2A => self.op_lhld(),
            0x32 => self.op_sta(),
            0x3A => self.op_lda(),

            0x27 => self.op_daa(),
            0x2F => self.op_cma(),
            0x37 => self.op_stc(),
            0x3F => self.op_cmc(),

            0xC3 => self.op_jmp(),
            0xC9 => self.op_ret(),
            0xCD => self.op_call(),
            0xE9 => self.op_pchl(),

            0xE3 => self.op_xthl(),
            0xEB => self.op_xchg(),
            0xF9 => self.op_sphl(),

            0xD3 => self.op_out(ports),
            0xDB => self.op_in(ports),

            0xF3 => {
                self.interrupts_enabled = false;
                self.advance(1, 4)
            }
            0xFB => {
                self.interrupts_enabled = true;
                self.advance(1, 4)
            }

            op if (op & 0xCF) == 0x01 => self.op_lxi(op),
            op if (op & 0xEF) == 0x02 => self.op_stax(op),
            op if (op & 0xEF) == 0x0A => self.op_ldax(op),
            op if (op & 0xCF) == 0x03 => self.op_inx(op),
            op if (op & 0xCF) == 0x0B => self.op_dcx(op),
            op if (op & 0xCF) == 0x09 => self.op_dad(op),
            op if (op & 0xC7) == 0x04 => self.op_inr(op),
            op if (op & 0xC7) == 0x05 => self.op_dcr(op),
            op if (op & 0xC7) == 0x06 => self.op_mvi(op),
            op if (op & 0xC0) == 0x40 => self.op_mov(op),
            op if (op & 0xC0) == 0x80 => self.op_alu_reg(op),
            op if (op & 0xC7) == 0xC0 => self.op_ret_cond(op),
            op if (op & 0xCF) == 0xC1 => self.op_pop(op),
            op if (op & 0xC7) == 0xC2 => self.op_jmp_cond(op),
            op if (op & 0xC7) == 0xC4 => self.op_call_cond(op),
            op if (op & 0xCF) == 0xC5 => self.op_push(op),
            op if (op & 0xC7) == 0xC6 => self.op_alu_imm(op),
            op if (op & 0xC7) == 0xC7 => self.op_rst(op),

            _ => unreachable!("opcode {opcode:#04x} fell through a closed decode table"),
        }
    }
}
