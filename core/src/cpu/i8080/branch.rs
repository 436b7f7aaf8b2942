//! Jump, call, return and restart instructions.

use crate::cpu::i8080::I8080;

impl I8080 {
    /// Conditional opcodes select a flag with bits 5:4 (zero, carry,
    /// parity, sign) and compare it against direction bit 3: the condition
    /// holds when the flag equals the bit.
    fn condition_met(&self, opcode: u8) -> bool {
        let flag = match (opcode >> 4) & 0x03 {
            0 => self.flags.zero,
            1 => self.flags.carry,
            2 => self.flags.parity,
            3 => self.flags.sign,
            _ => unreachable!(),
        };
        flag == (opcode & 0x08 != 0)
    }

    /// JMP.
    pub(crate) fn op_jmp(&mut self) -> u32 {
        self.pc = self.imm16();
        10
    }

    /// JNZ/JZ/JNC/JC/JPO/JPE/JP/JM. Same cost taken or not.
    pub(crate) fn op_jmp_cond(&mut self, opcode: u8) -> u32 {
        if self.condition_met(opcode) {
            self.pc = self.imm16();
            10
        } else {
            self.advance(3, 10)
        }
    }

    /// CALL: push the address of the next instruction, then jump.
    pub(crate) fn op_call(&mut self) -> u32 {
        let target = self.imm16();
        self.push16(self.pc.wrapping_add(3));
        self.pc = target;
        17
    }

    /// CNZ/CZ/CNC/CC/CPO/CPE/CP/CM.
    pub(crate) fn op_call_cond(&mut self, opcode: u8) -> u32 {
        if self.condition_met(opcode) {
            self.op_call()
        } else {
            self.advance(3, 11)
        }
    }

    /// RET.
    pub(crate) fn op_ret(&mut self) -> u32 {
        self.pc = self.pop16();
        10
    }

    /// RNZ/RZ/RNC/RC/RPO/RPE/RP/RM.
    pub(crate) fn op_ret_cond(&mut self, opcode: u8) -> u32 {
        if self.condition_met(opcode) {
            self.pc = self.pop16();
            11
        } else {
            self.advance(1, 5)
        }
    }

    /// RST n: push the address of the next instruction and jump to n * 8.
    pub(crate) fn op_rst(&mut self, opcode: u8) -> u32 {
        self.push16(self.pc.wrapping_add(1));
        self.pc = ((opcode >> 3) & 0x07) as u16 * 8;
        11
    }

    /// PCHL.
    pub(crate) fn op_pchl(&mut self) -> u32 {
        self.pc = self.get_hl();
        5
    }
}
