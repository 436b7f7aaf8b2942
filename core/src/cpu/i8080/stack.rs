//! Stack instructions.

use crate::cpu::i8080::I8080;

impl I8080 {
    /// PUSH B/D/H/PSW.
    pub(crate) fn op_push(&mut self, opcode: u8) -> u32 {
        let value = self.get_rp_psw((opcode >> 4) & 0x03);
        self.push16(value);
        self.advance(1, 11)
    }

    /// POP B/D/H/PSW.
    pub(crate) fn op_pop(&mut self, opcode: u8) -> u32 {
        let value = self.pop16();
        self.set_rp_psw((opcode >> 4) & 0x03, value);
        self.advance(1, 10)
    }

    /// XTHL: exchange HL with the word at the top of the stack.
    pub(crate) fn op_xthl(&mut self) -> u32 {
        let hl = self.get_hl();
        let stacked = self.read_word(self.sp);
        self.set_hl(stacked);
        self.write_word(self.sp, hl);
        self.advance(1, 18)
    }

    /// SPHL.
    pub(crate) fn op_sphl(&mut self) -> u32 {
        self.sp = self.get_hl();
        self.advance(1, 5)
    }
}
