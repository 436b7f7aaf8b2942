//! Arithmetic, logic, rotate and BCD instructions.

use crate::cpu::i8080::I8080;

impl I8080 {
    fn parity(value: u8) -> bool {
        value.count_ones() % 2 == 0
    }

    /// Set zero, sign and parity from an 8-bit result. Carry and aux carry
    /// are owned by the individual operations.
    pub(crate) fn set_result_flags(&mut self, result: u8) {
        self.flags.zero = result == 0;
        self.flags.sign = result & 0x80 != 0;
        self.flags.parity = Self::parity(result);
    }

    /// The single 9-bit addition path all arithmetic runs through:
    /// A + operand + carry-in. Sets all five flags; aux carry is the
    /// carry out of bit 3.
    fn alu_add(&mut self, operand: u8, carry_in: bool) -> u8 {
        let sum = self.a as u16 + operand as u16 + carry_in as u16;
        let result = sum as u8;
        self.set_result_flags(result);
        self.flags.carry = sum > 0xFF;
        self.flags.aux_carry = (self.a ^ operand ^ result) & 0x10 != 0;
        result
    }

    /// Subtraction via the addition path: add the complemented operand
    /// with an inverted carry-in, then invert the carry-out so the carry
    /// flag reads as a borrow.
    fn alu_sub(&mut self, operand: u8, borrow_in: bool) -> u8 {
        let result = self.alu_add(!operand, !borrow_in);
        self.flags.carry = !self.flags.carry;
        result
    }

    /// One of the eight accumulator operations selected by opcode bits 5:3.
    fn accumulator_op(&mut self, selector: u8, operand: u8) {
        match selector & 0x07 {
            0 => self.a = self.alu_add(operand, false), // ADD
            1 => {
                let carry = self.flags.carry;
                self.a = self.alu_add(operand, carry); // ADC
            }
            2 => self.a = self.alu_sub(operand, false), // SUB
            3 => {
                let borrow = self.flags.carry;
                self.a = self.alu_sub(operand, borrow); // SBB
            }
            4 => self.logic_result(self.a & operand), // ANA
            5 => self.logic_result(self.a ^ operand), // XRA
            6 => self.logic_result(self.a | operand), // ORA
            7 => {
                self.alu_sub(operand, false); // CMP keeps A, only flags
            }
            _ => unreachable!(),
        }
    }

    /// Logic operations clear carry and leave aux carry untouched.
    fn logic_result(&mut self, result: u8) {
        self.set_result_flags(result);
        self.flags.carry = false;
        self.a = result;
    }

    /// ADD/ADC/SUB/SBB/ANA/XRA/ORA/CMP with a register operand.
    pub(crate) fn op_alu_reg(&mut self, opcode: u8) -> u32 {
        let src = opcode & 0x07;
        let operand = self.get_reg8(src);
        self.accumulator_op(opcode >> 3, operand);
        self.advance(1, if src == 6 { 7 } else { 4 })
    }

    /// ADI/ACI/SUI/SBI/ANI/XRI/ORI/CPI.
    pub(crate) fn op_alu_imm(&mut self, opcode: u8) -> u32 {
        let operand = self.imm8();
        self.accumulator_op(opcode >> 3, operand);
        self.advance(2, 7)
    }

    /// INR: zero/sign/parity only, carry and aux carry untouched.
    pub(crate) fn op_inr(&mut self, opcode: u8) -> u32 {
        let reg = (opcode >> 3) & 0x07;
        let result = self.get_reg8(reg).wrapping_add(1);
        self.set_result_flags(result);
        self.set_reg8(reg, result);
        self.advance(1, if reg == 6 { 10 } else { 5 })
    }

    /// DCR: zero/sign/parity only, carry and aux carry untouched.
    pub(crate) fn op_dcr(&mut self, opcode: u8) -> u32 {
        let reg = (opcode >> 3) & 0x07;
        let result = self.get_reg8(reg).wrapping_sub(1);
        self.set_result_flags(result);
        self.set_reg8(reg, result);
        self.advance(1, if reg == 6 { 10 } else { 5 })
    }

    /// INX: no flags.
    pub(crate) fn op_inx(&mut self, opcode: u8) -> u32 {
        let pair = (opcode >> 4) & 0x03;
        self.set_rp(pair, self.get_rp(pair).wrapping_add(1));
        self.advance(1, 5)
    }

    /// DCX: no flags.
    pub(crate) fn op_dcx(&mut self, opcode: u8) -> u32 {
        let pair = (opcode >> 4) & 0x03;
        self.set_rp(pair, self.get_rp(pair).wrapping_sub(1));
        self.advance(1, 5)
    }

    /// DAD: HL += pair. Carry only; all other flags untouched.
    pub(crate) fn op_dad(&mut self, opcode: u8) -> u32 {
        let pair = (opcode >> 4) & 0x03;
        let sum = self.get_hl() as u32 + self.get_rp(pair) as u32;
        self.flags.carry = sum > 0xFFFF;
        self.set_hl(sum as u16);
        self.advance(1, 10)
    }

    /// RLC: rotate left, bit 7 into both bit 0 and carry.
    pub(crate) fn op_rlc(&mut self) -> u32 {
        self.flags.carry = self.a & 0x80 != 0;
        self.a = self.a.rotate_left(1);
        self.advance(1, 4)
    }

    /// RRC: rotate right, bit 0 into both bit 7 and carry.
    pub(crate) fn op_rrc(&mut self) -> u32 {
        self.flags.carry = self.a & 0x01 != 0;
        self.a = self.a.rotate_right(1);
        self.advance(1, 4)
    }

    /// RAL: rotate left through carry.
    pub(crate) fn op_ral(&mut self) -> u32 {
        let carry_out = self.a & 0x80 != 0;
        self.a = (self.a << 1) | self.flags.carry as u8;
        self.flags.carry = carry_out;
        self.advance(1, 4)
    }

    /// RAR: rotate right through carry.
    pub(crate) fn op_rar(&mut self) -> u32 {
        let carry_out = self.a & 0x01 != 0;
        self.a = ((self.flags.carry as u8) << 7) | (self.a >> 1);
        self.flags.carry = carry_out;
        self.advance(1, 4)
    }

    /// DAA: adjust A to packed BCD after an addition. Carry only ever
    /// sets here, never clears, so multi-byte BCD sums chain correctly.
    pub(crate) fn op_daa(&mut self) -> u32 {
        let mut a = self.a;
        if a & 0x0F > 9 || self.flags.aux_carry {
            self.flags.aux_carry = (a & 0x0F) + 0x06 > 0x0F;
            a = a.wrapping_add(0x06);
        }
        if a >> 4 > 9 || self.flags.carry {
            let (adjusted, overflow) = a.overflowing_add(0x60);
            if overflow {
                self.flags.carry = true;
            }
            a = adjusted;
        }
        self.set_result_flags(a);
        self.a = a;
        self.advance(1, 4)
    }

    /// CMA: complement A, no flags.
    pub(crate) fn op_cma(&mut self) -> u32 {
        self.a = !self.a;
        self.advance(1, 4)
    }

    /// STC.
    pub(crate) fn op_stc(&mut self) -> u32 {
        self.flags.carry = true;
        self.advance(1, 4)
    }

    /// CMC.
    pub(crate) fn op_cmc(&mut self) -> u32 {
        self.flags.carry = !self.flags.carry;
        self.advance(1, 4)
    }
}
