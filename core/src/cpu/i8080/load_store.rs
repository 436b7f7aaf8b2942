//! Data movement instructions, including port I/O.

use crate::core::ports::IoPorts;
use crate::cpu::i8080::I8080;

impl I8080 {
    /// MOV dst,src. Either operand may be the (HL) pseudo-register.
    pub(crate) fn op_mov(&mut self, opcode: u8) -> u32 {
        let dst = (opcode >> 3) & 0x07;
        let src = opcode & 0x07;
        let value = self.get_reg8(src);
        self.set_reg8(dst, value);
        self.advance(1, if src == 6 || dst == 6 { 7 } else { 5 })
    }

    /// MVI reg,imm.
    pub(crate) fn op_mvi(&mut self, opcode: u8) -> u32 {
        let reg = (opcode >> 3) & 0x07;
        let value = self.imm8();
        self.set_reg8(reg, value);
        self.advance(2, if reg == 6 { 10 } else { 7 })
    }

    /// LXI pair,imm16.
    pub(crate) fn op_lxi(&mut self, opcode: u8) -> u32 {
        let value = self.imm16();
        self.set_rp((opcode >> 4) & 0x03, value);
        self.advance(3, 10)
    }

    /// STAX B / STAX D.
    pub(crate) fn op_stax(&mut self, opcode: u8) -> u32 {
        let addr = self.get_rp((opcode >> 4) & 0x01);
        self.write_byte(addr, self.a);
        self.advance(1, 7)
    }

    /// LDAX B / LDAX D.
    pub(crate) fn op_ldax(&mut self, opcode: u8) -> u32 {
        let addr = self.get_rp((opcode >> 4) & 0x01);
        self.a = self.read_byte(addr);
        self.advance(1, 7)
    }

    /// STA addr.
    pub(crate) fn op_sta(&mut self) -> u32 {
        let addr = self.imm16();
        self.write_byte(addr, self.a);
        self.advance(3, 13)
    }

    /// LDA addr.
    pub(crate) fn op_lda(&mut self) -> u32 {
        let addr = self.imm16();
        self.a = self.read_byte(addr);
        self.advance(3, 13)
    }

    /// SHLD addr: L to addr, H to addr+1.
    pub(crate) fn op_shld(&mut self) -> u32 {
        let addr = self.imm16();
        let hl = self.get_hl();
        self.write_word(addr, hl);
        self.advance(3, 16)
    }

    /// LHLD addr.
    pub(crate) fn op_lhld(&mut self) -> u32 {
        let addr = self.imm16();
        let value = self.read_word(addr);
        self.set_hl(value);
        self.advance(3, 16)
    }

    /// XCHG: swap DE and HL.
    pub(crate) fn op_xchg(&mut self) -> u32 {
        std::mem::swap(&mut self.d, &mut self.h);
        std::mem::swap(&mut self.e, &mut self.l);
        self.advance(1, 4)
    }

    /// IN port.
    pub(crate) fn op_in<P: IoPorts + ?Sized>(&mut self, ports: &mut P) -> u32 {
        let port = self.imm8();
        self.a = ports.read_port(port);
        self.advance(2, 10)
    }

    /// OUT port.
    pub(crate) fn op_out<P: IoPorts + ?Sized>(&mut self, ports: &mut P) -> u32 {
        let port = self.imm8();
        ports.write_port(port, self.a);
        self.advance(2, 10)
    }
}
