use cathode_core::core::ports::IoPorts;
use cathode_core::cpu::Flags;
use serde::{Deserialize, Serialize};

// --- TracingPorts: scripted inputs with access recording ---

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PortOp {
    In,
    Out,
}

#[derive(Clone, Debug)]
pub struct PortAccess {
    pub port: u8,
    pub value: u8,
    pub op: PortOp,
}

pub struct TracingPorts {
    pub inputs: [u8; 256],
    pub accesses: Vec<PortAccess>,
}

impl TracingPorts {
    pub fn new() -> Self {
        Self {
            inputs: [0; 256],
            accesses: Vec::new(),
        }
    }
}

impl Default for TracingPorts {
    fn default() -> Self {
        Self::new()
    }
}

impl IoPorts for TracingPorts {
    fn read_port(&mut self, port: u8) -> u8 {
        let value = self.inputs[port as usize];
        self.accesses.push(PortAccess {
            port,
            value,
            op: PortOp::In,
        });
        value
    }

    fn write_port(&mut self, port: u8, value: u8) {
        self.accesses.push(PortAccess {
            port,
            value,
            op: PortOp::Out,
        });
    }
}

// --- flag byte packing for test vectors ---

// Unlike the PSW image, validation vectors carry aux carry (bit 4) so a
// case round-trips the full flag state.

pub fn pack_flags(flags: &Flags) -> u8 {
    let mut byte = 0b0000_0010;
    if flags.sign {
        byte |= 0x80;
    }
    if flags.zero {
        byte |= 0x40;
    }
    if flags.aux_carry {
        byte |= 0x10;
    }
    if flags.parity {
        byte |= 0x04;
    }
    if flags.carry {
        byte |= 0x01;
    }
    byte
}

pub fn unpack_flags(byte: u8) -> Flags {
    Flags {
        sign: byte & 0x80 != 0,
        zero: byte & 0x40 != 0,
        aux_carry: byte & 0x10 != 0,
        parity: byte & 0x04 != 0,
        carry: byte & 0x01 != 0,
    }
}

// --- JSON test vector types ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I8080TestCase {
    pub name: String,
    pub initial: I8080CpuState,
    #[serde(rename = "final")]
    pub final_state: I8080CpuState,
    /// Cycle cost of the single stepped instruction.
    pub cycles: u32,
    /// Port traffic as (port, value, "in"/"out") in order.
    pub ports: Vec<(u8, u8, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct I8080CpuState {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub f: u8,
    pub ie: u8,
    pub halted: u8,
    pub ram: Vec<(u16, u8)>,
}
