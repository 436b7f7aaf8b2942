#![allow(dead_code)]

use cathode_core::core::{IoPorts, NullPorts};
use cathode_core::cpu::I8080;

/// Port map for testing: scripted reads, recorded writes.
pub struct RecordingPorts {
    pub inputs: [u8; 256],
    pub writes: Vec<(u8, u8)>,
}

impl RecordingPorts {
    pub fn new() -> Self {
        Self {
            inputs: [0; 256],
            writes: Vec::new(),
        }
    }
}

impl IoPorts for RecordingPorts {
    fn read_port(&mut self, port: u8) -> u8 {
        self.inputs[port as usize]
    }

    fn write_port(&mut self, port: u8, value: u8) {
        self.writes.push((port, value));
    }
}

/// CPU with `program` loaded at address 0.
pub fn cpu_with(program: &[u8]) -> I8080 {
    let mut cpu = I8080::new();
    cpu.load(0, program);
    cpu
}

/// Execute one instruction with no ports attached, returning its cycles.
pub fn step(cpu: &mut I8080) -> u32 {
    cpu.step(&mut NullPorts)
}

pub fn step_n(cpu: &mut I8080, n: usize) {
    for _ in 0..n {
        step(cpu);
    }
}
