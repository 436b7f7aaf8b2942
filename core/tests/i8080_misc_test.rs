use cathode_core::cpu::{Flags, I8080};
mod common;
use common::{cpu_with, step, step_n};

// --- NOP ---

#[test]
fn test_nop() {
    let mut cpu = cpu_with(&[0x00]);

    let cycles = step(&mut cpu);
    assert_eq!(cycles, 4);
    assert_eq!(cpu.pc, 1);
    assert_eq!(cpu.snapshot().flags, Flags::default());
}

#[test]
fn test_undocumented_gaps_execute_as_nop() {
    for &opcode in &[0x08u8, 0x10, 0x18, 0x20, 0x28, 0x30, 0x38, 0xCB, 0xD9, 0xDD, 0xED, 0xFD] {
        let mut cpu = cpu_with(&[opcode]);
        let cycles = step(&mut cpu);
        assert_eq!(cycles, 4, "opcode {opcode:#04x}");
        assert_eq!(cpu.pc, 1, "opcode {opcode:#04x}");
    }
}

#[test]
fn test_every_opcode_decodes() {
    // The decode table is closed: no opcode may panic or stall.
    for opcode in 0u16..=0xFF {
        let mut cpu = cpu_with(&[opcode as u8, 0x00, 0x00]);
        cpu.sp = 0x8000;
        let cycles = step(&mut cpu);
        assert!(cycles >= 4, "opcode {opcode:#04x} returned {cycles} cycles");
    }
}

// --- HLT ---

#[test]
fn test_hlt_latches() {
    let mut cpu = cpu_with(&[0x76, 0x3C]); // HLT; INR A

    let cycles = step(&mut cpu);
    assert_eq!(cycles, 7);
    assert!(cpu.halted);
    assert_eq!(cpu.pc, 1, "pc moves past the HLT");

    // Further steps idle without fetching.
    let cycles = step(&mut cpu);
    assert_eq!(cycles, 4);
    assert_eq!(cpu.pc, 1);
    assert_eq!(cpu.a, 0, "no instruction ran while halted");
}

#[test]
fn test_program_runs_to_halt() {
    // MVI A,5; INR A; HLT
    let mut cpu = cpu_with(&[0x3E, 0x05, 0x3C, 0x76]);

    step_n(&mut cpu, 3);
    assert!(cpu.halted);
    assert_eq!(cpu.a, 0x06);
    assert_eq!(cpu.pc, 4);
}

// --- EI / DI ---

#[test]
fn test_ei_di() {
    let mut cpu = cpu_with(&[0xFB, 0xF3]); // EI; DI
    assert!(!cpu.interrupts_enabled, "interrupts start disabled");

    step(&mut cpu);
    assert!(cpu.interrupts_enabled);
    step(&mut cpu);
    assert!(!cpu.interrupts_enabled);
}

// --- cycle accounting ---

#[test]
fn test_cycle_counter_accumulates() {
    let mut cpu = cpu_with(&[0x00, 0x3E, 0x01, 0xC3, 0x00, 0x00]); // NOP; MVI A,1; JMP 0

    step_n(&mut cpu, 3);
    assert_eq!(cpu.cycle, 4 + 7 + 10);
}

// --- snapshot / reset ---

#[test]
fn test_snapshot_captures_state() {
    let mut cpu = I8080::new();
    cpu.a = 0x11;
    cpu.b = 0x22;
    cpu.sp = 0x2400;
    cpu.pc = 0x0100;
    cpu.flags.carry = true;
    cpu.interrupts_enabled = true;

    let state = cpu.snapshot();
    assert_eq!(state.a, 0x11);
    assert_eq!(state.b, 0x22);
    assert_eq!(state.sp, 0x2400);
    assert_eq!(state.pc, 0x0100);
    assert!(state.flags.carry);
    assert!(state.interrupts_enabled);
    assert!(!state.halted);
}

#[test]
fn test_reset_zeroes_everything() {
    let mut cpu = cpu_with(&[0x76]);
    cpu.a = 0xFF;
    cpu.sp = 0x2400;
    step(&mut cpu);
    assert!(cpu.halted);

    cpu.reset();
    assert_eq!(cpu.pc, 0);
    assert_eq!(cpu.sp, 0);
    assert_eq!(cpu.a, 0);
    assert_eq!(cpu.cycle, 0);
    assert!(!cpu.halted);
    assert!(!cpu.interrupts_enabled);
    assert_eq!(cpu.read_byte(0x0000), 0, "memory cleared");
}

// --- PSW packing ---

#[test]
fn test_flags_psw_round_trip() {
    let flags = Flags {
        zero: true,
        sign: false,
        parity: true,
        carry: true,
        aux_carry: true,
    };
    let image = flags.to_psw();
    assert_eq!(image, 0b0100_0111);

    let mut restored = Flags::default();
    restored.set_from_psw(image);
    assert!(restored.zero);
    assert!(!restored.sign);
    assert!(restored.parity);
    assert!(restored.carry);
    assert!(!restored.aux_carry, "AC has no PSW bit");
}
