mod common;
use common::{cpu_with, step};

// --- PUSH / POP ---

#[test]
fn test_push_layout() {
    let mut cpu = cpu_with(&[0xC5]); // PUSH B
    cpu.set_bc(0x1234);
    cpu.sp = 0x4000;

    let cycles = step(&mut cpu);
    assert_eq!(cycles, 11);
    assert_eq!(cpu.sp, 0x3FFE);
    assert_eq!(cpu.read_byte(0x3FFE), 0x34, "low byte at the lower address");
    assert_eq!(cpu.read_byte(0x3FFF), 0x12);
}

#[test]
fn test_pop() {
    let mut cpu = cpu_with(&[0xD1]); // POP D
    cpu.sp = 0x3FFE;
    cpu.write_word(0x3FFE, 0xBEEF);

    let cycles = step(&mut cpu);
    assert_eq!(cycles, 10);
    assert_eq!(cpu.get_de(), 0xBEEF);
    assert_eq!(cpu.sp, 0x4000);
}

#[test]
fn test_push_pop_round_trip() {
    let mut cpu = cpu_with(&[0xE5, 0xC1]); // PUSH H; POP B
    cpu.set_hl(0xCAFE);
    cpu.sp = 0x2400;

    step(&mut cpu);
    step(&mut cpu);
    assert_eq!(cpu.get_bc(), 0xCAFE);
    assert_eq!(cpu.sp, 0x2400);
}

#[test]
fn test_stack_wraps_at_zero() {
    let mut cpu = cpu_with(&[0xC5]); // PUSH B
    cpu.set_bc(0x1234);
    cpu.sp = 0x0001;

    step(&mut cpu);
    assert_eq!(cpu.sp, 0xFFFF);
    assert_eq!(cpu.read_byte(0x0000), 0x12);
    assert_eq!(cpu.read_byte(0xFFFF), 0x34);
}

// --- PSW image ---

#[test]
fn test_push_psw_bit_pattern() {
    let mut cpu = cpu_with(&[0xF5]); // PUSH PSW
    cpu.a = 0x5A;
    cpu.flags.sign = true;
    cpu.flags.zero = true;
    cpu.flags.parity = true;
    cpu.flags.carry = true;
    cpu.sp = 0x4000;

    step(&mut cpu);
    assert_eq!(cpu.read_byte(0x3FFF), 0x5A, "A in the high byte");
    // S Z 0 ? 0 P 1 C with all four flags set
    assert_eq!(cpu.read_byte(0x3FFE), 0b1100_0111);
}

#[test]
fn test_push_psw_fixed_bits() {
    let mut cpu = cpu_with(&[0xF5]); // PUSH PSW
    cpu.sp = 0x4000;

    step(&mut cpu);
    let image = cpu.read_byte(0x3FFE);
    assert_eq!(image & 0x02, 0x02, "bit 1 always reads 1");
    assert_eq!(image & 0x20, 0x00, "bit 5 always reads 0");
    assert_eq!(image & 0x08, 0x00, "bit 3 always reads 0");
}

#[test]
fn test_pop_psw_restores_flags() {
    let mut cpu = cpu_with(&[0xF1]); // POP PSW
    cpu.sp = 0x3FFE;
    cpu.write_byte(0x3FFE, 0b1100_0101); // S, Z, P, C
    cpu.write_byte(0x3FFF, 0x42);

    step(&mut cpu);
    assert_eq!(cpu.a, 0x42);
    assert!(cpu.flags.sign);
    assert!(cpu.flags.zero);
    assert!(cpu.flags.parity);
    assert!(cpu.flags.carry);
}

#[test]
fn test_push_pop_psw_round_trip() {
    let mut cpu = cpu_with(&[0xF5, 0xAF, 0xF1]); // PUSH PSW; XRA A; POP PSW
    cpu.a = 0x80;
    cpu.flags.sign = true;
    cpu.flags.carry = true;
    cpu.sp = 0x2400;

    step(&mut cpu);
    step(&mut cpu); // clobber A and flags
    step(&mut cpu);
    assert_eq!(cpu.a, 0x80);
    assert!(cpu.flags.sign);
    assert!(cpu.flags.carry);
    assert!(!cpu.flags.zero);
}

// --- XTHL / SPHL ---

#[test]
fn test_xthl() {
    let mut cpu = cpu_with(&[0xE3]);
    cpu.set_hl(0x1234);
    cpu.sp = 0x3FFE;
    cpu.write_word(0x3FFE, 0xABCD);

    let cycles = step(&mut cpu);
    assert_eq!(cycles, 18);
    assert_eq!(cpu.get_hl(), 0xABCD);
    assert_eq!(cpu.read_word(0x3FFE), 0x1234);
    assert_eq!(cpu.sp, 0x3FFE, "SP does not move");
}

#[test]
fn test_sphl() {
    let mut cpu = cpu_with(&[0xF9]);
    cpu.set_hl(0x2400);

    let cycles = step(&mut cpu);
    assert_eq!(cycles, 5);
    assert_eq!(cpu.sp, 0x2400);
}
