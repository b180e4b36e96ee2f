//! SM83 CPU tests
//!
//! - instructions.rs: individual instruction and instruction-family behavior
//! - modes.rs: HALT/STOP and interrupt dispatch behavior
//!
//! Test programs are written into HRAM (the only RAM with no timing side
//! effects) and `pc` is pointed at the start of it, since `Cartridge` has no
//! write path for ROM.

use super::*;
use crate::cartridge::Cartridge;
use crate::mmu::Mmu;


const PROGRAM_START: u16 = 0xFF80;

fn setup(program: &[u8]) -> (Cpu, Mmu) {
    let mut cpu = Cpu::new();
    let mut mmu = Mmu::new();
    for (offset, &byte) in program.iter().enumerate() {
        mmu.store(PROGRAM_START + offset as u16, byte);
    }
    cpu.state = post_boot_state();
    cpu.state.pc = PROGRAM_START;
    (cpu, mmu)
}

/// Like `setup`, but also installs a cartridge so ROM-space addresses -
/// notably the interrupt vectors at 0x0040-0x0060 - hold real opcodes
/// instead of reading back as 0xFF.
fn setup_with_rom_patches(program: &[u8], rom_patches: &[(u16, u8)]) -> (Cpu, Mmu) {
    let mut rom = crate::cartridge::tests::make_valid_rom();
    for &(address, byte) in rom_patches {
        rom[address as usize] = byte;
    }
    let cartridge = Cartridge::new(rom).expect("test rom must parse");

    let (cpu, mut mmu) = setup(program);
    mmu.load_cartridge(cartridge);
    (cpu, mmu)
}

fn run_one(cpu: &mut Cpu, mmu: &mut Mmu) {
    let before = mmu.clock.now();
    // Any cycle budget > 0 runs exactly one instruction, since the loop
    // condition is checked again only after the fetched opcode fully executes.
    cpu.step_t_cycles(mmu, 1);
    assert!(mmu.clock.now() > before, "instruction did not advance the clock");
}
