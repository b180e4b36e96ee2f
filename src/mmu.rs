//! Memory-mapped I/O address decoding
//!
//! The MMU owns everything a `load`/`store` might touch: the clock, the
//! cartridge, work/video RAM, OAM/HRAM/IE, and the lazy-catchup peripherals
//! (timer, interrupt scheduler, PPU, serial). `Mmu`, its peripherals and the
//! clock would naturally form a reference cycle if each held a pointer back
//! to its owner; flat ownership avoids that entirely - every peripheral
//! method that needs a peer takes it as a borrowed parameter instead of
//! holding a reference to it.
//!
//! Address map:
//! ```text
//! 0x0000-0x7FFF  cartridge ROM
//! 0x8000-0x9FFF  VRAM (one bank selected; bank switching not implemented)
//! 0xA000-0xBFFF  cartridge ERAM
//! 0xC000-0xCFFF  WRAM bank 0 (fixed)
//! 0xD000-0xDFFF  WRAM switchable bank (bank 1 at reset)
//! 0xE000-0xFDFF  echo of 0xC000-0xDDFF
//! 0xFE00-0xFE9F  OAM
//! 0xFEA0-0xFEFF  prohibited - reads return a nibble-replicated address byte
//! 0xFF00-0xFF7F  I/O registers
//! 0xFF80-0xFFFE  HRAM
//! 0xFFFF         IE
//! ```

use crate::cartridge::Cartridge;
use crate::clock::Clock;
use crate::interrupt::InterruptScheduler;
use crate::ppu::Ppu;
use crate::serial::Serial;
use crate::timer::Timer;

pub struct Mmu {
    pub clock: Clock,
    cartridge: Option<Cartridge>,

    vram: [u8; 0x4000],
    vram_bank: usize,

    wram: [u8; 0x8000],
    wram_bank_offset: usize,

    oam: [u8; 0xA0],
    hram: [u8; 0x7F],
    ie: u8,

    pub timer: Timer,
    pub interrupt: InterruptScheduler,
    pub ppu: Ppu,
    pub serial: Serial,
}

impl Mmu {
    pub fn new() -> Self {
        let mut mmu = Self {
            clock: Clock::new(),
            cartridge: None,
            vram: [0; 0x4000],
            vram_bank: 0,
            wram: [0; 0x8000],
            wram_bank_offset: 0x1000,
            oam: [0; 0xA0],
            hram: [0; 0x7F],
            ie: 0,
            timer: Timer::new(),
            interrupt: InterruptScheduler::new(),
            ppu: Ppu::new(),
            serial: Serial::new(),
        };
        mmu.reset();
        mmu
    }

    pub fn reset(&mut self) {
        self.clock.reset();
        self.vram = [0; 0x4000];
        self.vram_bank = 0;
        self.wram = [0; 0x8000];
        self.wram_bank_offset = 0x1000;
        self.oam = [0; 0xA0];
        self.hram = [0; 0x7F];
        self.ie = 0;
        self.timer.reset();
        self.interrupt.reset();
        self.ppu.reset();
        self.serial.reset();
    }

    pub fn load_cartridge(&mut self, cartridge: Cartridge) {
        self.cartridge = Some(cartridge);
    }

    pub fn has_cartridge(&self) -> bool {
        self.cartridge.is_some()
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    pub fn load(&mut self, address: u16) -> u8 {
        match address {
            0x0000..=0x7FFF => self
                .cartridge
                .as_ref()
                .map_or(0xFF, |c| c.load_from_rom(address)),
            0x8000..=0x9FFF => self.vram[self.vram_bank * 0x2000 + (address - 0x8000) as usize],
            0xA000..=0xBFFF => self
                .cartridge
                .as_ref()
                .map_or(0xFF, |c| c.load_from_extern_ram(address - 0xA000)),
            0xC000..=0xCFFF => self.wram[(address - 0xC000) as usize],
            0xD000..=0xDFFF => self.wram[self.wram_bank_offset + (address - 0xD000) as usize],
            0xE000..=0xFDFF => self.wram[(address - 0xE000) as usize],
            0xFE00..=0xFE9F => self.oam[(address - 0xFE00) as usize],
            0xFEA0..=0xFEFF => (((address >> 4) & 0xF) * 0x11) as u8,
            0xFF80..=0xFFFE => self.hram[(address - 0xFF80) as usize],
            0xFFFF => self.ie,
            _ => self.load_io(address),
        }
    }

    pub fn store(&mut self, address: u16, value: u8) {
        match address {
            0x0000..=0x7FFF => {
                if let Some(c) = self.cartridge.as_mut() {
                    c.store_in_rom(address, value);
                }
            }
            0x8000..=0x9FFF => {
                self.vram[self.vram_bank * 0x2000 + (address - 0x8000) as usize] = value
            }
            0xA000..=0xBFFF => {
                if let Some(c) = self.cartridge.as_mut() {
                    c.store_in_extern_ram(address - 0xA000, value);
                }
            }
            0xC000..=0xCFFF => self.wram[(address - 0xC000) as usize] = value,
            0xD000..=0xDFFF => self.wram[self.wram_bank_offset + (address - 0xD000) as usize] = value,
            0xE000..=0xFDFF => self.wram[(address - 0xE000) as usize] = value,
            0xFE00..=0xFE9F => self.oam[(address - 0xFE00) as usize] = value,
            0xFEA0..=0xFEFF => {}
            0xFF80..=0xFFFE => self.hram[(address - 0xFF80) as usize] = value,
            0xFFFF => self.ie = value,
            _ => self.store_io(address, value),
        }
    }

    fn load_io(&mut self, address: u16) -> u8 {
        let clock = self.clock;
        match address & 0xFF {
            0x01 => self.serial.get_sb(),
            0x02 => self.serial.get_sc(),
            0x04 => self.timer.get_div(&clock),
            0x05 => self.timer.get_tima(&clock),
            0x06 => self.timer.get_tma(),
            0x07 => self.timer.get_tac(),
            0x0F => self.interrupt.get_if(&clock, &mut self.timer),
            0x40 => self.ppu.get_lcdc(),
            0x41 => self.ppu.get_stat(&clock),
            0x42 => self.ppu.get_scy(),
            0x43 => self.ppu.get_scx(),
            0x44 => self.ppu.get_ly(&clock),
            0x45 => self.ppu.get_lyc(),
            0x47 => self.ppu.get_bgp(),
            0x48 => self.ppu.get_obp0(),
            0x49 => self.ppu.get_obp1(),
            0x4A => self.ppu.get_wy(),
            0x4B => self.ppu.get_wx(),
            _ => 0xFF,
        }
    }

    fn store_io(&mut self, address: u16, value: u8) {
        let clock = self.clock;
        match address & 0xFF {
            0x01 => self.serial.set_sb(value),
            0x02 => self.serial.set_sc(value),
            0x04 => self.timer.set_div(&clock, &mut self.interrupt),
            0x05 => self.timer.set_tima(value, &clock, &mut self.interrupt),
            0x06 => self.timer.set_tma(value, &clock, &mut self.interrupt),
            0x07 => self.timer.set_tac(value, &clock, &mut self.interrupt),
            0x0F => self.interrupt.set_if(value, &clock, &mut self.timer),
            0x40 => self.ppu.set_lcdc(value, &clock),
            0x41 => self.ppu.set_stat(value, &clock),
            0x42 => self.ppu.set_scy(value, &clock),
            0x43 => self.ppu.set_scx(value, &clock),
            0x44 => self.ppu.set_ly(value, &clock),
            0x45 => self.ppu.set_lyc(value, &clock),
            0x47 => self.ppu.set_bgp(value),
            0x48 => self.ppu.set_obp0(value),
            0x49 => self.ppu.set_obp1(value),
            0x4A => self.ppu.set_wy(value),
            0x4B => self.ppu.set_wx(value),
            _ => {}
        }
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_region_reads_through_to_wram() {
        let mut mmu = Mmu::new();
        mmu.store(0xC010, 0x42);
        assert_eq!(mmu.load(0xE010), 0x42);
    }

    #[test]
    fn prohibited_region_replicates_nibble() {
        let mmu_load = Mmu::new().load(0xFEA5);
        assert_eq!(mmu_load, 0xAA);
    }

    #[test]
    fn wram_bank_starts_at_second_bank() {
        let mut mmu = Mmu::new();
        mmu.store(0xD000, 0x7);
        // Bank 0 at C000 should be unaffected.
        assert_eq!(mmu.load(0xC000), 0x00);
        assert_eq!(mmu.load(0xD000), 0x07);
    }

    #[test]
    fn ie_register_is_directly_addressable() {
        let mut mmu = Mmu::new();
        mmu.store(0xFFFF, 0x1F);
        assert_eq!(mmu.load(0xFFFF), 0x1F);
    }

    #[test]
    fn unmapped_rom_reads_high() {
        let mut mmu = Mmu::new();
        assert_eq!(mmu.load(0x0000), 0xFF);
    }
}
