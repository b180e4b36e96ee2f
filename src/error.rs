//! Small `Copy` error enums
//!
//! No `thiserror`/`anyhow` - just plain enums callers can match on.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartridgeErrorKind {
    RomSize,
    RamSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GbError {
    InvalidCartridge(CartridgeErrorKind),
    CartridgeNotBootable,
}
