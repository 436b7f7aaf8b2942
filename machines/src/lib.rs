pub mod diagnostics;
pub mod invaders;
pub mod registry;
pub mod rom_loader;

pub use diagnostics::DiagnosticsSystem;
pub use invaders::InvadersSystem;
