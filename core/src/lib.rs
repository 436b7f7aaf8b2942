pub mod core;
pub mod cpu;

pub mod prelude {
    pub use crate::core::machine::{InputButton, Machine};
    pub use crate::core::ports::{IoPorts, NullPorts};
    pub use crate::core::scheduler::Scheduler;
    pub use crate::cpu::i8080::{Flags, I8080};
    pub use crate::cpu::state::I8080State;
}
