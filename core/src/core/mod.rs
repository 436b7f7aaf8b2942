pub mod machine;
pub mod ports;
pub mod scheduler;

pub use machine::{InputButton, Machine};
pub use ports::{IoPorts, NullPorts};
pub use scheduler::Scheduler;
