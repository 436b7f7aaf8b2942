pub mod state;
pub use state::I8080State;

pub mod i8080;
pub use i8080::{Flags, I8080};
