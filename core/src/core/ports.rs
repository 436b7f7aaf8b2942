/// I/O port capability injected by the hosting machine.
///
/// The CPU invokes this only for IN/OUT opcodes and is otherwise agnostic
/// to machine identity. Ports are the 8080's separate 256-entry I/O address
/// space, not memory.
pub trait IoPorts {
    /// IN: read the byte presented on `port`.
    fn read_port(&mut self, port: u8) -> u8;

    /// OUT: latch `value` onto `port`.
    fn write_port(&mut self, port: u8, value: u8);
}

/// Port space with nothing wired up: reads float to 0, writes are dropped.
/// Used by machines without I/O hardware (diagnostics) and by tests.
#[derive(Default)]
pub struct NullPorts;

impl IoPorts for NullPorts {
    fn read_port(&mut self, _port: u8) -> u8 {
        0
    }

    fn write_port(&mut self, _port: u8, _value: u8) {}
}
