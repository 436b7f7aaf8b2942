//! Machine registry for automatic host discovery.
//!
//! Each hostable machine self-registers via [`inventory::submit!`] with a
//! [`MachineEntry`] carrying its selection name, ROM set name, and a
//! factory function. A hosting front end enumerates available machines at
//! runtime without a central list.

use cathode_core::core::machine::Machine;

use crate::rom_loader::{RomLoadError, RomSet};

/// Describes a hostable emulated machine.
pub struct MachineEntry {
    /// Name used to select this machine (e.g., "invaders").
    pub name: &'static str,
    /// ROM set name for directory/archive lookup.
    pub rom_name: &'static str,
    /// Factory: construct a Machine from a loaded ROM set.
    pub create: fn(&RomSet) -> Result<Box<dyn Machine>, RomLoadError>,
}

impl MachineEntry {
    pub const fn new(
        name: &'static str,
        rom_name: &'static str,
        create: fn(&RomSet) -> Result<Box<dyn Machine>, RomLoadError>,
    ) -> Self {
        Self {
            name,
            rom_name,
            create,
        }
    }
}

inventory::collect!(MachineEntry);

/// All registered machines, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a machine by its selection name.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}
