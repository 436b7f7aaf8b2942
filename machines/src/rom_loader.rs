//! ROM image loading and validation.
//!
//! Program images come either from a directory of extracted ROM files or
//! from byte slices supplied programmatically (tests, embedded images).
//! A machine describes where its files land in the CPU's address space
//! with a [`RomMap`]; entries may carry CRC-32 checksums that are verified
//! before anything is written into memory.

use std::collections::HashMap;
use std::path::Path;

use cathode_core::cpu::I8080;

/// CRC-32 lookup table, reflected polynomial 0xEDB88320 (the ZIP/PNG
/// variant MAME records in its ROM definitions).
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
};

fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        let index = ((crc ^ byte as u32) & 0xFF) as usize;
        crc = (crc >> 8) ^ CRC32_TABLE[index];
    }
    crc ^ 0xFFFF_FFFF
}

/// Errors surfaced while assembling a machine's program image.
///
/// All of these fire at load time, before the CPU executes anything.
#[derive(Debug)]
pub enum RomLoadError {
    /// Underlying I/O error (file not found, permission denied, ...)
    Io(std::io::Error),

    /// A required ROM file was not present in the set.
    MissingFile(String),

    /// ROM file size does not match the machine's expectation.
    SizeMismatch {
        file: String,
        expected: usize,
        actual: usize,
    },

    /// CRC-32 checksum does not match the expected value.
    ChecksumMismatch {
        file: String,
        expected: u32,
        actual: u32,
    },

    /// A program image would run past its allotted span of memory.
    ImageTooLarge { actual: usize, limit: usize },
}

impl std::fmt::Display for RomLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingFile(name) => write!(f, "missing ROM file: {name}"),
            Self::SizeMismatch {
                file,
                expected,
                actual,
            } => write!(f, "ROM {file}: expected {expected} bytes, got {actual}"),
            Self::ChecksumMismatch {
                file,
                expected,
                actual,
            } => write!(
                f,
                "ROM {file}: CRC32 expected 0x{expected:08X}, got 0x{actual:08X}"
            ),
            Self::ImageTooLarge { actual, limit } => {
                write!(f, "program image of {actual} bytes exceeds the {limit}-byte limit")
            }
        }
    }
}

impl std::error::Error for RomLoadError {}

impl From<std::io::Error> for RomLoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// A collection of ROM files keyed by filename.
pub struct RomSet {
    files: HashMap<String, Vec<u8>>,
}

impl RomSet {
    /// Read every file in `path` (non-recursive), keyed by bare filename.
    pub fn from_directory(path: &Path) -> Result<Self, RomLoadError> {
        let mut files = HashMap::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let file_path = entry.path();
            if file_path.is_file() {
                let name = file_path
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
                    .to_string();
                files.insert(name, std::fs::read(&file_path)?);
            }
        }
        Ok(Self { files })
    }

    /// Build a set from (filename, data) pairs.
    pub fn from_slices(entries: &[(&str, &[u8])]) -> Self {
        let mut files = HashMap::new();
        for (name, data) in entries {
            files.insert(name.to_string(), data.to_vec());
        }
        Self { files }
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(|v| v.as_slice())
    }

    pub fn require(&self, name: &str) -> Result<&[u8], RomLoadError> {
        self.get(name)
            .ok_or_else(|| RomLoadError::MissingFile(name.to_string()))
    }

    /// Fetch a file and validate its exact size.
    pub fn require_sized(&self, name: &str, expected_size: usize) -> Result<&[u8], RomLoadError> {
        let data = self.require(name)?;
        if data.len() != expected_size {
            return Err(RomLoadError::SizeMismatch {
                file: name.to_string(),
                expected: expected_size,
                actual: data.len(),
            });
        }
        Ok(data)
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.keys().map(|s| s.as_str()).collect()
    }
}

/// One ROM file and the address it occupies.
pub struct RomEntry {
    /// Filename in the ROM set.
    pub name: &'static str,
    /// Expected size in bytes.
    pub size: usize,
    /// Load address in the CPU's memory.
    pub base: u16,
    /// Expected CRC-32. `None` skips the check for this file.
    pub crc32: Option<u32>,
}

/// The complete program-image layout for a machine.
pub struct RomMap {
    pub entries: &'static [RomEntry],
}

impl RomMap {
    /// Validate every entry against `rom_set` and copy the files into the
    /// CPU's memory. Nothing is written unless all files check out.
    pub fn load_into(&self, rom_set: &RomSet, cpu: &mut I8080) -> Result<(), RomLoadError> {
        self.load_inner(rom_set, cpu, true)
    }

    /// As [`load_into`](Self::load_into), but without CRC verification.
    /// Sizes are still enforced. For hacked or homebrew images.
    pub fn load_into_unchecked(
        &self,
        rom_set: &RomSet,
        cpu: &mut I8080,
    ) -> Result<(), RomLoadError> {
        self.load_inner(rom_set, cpu, false)
    }

    fn load_inner(
        &self,
        rom_set: &RomSet,
        cpu: &mut I8080,
        verify_checksums: bool,
    ) -> Result<(), RomLoadError> {
        // Validate the whole set first so a bad file never leaves memory
        // partially written.
        for entry in self.entries {
            let data = rom_set.require_sized(entry.name, entry.size)?;
            if verify_checksums && let Some(expected) = entry.crc32 {
                let actual = crc32(data);
                if actual != expected {
                    return Err(RomLoadError::ChecksumMismatch {
                        file: entry.name.to_string(),
                        expected,
                        actual,
                    });
                }
            }
        }
        for entry in self.entries {
            cpu.load(entry.base, rom_set.require(entry.name)?);
        }
        Ok(())
    }
}

/// Checked copy of a raw program image into memory at `base`, refusing
/// images that would spill past `limit` bytes.
pub fn load_raw_image(
    cpu: &mut I8080,
    base: u16,
    image: &[u8],
    limit: usize,
) -> Result<(), RomLoadError> {
    if image.len() > limit {
        return Err(RomLoadError::ImageTooLarge {
            actual: image.len(),
            limit,
        });
    }
    cpu.load(base, image);
    Ok(())
}
