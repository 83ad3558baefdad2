use serde::{Deserialize, Serialize};

/// Bootloader ROM size in bytes.
pub const ROM_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsmConfig {
    pub rom_size: usize,            // image capacity in bytes, must be even
    pub max_labels: usize,          // label count ceiling
    pub label_name_capacity: usize, // total bytes of label names
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            rom_size: ROM_SIZE,
            max_labels: 512,
            label_name_capacity: 65536,
        }
    }
}

impl AsmConfig {
    pub fn with_rom_size(rom_size: usize) -> Self {
        Self {
            rom_size,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_bootloader_rom() {
        let cfg = AsmConfig::default();
        assert_eq!(cfg.rom_size, 1024);
        assert_eq!(cfg.rom_size / 2, 512);
        assert_eq!(cfg.max_labels, 512);
    }

    #[test]
    fn config_serializes_as_json() {
        let cfg = AsmConfig::with_rom_size(64);
        let s = serde_json::to_string(&cfg).unwrap();
        let back: AsmConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(back, cfg);
    }
}
