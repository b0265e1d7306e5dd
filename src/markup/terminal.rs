//! Terminal capability detection

use std::env;

/// Emulators known to print OSC 8 hyperlink sequences as garbage
const HYPERLINK_INCOMPATIBLE: &[&str] = &["JetBrains-JediTerm"];

/// Whether the current terminal (per `TERMINAL_EMULATOR`) renders hyperlinks
pub fn supports_hyperlinks() -> bool {
    supports_hyperlinks_in(env::var("TERMINAL_EMULATOR").ok().as_deref())
}

pub fn supports_hyperlinks_in(emulator: Option<&str>) -> bool {
    !matches!(emulator, Some(name) if HYPERLINK_INCOMPATIBLE.contains(&name))
}
