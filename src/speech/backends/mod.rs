//! Native synthesis engine backends

// SVOX Pico via libttspico
#[cfg(feature = "pico")]
pub mod pico;
