//! Raw FFI bindings for the SVOX Pico engine (libttspico).
//!
//! Only the subset of `picoapi.h` needed to load lingware, create an
//! engine, push text and pull PCM is declared here.

use std::os::raw::{c_char, c_void};

pub type PicoStatus = i16;
pub type PicoChar = u8;

/// Opaque handles; the engine owns the pointed-to state
pub type PicoSystem = *mut c_void;
pub type PicoResource = *mut c_void;
pub type PicoEngine = *mut c_void;

pub const PICO_OK: PicoStatus = 0;
pub const PICO_STEP_IDLE: PicoStatus = 200;
pub const PICO_STEP_BUSY: PicoStatus = 201;

/// Size of the buffers the API fills with messages
pub const PICO_RETSTRINGSIZE: usize = 200;
pub const PICO_MAX_RESOURCE_NAME_SIZE: usize = 32;

#[link(name = "ttspico")]
extern "C" {
    pub fn pico_initialize(memory: *mut c_void, size: u32, out_system: *mut PicoSystem)
        -> PicoStatus;
    pub fn pico_terminate(system: *mut PicoSystem) -> PicoStatus;
    pub fn pico_getSystemStatusMessage(
        system: PicoSystem,
        err_code: PicoStatus,
        out_message: *mut c_char,
    ) -> PicoStatus;

    pub fn pico_loadResource(
        system: PicoSystem,
        resource_file_name: *const PicoChar,
        out_resource: *mut PicoResource,
    ) -> PicoStatus;
    pub fn pico_unloadResource(system: PicoSystem, inout_resource: *mut PicoResource)
        -> PicoStatus;
    pub fn pico_getResourceName(
        system: PicoSystem,
        resource: PicoResource,
        out_name: *mut c_char,
    ) -> PicoStatus;

    pub fn pico_createVoiceDefinition(system: PicoSystem, voice_name: *const PicoChar)
        -> PicoStatus;
    pub fn pico_addResourceToVoiceDefinition(
        system: PicoSystem,
        voice_name: *const PicoChar,
        resource_name: *const PicoChar,
    ) -> PicoStatus;
    pub fn pico_releaseVoiceDefinition(system: PicoSystem, voice_name: *const PicoChar)
        -> PicoStatus;

    pub fn pico_newEngine(
        system: PicoSystem,
        voice_name: *const PicoChar,
        out_engine: *mut PicoEngine,
    ) -> PicoStatus;
    pub fn pico_disposeEngine(system: PicoSystem, inout_engine: *mut PicoEngine) -> PicoStatus;

    pub fn pico_putTextUtf8(
        engine: PicoEngine,
        text: *const PicoChar,
        text_size: i16,
        out_bytes_put: *mut i16,
    ) -> PicoStatus;
    pub fn pico_getData(
        engine: PicoEngine,
        out_buffer: *mut c_void,
        buffer_size: i16,
        out_bytes_received: *mut i16,
        out_data_type: *mut i16,
    ) -> PicoStatus;
}
