//! SVOX Pico synthesis engine
//!
//! The engine runs inside a fixed memory arena handed to it at start-up.
//! A voice is built from two lingware resources (text analysis and signal
//! generation) for the selected language.

mod ffi;

use crate::speech::{EngineStatus, Language, PullStatus, SynthEngine};
use crate::{PicoSpeakError, Result};
use log::{debug, info, warn};
use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_void};
use std::path::Path;
use std::ptr;

/// Working memory given to the engine, sized once
const ARENA_SIZE: usize = 2_500_000;

/// NUL-terminated voice definition name
const VOICE_NAME: &[u8] = b"PicoVoice\0";

/// Pico engine bound to one language
pub struct PicoEngine {
    system: ffi::PicoSystem,
    ta_resource: ffi::PicoResource,
    sg_resource: ffi::PicoResource,
    engine: ffi::PicoEngine,
    voice_defined: bool,
    /// Backing memory for `system`; dropped after teardown
    _arena: Vec<u8>,
}

impl PicoEngine {
    /// Initialize the engine and load lingware for `language` from `lang_dir`
    pub fn new(language: Language, lang_dir: &Path) -> Result<Self> {
        let mut arena = vec![0u8; ARENA_SIZE];
        let mut system: ffi::PicoSystem = ptr::null_mut();

        let status = unsafe {
            ffi::pico_initialize(
                arena.as_mut_ptr() as *mut c_void,
                ARENA_SIZE as u32,
                &mut system,
            )
        };

        let mut engine = Self {
            system,
            ta_resource: ptr::null_mut(),
            sg_resource: ptr::null_mut(),
            engine: ptr::null_mut(),
            voice_defined: false,
            _arena: arena,
        };
        if status != ffi::PICO_OK {
            return Err(engine.error("initializing pico system", status));
        }

        engine.load_voice(language, lang_dir)?;
        Ok(engine)
    }

    fn load_voice(&mut self, language: Language, lang_dir: &Path) -> Result<()> {
        let info = language.info();

        let ta_file = lingware_path(lang_dir, info.ta_lingware)?;
        debug!("Loading text analysis lingware {:?}", ta_file);
        let status = unsafe {
            ffi::pico_loadResource(
                self.system,
                ta_file.as_ptr() as *const u8,
                &mut self.ta_resource,
            )
        };
        self.check("loading text analysis", status)?;

        let sg_file = lingware_path(lang_dir, info.sg_lingware)?;
        debug!("Loading signal generation lingware {:?}", sg_file);
        let status = unsafe {
            ffi::pico_loadResource(
                self.system,
                sg_file.as_ptr() as *const u8,
                &mut self.sg_resource,
            )
        };
        self.check("loading signal generation", status)?;

        let ta_name =
            self.resource_name(self.ta_resource, "determining text analysis resource name")?;
        let sg_name =
            self.resource_name(self.sg_resource, "determining signal generation resource name")?;

        let voice = VOICE_NAME.as_ptr();
        let status = unsafe { ffi::pico_createVoiceDefinition(self.system, voice) };
        self.check("creating voice definition", status)?;
        self.voice_defined = true;

        let status = unsafe {
            ffi::pico_addResourceToVoiceDefinition(self.system, voice, ta_name.as_ptr() as *const u8)
        };
        self.check("assigning text analysis resource to voice", status)?;

        let status = unsafe {
            ffi::pico_addResourceToVoiceDefinition(self.system, voice, sg_name.as_ptr() as *const u8)
        };
        self.check("assigning signal generation resource to voice", status)?;

        let status = unsafe { ffi::pico_newEngine(self.system, voice, &mut self.engine) };
        self.check("creating pico engine", status)?;

        info!("Pico voice ready for {}", language);
        Ok(())
    }

    fn resource_name(&self, resource: ffi::PicoResource, context: &str) -> Result<CString> {
        let mut name = [0 as c_char; ffi::PICO_MAX_RESOURCE_NAME_SIZE];
        let status = unsafe { ffi::pico_getResourceName(self.system, resource, name.as_mut_ptr()) };
        self.check(context, status)?;
        Ok(unsafe { CStr::from_ptr(name.as_ptr()) }.to_owned())
    }

    fn check(&self, context: &str, status: ffi::PicoStatus) -> Result<()> {
        if status == ffi::PICO_OK {
            return Ok(());
        }
        Err(self.error(context, status))
    }

    fn error(&self, context: &str, status: ffi::PicoStatus) -> PicoSpeakError {
        PicoSpeakError::Engine {
            context: context.to_string(),
            message: self.status_message(EngineStatus(i32::from(status))),
        }
    }

    /// Release every handle in reverse order of creation
    ///
    /// Each field is cleared before its handle is released, so nothing can
    /// observe a half-released handle.
    fn release(&mut self) {
        let mut engine = std::mem::replace(&mut self.engine, ptr::null_mut());
        if !engine.is_null() {
            debug!("Disposing pico engine");
            unsafe { ffi::pico_disposeEngine(self.system, &mut engine) };
        }

        if std::mem::take(&mut self.voice_defined) {
            unsafe { ffi::pico_releaseVoiceDefinition(self.system, VOICE_NAME.as_ptr()) };
        }

        for resource in [&mut self.sg_resource, &mut self.ta_resource] {
            let mut handle = std::mem::replace(resource, ptr::null_mut());
            if !handle.is_null() {
                unsafe { ffi::pico_unloadResource(self.system, &mut handle) };
            }
        }

        let mut system = std::mem::replace(&mut self.system, ptr::null_mut());
        if !system.is_null() {
            debug!("Terminating pico system");
            unsafe { ffi::pico_terminate(&mut system) };
        }
    }
}

fn lingware_path(lang_dir: &Path, file: &str) -> Result<CString> {
    let path = lang_dir.join(file);
    CString::new(path.to_string_lossy().into_owned())
        .map_err(|_| PicoSpeakError::Config(format!("Invalid lingware path: {}", path.display())))
}

impl SynthEngine for PicoEngine {
    fn put_text(&mut self, text: &[u8]) -> std::result::Result<usize, EngineStatus> {
        // The API takes a 16-bit length
        let len = text.len().min(i16::MAX as usize);
        let mut sent: i16 = 0;
        let status =
            unsafe { ffi::pico_putTextUtf8(self.engine, text.as_ptr(), len as i16, &mut sent) };
        if status != ffi::PICO_OK {
            return Err(EngineStatus(i32::from(status)));
        }
        Ok(sent.max(0) as usize)
    }

    fn get_data(&mut self, out: &mut [i16]) -> (usize, PullStatus) {
        let bytes = (out.len() * 2).min(i16::MAX as usize) & !1;
        let mut received: i16 = 0;
        let mut data_type: i16 = 0;
        let status = unsafe {
            ffi::pico_getData(
                self.engine,
                out.as_mut_ptr() as *mut c_void,
                bytes as i16,
                &mut received,
                &mut data_type,
            )
        };
        // 16-bit samples
        let samples = (received.max(0) as usize / 2).min(out.len());

        let status = match status {
            ffi::PICO_STEP_BUSY => PullStatus::Producing,
            ffi::PICO_STEP_IDLE => PullStatus::Complete,
            other => PullStatus::Error(EngineStatus(i32::from(other))),
        };
        (samples, status)
    }

    fn status_message(&self, status: EngineStatus) -> String {
        let Ok(code) = i16::try_from(status.0) else {
            return status.to_string();
        };
        let mut message = [0 as c_char; ffi::PICO_RETSTRINGSIZE];
        let ret =
            unsafe { ffi::pico_getSystemStatusMessage(self.system, code, message.as_mut_ptr()) };
        if ret != ffi::PICO_OK {
            warn!("No message for pico status {}", code);
            return status.to_string();
        }
        unsafe { CStr::from_ptr(message.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}

impl Drop for PicoEngine {
    fn drop(&mut self) {
        debug!("Shutting down pico engine");
        self.release();
    }
}
