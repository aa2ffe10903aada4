//! Supported languages and their lingware files
//!
//! Each language maps to a fixed descriptor naming the resource files the
//! engine loads. The table is built once and never modified.

use crate::PicoSpeakError;
use log::warn;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Languages the Pico engine ships lingware for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Language {
    #[default]
    EnUs,
    EnGb,
    De,
    Es,
    Fr,
    It,
}

/// Static metadata for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageInfo {
    pub iso3: &'static str,
    pub country_iso3: &'static str,
    pub supported_lang: &'static str,
    pub internal_lang: &'static str,
    /// Text analysis lingware
    pub ta_lingware: &'static str,
    /// Signal generation lingware
    pub sg_lingware: &'static str,
    pub utpp_lingware: &'static str,
}

/// All languages, in the order they are listed to users
pub const LANGUAGES: [Language; 6] = [
    Language::EnUs,
    Language::EnGb,
    Language::De,
    Language::Es,
    Language::Fr,
    Language::It,
];

static LANGUAGE_TABLE: Lazy<HashMap<Language, LanguageInfo>> = Lazy::new(|| {
    let mut table = HashMap::new();
    table.insert(
        Language::EnUs,
        lang_info("eng", "USA", "en-US", "en-US_ta.bin", "en-US_lh0_sg.bin", "en-US_utpp.bin"),
    );
    table.insert(
        Language::EnGb,
        lang_info("eng", "GBR", "en-GB", "en-GB_ta.bin", "en-GB_kh0_sg.bin", "en-GB_utpp.bin"),
    );
    table.insert(
        Language::De,
        lang_info("deu", "DEU", "de-DE", "de-DE_ta.bin", "de-DE_gl0_sg.bin", "de-DE_utpp.bin"),
    );
    table.insert(
        Language::Es,
        lang_info("spa", "SPA", "es-ES", "es-ES_ta.bin", "es-ES_zl0_sg.bin", "es-ES_utpp.bin"),
    );
    table.insert(
        Language::Fr,
        lang_info("fra", "FRA", "fr-FR", "fr-FR_ta.bin", "fr-FR_nk0_sg.bin", "fr-FR_utpp.bin"),
    );
    table.insert(
        Language::It,
        lang_info("ita", "ITA", "it-IT", "it-IT_ta.bin", "it-IT_cm0_sg.bin", "it-IT_utpp.bin"),
    );
    table
});

const fn lang_info(
    iso3: &'static str,
    country_iso3: &'static str,
    locale: &'static str,
    ta_lingware: &'static str,
    sg_lingware: &'static str,
    utpp_lingware: &'static str,
) -> LanguageInfo {
    LanguageInfo {
        iso3,
        country_iso3,
        supported_lang: locale,
        internal_lang: locale,
        ta_lingware,
        sg_lingware,
        utpp_lingware,
    }
}

impl Language {
    /// Descriptor for this language
    pub fn info(self) -> &'static LanguageInfo {
        // Every variant is inserted above
        &LANGUAGE_TABLE[&self]
    }

    /// Locale name, e.g. "en-US"
    pub fn locale(self) -> &'static str {
        self.info().supported_lang
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.locale())
    }
}

impl FromStr for Language {
    type Err = PicoSpeakError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LANGUAGES
            .iter()
            .copied()
            .find(|lang| lang.locale() == s)
            .ok_or_else(|| {
                PicoSpeakError::Language(format!(
                    "{} (supported: {})",
                    s,
                    supported_languages().join(", ")
                ))
            })
    }
}

/// Locale names of every supported language
pub fn supported_languages() -> Vec<&'static str> {
    LANGUAGES.iter().map(|lang| lang.locale()).collect()
}

/// Parse a locale name, falling back to en-US for anything unknown
pub fn parse_language_name(name: &str) -> Language {
    name.parse().unwrap_or_else(|_| {
        warn!("Unknown language '{}', using {}", name, Language::default());
        Language::default()
    })
}
