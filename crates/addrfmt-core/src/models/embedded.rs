//! Locale data compiled into the binary.
//!
//! Files are laid out on disk the same way a data directory is
//! (`<lang>/<Script>/<REGION>/<basename>.json`), so an external
//! directory can override any of them.

/// Embedded data files: `(basename, locale spec, JSON text)`.
pub static EMBEDDED_FILES: &[(&str, &str, &str)] = &[
    // Territory rulesets
    ("address", "und-AL", include_str!("../../locale/und/AL/address.json")),
    ("address", "und-AT", include_str!("../../locale/und/AT/address.json")),
    ("address", "und-CA", include_str!("../../locale/und/CA/address.json")),
    ("address", "und-CN", include_str!("../../locale/und/CN/address.json")),
    ("address", "und-DE", include_str!("../../locale/und/DE/address.json")),
    ("address", "und-FR", include_str!("../../locale/und/FR/address.json")),
    ("address", "und-GB", include_str!("../../locale/und/GB/address.json")),
    ("address", "und-HK", include_str!("../../locale/und/HK/address.json")),
    ("address", "und-JP", include_str!("../../locale/und/JP/address.json")),
    ("address", "und-NL", include_str!("../../locale/und/NL/address.json")),
    ("address", "und-US", include_str!("../../locale/und/US/address.json")),
    ("address", "und-ZA", include_str!("../../locale/und/ZA/address.json")),
    // Localized country names
    ("ctrynames", "de", include_str!("../../locale/de/ctrynames.json")),
    ("ctrynames", "en", include_str!("../../locale/en/ctrynames.json")),
    ("ctrynames", "fr", include_str!("../../locale/fr/ctrynames.json")),
    ("ctrynames", "ja", include_str!("../../locale/ja/ctrynames.json")),
    ("ctrynames", "sq", include_str!("../../locale/sq/ctrynames.json")),
    ("ctrynames", "zh", include_str!("../../locale/zh/ctrynames.json")),
    // Region choices for UI constraints
    ("regionnames", "en", include_str!("../../locale/en/regionnames.json")),
    ("regionnames", "es", include_str!("../../locale/es/regionnames.json")),
    // Translated field labels
    ("addressres", "de", include_str!("../../locale/de/addressres.json")),
    ("addressres", "es", include_str!("../../locale/es/addressres.json")),
];

/// Country names written in each country's own language, keyed by name.
pub static NATIVE_COUNTRY_NAMES: &str = include_str!("../../locale/nativecountries.json");

/// Look up an embedded file.
pub fn embedded_file(basename: &str, spec: &str) -> Option<&'static str> {
    EMBEDDED_FILES
        .iter()
        .find(|(b, s, _)| *b == basename && *s == spec)
        .map(|(_, _, text)| *text)
}
