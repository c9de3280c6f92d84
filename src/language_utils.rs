use anyhow::{Result, anyhow};
use isolang::Language;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

/// Language utilities for language tag handling
///
/// This module validates the language tags handed to the translation endpoint.
/// A tag is a primary ISO 639 subtag optionally followed by a script and/or a
/// region subtag (`fa`, `zh-CN`, `sr-Latn-RS`). The endpoint also understands
/// `auto` as a source language.

/// Source language used when the requested one cannot be parsed
pub const FALLBACK_SOURCE_LANGUAGE: &str = "auto";

/// Target language used when the requested one cannot be parsed
pub const FALLBACK_TARGET_LANGUAGE: &str = "en";

static TAG_GRAMMAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<lang>[A-Za-z]{2,3})(?:-(?P<script>[A-Za-z]{4}))?(?:-(?P<region>[A-Za-z]{2}|[0-9]{3}))?$")
        .expect("language tag grammar is a valid regex")
});

// ISO 639-2/B codes that differ from their 639-2/T counterparts
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

// Deprecated two-letter codes the endpoint still expects
const LEGACY_CODES: &[(&str, &str)] = &[("iw", "heb"), ("jw", "jav"), ("in", "ind"), ("ji", "yid")];

/// Language code type
#[derive(Debug, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
    /// Deprecated code still accepted by the endpoint
    Legacy,
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
        if LEGACY_CODES.iter().any(|(legacy, _)| *legacy == normalized_code) {
            return Ok(LanguageCodeType::Legacy);
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if BIBLIOGRAPHIC_CODES.iter().any(|(b, _)| *b == normalized_code) {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
        if let Some((_, part2t)) = LEGACY_CODES.iter().find(|(legacy, _)| *legacy == normalized_code) {
            return Ok(part2t.to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
        if let Some((_, part2t)) = BIBLIOGRAPHIC_CODES.iter().find(|(b, _)| *b == normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Parse a language tag and return it in canonical case (`zh-CN`, `sr-Latn-RS`)
pub fn parse_language_tag(tag: &str) -> Result<String> {
    let trimmed = tag.trim();
    let captures = TAG_GRAMMAR
        .captures(trimmed)
        .ok_or_else(|| anyhow!("Malformed language tag: '{}'", tag))?;

    let primary = captures["lang"].to_lowercase();
    validate_language_code(&primary)?;

    let mut canonical = primary;
    if let Some(script) = captures.name("script") {
        let script = script.as_str().to_lowercase();
        canonical.push('-');
        canonical.push_str(&script[..1].to_uppercase());
        canonical.push_str(&script[1..]);
    }
    if let Some(region) = captures.name("region") {
        canonical.push('-');
        canonical.push_str(&region.as_str().to_uppercase());
    }

    Ok(canonical)
}

/// Resolve a source language, falling back to `auto` when the tag does not parse
pub fn resolve_source_language(tag: &str) -> String {
    if tag.trim().eq_ignore_ascii_case(FALLBACK_SOURCE_LANGUAGE) {
        return FALLBACK_SOURCE_LANGUAGE.to_string();
    }
    match parse_language_tag(tag) {
        Ok(canonical) => canonical,
        Err(_) => {
            warn!("'{}' is an invalid language, switching to '{}'", tag, FALLBACK_SOURCE_LANGUAGE);
            FALLBACK_SOURCE_LANGUAGE.to_string()
        }
    }
}

/// Resolve a target language, falling back to `en` when the tag does not parse
pub fn resolve_target_language(tag: &str) -> String {
    match parse_language_tag(tag) {
        Ok(canonical) => canonical,
        Err(_) => {
            warn!("'{}' is an invalid language, switching to '{}'", tag, FALLBACK_TARGET_LANGUAGE);
            FALLBACK_TARGET_LANGUAGE.to_string()
        }
    }
}

/// Check if two language tags name the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let primary = |code: &str| {
        let code = code.split('-').next().unwrap_or_default().to_string();
        normalize_to_part2t(&code)
    };
    match (primary(code1), primary(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a tag's primary subtag
pub fn get_language_name(code: &str) -> Result<String> {
    let canonical = parse_language_tag(code)?;
    let primary = canonical.split('-').next().unwrap_or_default();
    let normalized = normalize_to_part2t(primary)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
