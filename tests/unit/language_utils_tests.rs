/*!
 * Tests for language utility functions
 */

use paratrans::language_utils::{
    get_language_name, language_codes_match, normalize_to_part2t, parse_language_tag,
    resolve_source_language, resolve_target_language, validate_language_code, LanguageCodeType,
};

/// Test validation of language codes
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnCorrectType() {
    assert!(matches!(validate_language_code("en").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("fa").unwrap(), LanguageCodeType::Part1));
    assert!(matches!(validate_language_code("eng").unwrap(), LanguageCodeType::Part2T));
    assert!(matches!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B));
    assert!(matches!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1));

    assert!(validate_language_code("xyz").is_err());
    assert!(validate_language_code("123").is_err());
    assert!(validate_language_code("e").is_err());
}

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalize_to_part2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t(" EN ").unwrap(), "eng");
}

#[test]
fn test_parse_language_tag_withSubtags_shouldReturnCanonicalForm() {
    assert_eq!(parse_language_tag("en").unwrap(), "en");
    assert_eq!(parse_language_tag("ZH-tw").unwrap(), "zh-TW");
    assert_eq!(parse_language_tag("es-419").unwrap(), "es-419");
    assert!(parse_language_tag("en-").is_err());
}

#[test]
fn test_resolve_languages_shouldFallBackWithoutFailing() {
    assert_eq!(resolve_source_language("auto"), "auto");
    assert_eq!(resolve_source_language("en"), "en");
    assert_eq!(resolve_source_language("klingon"), "auto");
    assert_eq!(resolve_target_language("pt-br"), "pt-BR");
    assert_eq!(resolve_target_language(""), "en");
}

/// Test matching of different language code formats
#[test]
fn test_language_codes_match_withMatchingCodes_shouldReturnTrue() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(language_codes_match("zh-CN", "zho"));
    assert!(!language_codes_match("en", "fra"));
}

/// Test retrieval of language names from codes
#[test]
fn test_get_language_name_withValidCodes_shouldReturnCorrectName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("fra").unwrap(), "French");
    assert_eq!(get_language_name("fr-CA").unwrap(), "French");
    assert!(get_language_name("xyz").is_err());
}
