/*!
 * Tests for language utility functions
 */

use srt_translator::language_utils::{
    display_language, get_language_name, normalize_to_part2t, validate_language_code,
    LanguageCodeType,
};

/// Test validation of language codes
#[test]
fn test_validateLanguageCode_withValidCodes_shouldReturnCorrectType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("fra").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("ger").unwrap(), LanguageCodeType::Part2B);
    assert_eq!(validate_language_code(" EN ").unwrap(), LanguageCodeType::Part1);

    assert!(validate_language_code("xyz").is_err());
    assert!(validate_language_code("zh-Hans").is_err());
}

/// Test normalization of language codes to ISO 639-2/T format
#[test]
fn test_normalizeToPart2t_withValidCodes_shouldNormalizeCorrectly() {
    assert_eq!(normalize_to_part2t("en").unwrap(), "eng");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("chi").unwrap(), "zho");
    assert_eq!(normalize_to_part2t("DEU").unwrap(), "deu");
}

#[test]
fn test_getLanguageName_withValidCodes_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert!(get_language_name("xx").is_err());
}

/// Prompts fall back to the raw code
#[test]
fn test_displayLanguage_withUnknownCode_shouldReturnCode() {
    assert_eq!(display_language("es"), "Spanish");
    assert_eq!(display_language("pt-BR"), "pt-BR");
}
