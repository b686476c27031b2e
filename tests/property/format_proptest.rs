//! Property-based tests for the Brazilian input masks

use lgpd_mobile::shared::format::{
    br_to_iso, digits_only, format_phone_br, is_date_br, is_valid_name, iso_to_br, mask_date_br,
    sanitize_name, NAME_MAX_CHARS,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_digits_only_keeps_only_digits(input in ".*") {
        let digits = digits_only(&input);
        prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
        prop_assert_eq!(digits.len(), input.chars().filter(char::is_ascii_digit).count());
    }

    #[test]
    fn test_phone_mask_preserves_digits(digits in "[0-9]{0,11}") {
        let masked = format_phone_br(&digits);
        prop_assert_eq!(digits_only(&masked), digits);
    }

    #[test]
    fn test_phone_mask_caps_at_eleven_digits(digits in "[0-9]{12,20}") {
        prop_assert_eq!(digits_only(&format_phone_br(&digits)), &digits[..11]);
    }

    #[test]
    fn test_full_date_mask_is_br_shape(digits in "[0-9]{8,12}") {
        let masked = mask_date_br(&digits);
        prop_assert!(is_date_br(&masked));
        prop_assert_eq!(digits_only(&masked), &digits[..8]);
    }

    #[test]
    fn test_br_iso_round_trip(day in 1u32..=28, month in 1u32..=12, year in 1900u32..=2100) {
        let br = format!("{:02}/{:02}/{:04}", day, month, year);
        let iso = br_to_iso(&br).unwrap();
        prop_assert_eq!(iso.clone(), format!("{:04}-{:02}-{:02}", year, month, day));
        prop_assert_eq!(iso_to_br(&format!("{}T10:00:00Z", iso)), Some(br));
    }

    #[test]
    fn test_sanitized_names_are_valid(input in ".{0,120}") {
        let name = sanitize_name(&input);
        prop_assert!(is_valid_name(&name));
        prop_assert!(name.chars().count() <= NAME_MAX_CHARS);
    }
}
