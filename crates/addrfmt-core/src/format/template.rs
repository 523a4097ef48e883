//! Template substitution and whitespace cleanup.

use regex::Captures;

use crate::models::address::Address;
use crate::rules::patterns::{HORIZONTAL_SPACE, NEWLINE_RUN, PLACEHOLDER};

/// Fill every `{field}` placeholder; unknown or absent fields become empty.
pub fn substitute(template: &str, address: &Address) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            address.get_by_name(&caps[1]).unwrap_or("").to_string()
        })
        .into_owned()
}

/// Tidy substituted output. The steps run in this order:
/// 1. runs of spaces and tabs become one space;
/// 2. a space after a newline goes;
/// 3. a space before a newline goes;
/// 4. runs of newlines become one;
/// 5. the whole text is trimmed.
pub fn clean_whitespace(text: &str) -> String {
    let text = HORIZONTAL_SPACE.replace_all(text, " ");
    let text = text.replace("\n ", "\n").replace(" \n", "\n");
    NEWLINE_RUN.replace_all(&text, "\n").trim().to_string()
}

/// Substitute and clean.
pub fn render(template: &str, address: &Address) -> String {
    clean_whitespace(&substitute(template, address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::address::AddressField;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_fields_leave_no_gaps() {
        let address = Address::default()
            .with(AddressField::StreetAddress, "1 Main St")
            .with(AddressField::PostalCode, "62701");
        let out = render("{streetAddress}\n{locality} {region} {postalCode}\n{country}", &address);
        assert_eq!(out, "1 Main St\n62701");
    }

    #[test]
    fn test_unknown_placeholder_is_empty() {
        let address = Address::default().with(AddressField::Locality, "Leeds");
        assert_eq!(render("{locality} {building}", &address), "Leeds");
    }

    #[test]
    fn test_cleanup_order() {
        assert_eq!(clean_whitespace(" a \t b \n \n  c \n\n\n d  "), "a b\nc\nd");
        assert_eq!(clean_whitespace("\n\n"), "");
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        for text in [" a \t b \n \n  c ", "x\n \n \ny", "  ", "{a}\n\n{b}", "a  \n  b"] {
            let once = clean_whitespace(text);
            assert_eq!(clean_whitespace(&once), once);
        }
    }
}
