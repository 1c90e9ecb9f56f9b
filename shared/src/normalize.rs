//! Pure normalization helpers for product, color, and point-of-sale keys
//!
//! Raw exports mix casing and stray whitespace freely; every aggregation key
//! goes through `normalize_key` before comparison or grouping.

/// Separator between the base product and the color variant in the free-text
/// product label, e.g. `"Zapato Paris - Rojo"`.
pub const PRODUCT_VARIANT_SEPARATOR: &str = " - ";

/// Canonicalize a product/color/point-of-sale string: trim and uppercase.
pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// True when a cell value is empty after trimming.
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Split a free-text product label into base product and optional color
/// variant.
///
/// Text before the first `" - "` is the base product; text after it, when
/// present and non-blank, is the color variant. Both halves are trimmed.
pub fn split_product_label(label: &str) -> (String, Option<String>) {
    match label.split_once(PRODUCT_VARIANT_SEPARATOR) {
        Some((product, variant)) if !is_blank(variant) => {
            (product.trim().to_string(), Some(variant.trim().to_string()))
        }
        Some((product, _)) => (product.trim().to_string(), None),
        None => (label.trim().to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_trims_and_uppercases() {
        assert_eq!(normalize_key("  zapato paris "), "ZAPATO PARIS");
        assert_eq!(normalize_key("Dean Funes"), "DEAN FUNES");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_split_product_label_with_variant() {
        let (product, variant) = split_product_label("Zapato Paris - Rojo");
        assert_eq!(product, "Zapato Paris");
        assert_eq!(variant.as_deref(), Some("Rojo"));
    }

    #[test]
    fn test_split_product_label_without_variant() {
        let (product, variant) = split_product_label("Cinturon Clasico");
        assert_eq!(product, "Cinturon Clasico");
        assert_eq!(variant, None);
    }

    #[test]
    fn test_split_product_label_trailing_separator() {
        let (product, variant) = split_product_label("Zapato Paris - ");
        assert_eq!(product, "Zapato Paris");
        assert_eq!(variant, None);
    }

    #[test]
    fn test_split_product_label_only_splits_on_first_separator() {
        let (product, variant) = split_product_label("Bota Alta - Negro - Gamuza");
        assert_eq!(product, "Bota Alta");
        assert_eq!(variant.as_deref(), Some("Negro - Gamuza"));
    }

    #[test]
    fn test_hyphen_without_spaces_is_not_a_separator() {
        let (product, variant) = split_product_label("Zapato T-38");
        assert_eq!(product, "Zapato T-38");
        assert_eq!(variant, None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_normalize_key_is_idempotent(raw in ".{0,40}") {
                let once = normalize_key(&raw);
                prop_assert_eq!(normalize_key(&once), once);
            }

            #[test]
            fn prop_split_halves_never_contain_the_separator_boundary(
                product in "[A-Za-z0-9 ]{1,20}",
                variant in "[A-Za-z0-9 ]{1,20}",
            ) {
                prop_assume!(!is_blank(&product) && !is_blank(&variant));
                let label = format!("{}{}{}", product, PRODUCT_VARIANT_SEPARATOR, variant);
                let (base, color) = split_product_label(&label);
                prop_assert_eq!(base, product.trim());
                prop_assert_eq!(color.as_deref(), Some(variant.trim()));
            }
        }
    }
}
