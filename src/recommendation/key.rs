use std::fmt;

const SEPARATOR: char = ':';

/// Canonical identity of a (brand, model) pair.
///
/// Only case is folded; surrounding whitespace is kept as-is, so `" Sony"`
/// and `"Sony"` are different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(brand: &str, model: &str) -> Self {
        CacheKey(derive_key(brand, model))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn derive_key(brand: &str, model: &str) -> String {
    format!("{}{}{}", brand.to_lowercase(), SEPARATOR, model.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_variants_share_a_key() {
        let a = derive_key("Sony", "WH-1000XM5");
        let b = derive_key("sony", "wh-1000xm5");
        let c = derive_key("SONY", "WH-1000XM5");
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, "sony:wh-1000xm5");
    }

    #[test]
    fn empty_inputs_still_produce_a_key() {
        assert_eq!(derive_key("", ""), ":");
        assert_eq!(derive_key("Sennheiser", ""), "sennheiser:");
    }

    #[test]
    fn whitespace_is_not_trimmed() {
        assert_ne!(derive_key(" Sony", "XM5"), derive_key("Sony", "XM5"));
    }

    #[test]
    fn brand_and_model_are_not_interchangeable() {
        assert_ne!(derive_key("ab", "c"), derive_key("a", "bc"));
        assert_eq!(
            CacheKey::derive("Sennheiser", "HD800S").to_string(),
            "sennheiser:hd800s"
        );
    }
}
