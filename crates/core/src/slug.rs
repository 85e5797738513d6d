//! URL-safe slugs.
//!
//! Handles and collection paths are compared by slug, so `"Café & Té"`,
//! `"cafe-te"` and `"CAFE TE"` all name the same collection.

/// Convert free text into a lowercase ASCII slug.
///
/// Accented Latin letters fold to their base letter, every run of other
/// characters becomes a single `-`, and leading/trailing dashes are dropped.
///
/// # Examples
///
/// ```
/// use vitrina_core::slugify;
///
/// assert_eq!(slugify("Café & Té"), "cafe-te");
/// assert_eq!(slugify("  Polos Niño  "), "polos-nino");
/// assert_eq!(slugify("---"), "");
/// ```
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if is_combining_mark(c) {
            continue;
        }
        let c = fold_accent(c);
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Combining diacritical marks (U+0300..U+036F), as left by decomposed input.
const fn is_combining_mark(c: char) -> bool {
    matches!(c, '\u{0300}'..='\u{036f}')
}

/// Base letter of a precomposed accented lowercase Latin letter.
const fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => 'g',
        'ĥ' => 'h',
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' => 'i',
        'ĵ' => 'j',
        'ķ' => 'k',
        'ĺ' | 'ļ' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ņ' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ŕ' | 'ŗ' | 'ř' => 'r',
        'ś' | 'ŝ' | 'ş' | 'š' => 's',
        'ţ' | 'ť' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ŵ' => 'w',
        'ý' | 'ÿ' | 'ŷ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        assert_eq!(slugify("Summer Sale"), "summer-sale");
        assert_eq!(slugify("summer-sale"), "summer-sale");
        assert_eq!(slugify("SUMMER   SALE!!"), "summer-sale");
    }

    #[test]
    fn test_accents_fold() {
        assert_eq!(slugify("Ropa de Niño"), "ropa-de-nino");
        assert_eq!(slugify("Ácido Hialurónico"), "acido-hialuronico");
    }

    #[test]
    fn test_decomposed_accents_fold() {
        // "e" followed by U+0301 COMBINING ACUTE ACCENT
        assert_eq!(slugify("Cafe\u{0301}"), "cafe");
    }

    #[test]
    fn test_trims_dashes() {
        assert_eq!(slugify("-hello-"), "hello");
        assert_eq!(slugify("  (new) "), "new");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_digits_kept() {
        assert_eq!(slugify("Pack x 12"), "pack-x-12");
    }
}
