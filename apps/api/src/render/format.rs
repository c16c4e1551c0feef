//! Text formatting shared by token values and generators.

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `425000` → `"$425,000"`.
pub fn currency(n: u64) -> String {
    format!("${}", group_thousands(n))
}

/// `4.3` → `"+4.3%"`, `-1.0` → `"-1.0%"`.
pub fn signed_percent(pct: f64) -> String {
    if pct >= 0.0 {
        format!("+{pct:.1}%")
    } else {
        format!("{pct:.1}%")
    }
}

/// Joins items as natural-language prose: "a", "a and b", "a, b and c".
pub fn join_natural<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Truncates to at most `max_chars`, cutting at the last word boundary and
/// appending an ellipsis when anything was dropped.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let budget = max_chars.saturating_sub(1);
    let cut: String = text.chars().take(budget).collect();
    let trimmed = match cut.rfind(' ') {
        Some(idx) if idx > 0 => &cut[..idx],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end_matches([',', ';', ':', '.']))
}

/// Lowercase, hyphen-separated, ASCII alphanumerics only.
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut pending_hyphen = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// FNV-1a over the given byte slices. Stable across builds and platforms,
/// which `std`'s `DefaultHasher` does not promise.
pub fn stable_hash(parts: &[&[u8]]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET;
    for part in parts {
        for byte in *part {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(PRIME);
        }
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_currency_and_percent() {
        assert_eq!(currency(425000), "$425,000");
        assert_eq!(signed_percent(4.3), "+4.3%");
        assert_eq!(signed_percent(-1.0), "-1.0%");
        assert_eq!(signed_percent(0.0), "+0.0%");
    }

    #[test]
    fn test_join_natural() {
        assert_eq!(join_natural::<&str>(&[]), "");
        assert_eq!(join_natural(&["a"]), "a");
        assert_eq!(join_natural(&["a", "b"]), "a and b");
        assert_eq!(join_natural(&["a", "b", "c"]), "a, b and c");
    }

    #[test]
    fn test_excerpt_cuts_on_word_boundary() {
        let text = "Riverton is a river town with deep roots and a growing tech scene";
        let e = excerpt(text, 30);
        assert!(e.chars().count() <= 30, "{e}");
        assert!(e.ends_with('…'));
        assert!(text.starts_with(e.trim_end_matches('…')));
    }

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt("Short  text\nhere", 160), "Short text here");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Spring Market: Update 2024! "), "spring-market-update-2024");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_stable_hash_is_stable() {
        assert_eq!(stable_hash(&[b"".as_slice()]), 0xcbf2_9ce4_8422_2325);
        assert_eq!(stable_hash(&[b"a".as_slice()]), 0xaf63_dc4c_8601_ec8c);
        assert_ne!(stable_hash(&[b"ab".as_slice()]), stable_hash(&[b"ba".as_slice()]));
    }
}
