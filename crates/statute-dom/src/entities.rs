// Named character references that show up in statute and regulation
// markup. Case-sensitive. Names are given without the leading `&` and
// trailing `;`.

/// Look up a named character reference.
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    let s: &'static str = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{00A0}",
        "ensp" => "\u{2002}",
        "emsp" => "\u{2003}",
        "thinsp" => "\u{2009}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "hellip" => "\u{2026}",
        "bull" => "\u{2022}",
        "middot" => "\u{00B7}",
        "sect" => "\u{00A7}",
        "para" => "\u{00B6}",
        "copy" => "\u{00A9}",
        "reg" => "\u{00AE}",
        "trade" => "\u{2122}",
        "deg" => "\u{00B0}",
        "times" => "\u{00D7}",
        "frac12" => "\u{00BD}",
        "frac14" => "\u{00BC}",
        "frac34" => "\u{00BE}",
        "rarr" => "\u{2192}",
        "larr" => "\u{2190}",
        _ => return None,
    };
    Some(s)
}

/// Decode a numeric reference body (`#123` or `#x1F`, without `&`/`;`).
/// Invalid code points decode to U+FFFD.
pub fn decode_numeric(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix(['x', 'X']) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    Some(char::from_u32(code).filter(|&c| c != '\0').unwrap_or('\u{FFFD}'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn essential_entities() {
        assert_eq!(lookup_entity("amp"), Some("&"));
        assert_eq!(lookup_entity("lt"), Some("<"));
        assert_eq!(lookup_entity("sect"), Some("\u{00A7}"));
    }

    #[test]
    fn case_sensitivity() {
        assert_eq!(lookup_entity("AMP"), None);
    }

    #[test]
    fn numeric_references() {
        assert_eq!(decode_numeric("#65"), Some('A'));
        assert_eq!(decode_numeric("#x25B8"), Some('\u{25B8}'));
        assert_eq!(decode_numeric("#0"), Some('\u{FFFD}'));
        assert_eq!(decode_numeric("#xZZ"), None);
        assert_eq!(decode_numeric("65"), None);
    }
}
