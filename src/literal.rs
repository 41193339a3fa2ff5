//! Python literal rendering for the generated migration source.

/// Quote a string the way Python's `repr` does.
///
/// Single quotes are preferred; double quotes are used when the value
/// contains a single quote and no double quote.
///
/// ```
/// use schema_dump::literal;
///
/// assert_eq!(literal::string("id"), "'id'");
/// assert_eq!(literal::string("it's"), "\"it's\"");
/// ```
pub fn string(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// A list of strings: `['a', 'b']`.
pub fn list<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<String> = items.iter().map(|s| string(s.as_ref())).collect();
    format!("[{}]", items.join(", "))
}

/// A string or `None`.
pub fn optional(value: Option<&str>) -> String {
    value.map(string).unwrap_or_else(|| "None".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_quoting() {
        assert_eq!(string(""), "''");
        assert_eq!(string("say \"hi\""), "'say \"hi\"'");
        assert_eq!(string("it's \"x\""), "'it\\'s \"x\"'");
        assert_eq!(string("a\\b"), "'a\\\\b'");
        assert_eq!(string("line\nbreak"), "'line\\nbreak'");
    }

    #[test]
    fn test_list() {
        assert_eq!(list(&["a", "b", "c"]), "['a', 'b', 'c']");
        assert_eq!(list::<&str>(&[]), "[]");
    }

    #[test]
    fn test_optional() {
        assert_eq!(optional(None), "None");
        assert_eq!(optional(Some("users_pkey")), "'users_pkey'");
    }
}
