//! Naming-convention variants used to bridge call edges across languages
//! that don't share an AST-resolved relationship (e.g. a TypeScript fetch
//! call into a C# controller action).

/// Split an identifier into its lowercase word parts, regardless of which
/// convention it was written in (snake_case, camelCase, PascalCase,
/// kebab-case, SCREAMING_SNAKE_CASE).
pub fn split_words(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower_or_digit = false;

    for c in identifier.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower_or_digit = false;
            continue;
        }
        if c.is_uppercase() && prev_lower_or_digit {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c.to_ascii_lowercase());
        prev_lower_or_digit = c.is_lowercase() || c.is_numeric();
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Generate the standard set of naming-convention spellings for `identifier`.
/// Always includes the original spelling first.
pub fn naming_variants(identifier: &str) -> Vec<String> {
    let words = split_words(identifier);
    if words.is_empty() {
        return vec![identifier.to_string()];
    }

    let snake = words.join("_");
    let kebab = words.join("-");
    let screaming = words.iter().map(|w| w.to_uppercase()).collect::<Vec<_>>().join("_");
    let pascal = words
        .iter()
        .map(|w| capitalize(w))
        .collect::<Vec<_>>()
        .join("");
    let camel = {
        let mut parts = words.iter();
        let first = parts.next().cloned().unwrap_or_default();
        let rest: String = parts.map(|w| capitalize(w)).collect();
        format!("{first}{rest}")
    };

    let mut variants = vec![identifier.to_string(), snake, kebab, screaming, pascal, camel];
    variants.dedup();
    variants
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_camel_case() {
        assert_eq!(split_words("getUserData"), vec!["get", "user", "data"]);
    }

    #[test]
    fn splits_snake_case() {
        assert_eq!(split_words("get_user_data"), vec!["get", "user", "data"]);
    }

    #[test]
    fn generates_all_conventions() {
        let variants = naming_variants("getUserData");
        assert!(variants.contains(&"get_user_data".to_string()));
        assert!(variants.contains(&"GetUserData".to_string()));
        assert!(variants.contains(&"get-user-data".to_string()));
        assert!(variants.contains(&"GET_USER_DATA".to_string()));
    }
}
