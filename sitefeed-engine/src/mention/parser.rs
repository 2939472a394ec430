/// Mention trigger parsing for the composer.
/// Pure cursor-position logic: no state, no I/O. Positions are char
/// indices so accented names behave the same as ASCII ones.
use sitefeed_types::MentionSuggestion;

/// An in-progress "@" mention found at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Char index of the `@` itself.
    pub start: usize,
    /// Partial query typed after the `@`, lower-cased.
    pub query: String,
}

/// Result of accepting a suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub text: String,
    /// Caret position (char index) immediately after the inserted mention.
    pub caret: usize,
}

/// Characters allowed inside a mention query: letters (including
/// accented), digits, `_` and `-`. Excludes whitespace, so a trigger can
/// never cross a line break.
fn is_query_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

/// Scan backward from `cursor` for an active mention trigger.
///
/// A trigger requires the `@` to start a word (preceded by whitespace or
/// nothing) and every char between `@` and the cursor to be a query char.
pub fn detect_trigger(text: &str, cursor: usize) -> Option<Trigger> {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    // Walk left over query chars until we hit the `@`
    let mut at = None;
    for i in (0..cursor).rev() {
        let c = chars[i];
        if c == '@' {
            at = Some(i);
            break;
        }
        if !is_query_char(c) {
            return None;
        }
    }
    let start = at?;

    // Start-of-word rule: the `@` must not be glued to a preceding word
    if start > 0 && !chars[start - 1].is_whitespace() {
        return None;
    }

    let query: String = chars[start + 1..cursor].iter().collect();
    Some(Trigger {
        start,
        query: query.to_lowercase(),
    })
}

/// Filter directory entries against a partial query.
///
/// Matches first-name prefix, last-name prefix, or full-name substring,
/// case-insensitively. The directory's natural order is preserved; an
/// empty query matches everything.
pub fn filter<'a>(
    suggestions: &'a [MentionSuggestion],
    query: &str,
) -> Vec<&'a MentionSuggestion> {
    if query.is_empty() {
        return suggestions.iter().collect();
    }
    let query = query.to_lowercase();
    suggestions
        .iter()
        .filter(|s| {
            let first = s.first_name.to_lowercase();
            let last = s.last_name.to_lowercase();
            first.starts_with(&query)
                || last.starts_with(&query)
                || format!("{} {}", first, last).contains(&query)
        })
        .collect()
}

/// Splice `@<first_name> ` over the trigger span and report where the
/// caret lands.
pub fn build_replacement(
    text: &str,
    trigger_start: usize,
    query_len: usize,
    chosen: &MentionSuggestion,
) -> Replacement {
    let chars: Vec<char> = text.chars().collect();
    let span_end = (trigger_start + 1 + query_len).min(chars.len());

    let mention = format!("@{} ", chosen.first_name);
    let mut text: String = chars[..trigger_start.min(chars.len())].iter().collect();
    text.push_str(&mention);
    let caret = trigger_start + mention.chars().count();
    text.extend(&chars[span_end..]);

    Replacement { text, caret }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(first: &str, last: &str) -> MentionSuggestion {
        MentionSuggestion {
            id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            role: "worker".to_string(),
            color: "#333333".to_string(),
        }
    }

    #[test]
    fn test_detect_trigger_basic() {
        let trigger = detect_trigger("Hello @jo", 9).unwrap();
        assert_eq!(trigger.start, 6);
        assert_eq!(trigger.query, "jo");
    }

    #[test]
    fn test_detect_trigger_at_start_of_text() {
        let trigger = detect_trigger("@mar", 4).unwrap();
        assert_eq!(trigger.start, 0);
        assert_eq!(trigger.query, "mar");
    }

    #[test]
    fn test_detect_trigger_rejects_mid_word_at() {
        // Looks like an email address, not a mention
        assert_eq!(detect_trigger("a@b", 3), None);
        assert_eq!(detect_trigger("mail me at test@example", 20), None);
    }

    #[test]
    fn test_detect_trigger_query_lowercased_and_accents_allowed() {
        let trigger = detect_trigger("cc @Józe", 8).unwrap();
        assert_eq!(trigger.start, 3);
        assert_eq!(trigger.query, "józe");
    }

    #[test]
    fn test_detect_trigger_stops_at_whitespace() {
        // Cursor is past a space, so the `@word` behind it is not active
        assert_eq!(detect_trigger("@jo done", 8), None);
    }

    #[test]
    fn test_detect_trigger_empty_query() {
        let trigger = detect_trigger("hey @", 5).unwrap();
        assert_eq!(trigger.start, 4);
        assert_eq!(trigger.query, "");
    }

    #[test]
    fn test_filter_empty_query_returns_all_in_order() {
        let directory = vec![user("Marta", "Diaz"), user("Omar", "Haddad")];
        let matched = filter(&directory, "");
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].first_name, "Marta");
    }

    #[test]
    fn test_filter_prefix_and_substring() {
        let directory = vec![
            user("Marta", "Diaz"),
            user("Omar", "Haddad"),
            user("Lena", "Marlow"),
            user("Piotr", "Nowak"),
        ];

        let matched = filter(&directory, "mar");
        let names: Vec<_> = matched.iter().map(|s| s.first_name.as_str()).collect();
        // Marta: first-name prefix; Lena Marlow: last-name prefix;
        // Omar: full-name substring ("omar haddad" contains "mar")
        assert!(names.contains(&"Marta"));
        assert!(names.contains(&"Lena"));
        assert!(names.contains(&"Omar"));
        assert!(!names.contains(&"Piotr"));
    }

    #[test]
    fn test_filter_case_insensitive() {
        let directory = vec![user("Marta", "Diaz")];
        assert_eq!(filter(&directory, "MAR").len(), 1);
    }

    #[test]
    fn test_build_replacement_mid_text() {
        let chosen = user("Marta", "Diaz");
        let result = build_replacement("Hello @ma, hi", 6, 2, &chosen);
        assert_eq!(result.text, "Hello @Marta , hi");
        // Caret lands right after "@Marta "
        assert_eq!(result.caret, 6 + "@Marta ".chars().count());
    }

    #[test]
    fn test_build_replacement_at_end() {
        let chosen = user("Omar", "Haddad");
        let result = build_replacement("cc @om", 3, 2, &chosen);
        assert_eq!(result.text, "cc @Omar ");
        assert_eq!(result.caret, result.text.chars().count());
    }
}
