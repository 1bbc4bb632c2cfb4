//! "Did you mean" hints for mistyped body categories

use crate::palettes;

/// Largest edit distance still offered as a suggestion
const MAX_DISTANCE: usize = 2;

/// Edit distance between two strings, counted in chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != *cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(diagonal + 1);
        }
    }

    row[b.len()]
}

/// Known body categories close to `query`, nearest first, at most three.
pub fn suggest_categories(query: &str) -> Vec<&'static str> {
    let query = query.trim().to_lowercase();
    let mut scored: Vec<(usize, &'static str)> = palettes::list_categories()
        .into_iter()
        .map(|name| (edit_distance(&query, name), name))
        .filter(|(distance, _)| *distance <= MAX_DISTANCE)
        .collect();

    scored.sort();
    scored.into_iter().take(3).map(|(_, name)| name).collect()
}

/// Render suggestions as a single hint line, if there are any.
pub fn format_suggestion(suggestions: &[&str]) -> Option<String> {
    match suggestions {
        [] => None,
        [one] => Some(format!("Did you mean '{}'?", one)),
        [first, second] => Some(format!("Did you mean '{}' or '{}'?", first, second)),
        [first, rest @ .., last] => {
            let middle: String = rest.iter().map(|s| format!(", '{}'", s)).collect();
            Some(format!("Did you mean '{}'{}, or '{}'?", first, middle, last))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("gold", "gold"), 0);
        assert_eq!(edit_distance("", "moon"), 4);
        assert_eq!(edit_distance("moon", ""), 4);
        assert_eq!(edit_distance("zombi", "zombie"), 1);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn test_suggest_typo() {
        assert_eq!(suggest_categories("Zombi")[0], "zombie");
        assert_eq!(suggest_categories("golld"), vec!["gold"]);
    }

    #[test]
    fn test_suggest_nothing_close() {
        assert!(suggest_categories("xylophone").is_empty());
    }

    #[test]
    fn test_format_suggestion() {
        assert_eq!(format_suggestion(&[]), None);
        assert_eq!(format_suggestion(&["gold"]), Some("Did you mean 'gold'?".to_string()));
        assert_eq!(
            format_suggestion(&["red", "bot"]),
            Some("Did you mean 'red' or 'bot'?".to_string())
        );
        assert_eq!(
            format_suggestion(&["red", "bot", "dos"]),
            Some("Did you mean 'red', 'bot', or 'dos'?".to_string())
        );
    }
}
