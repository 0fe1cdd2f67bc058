//! "Did you mean" ranking for tool and argument names.

/// Case-folded with separators dropped, so `List-Ghost-Posts` matches `list_ghost_posts`.
fn fold(name: &str) -> Vec<char> {
    name.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn edit_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[b.len()]
}

fn is_subsequence(short: &[char], long: &[char]) -> bool {
    let mut rest = long.iter();
    short.iter().all(|c| rest.any(|l| l == c))
}

/// Edits tolerated before a candidate stops being a plausible typo.
fn tolerance(len: usize) -> usize {
    match len {
        0 => 0,
        1..=4 => 1,
        5..=8 => 2,
        _ => (len / 3).max(3),
    }
}

/// Closest `candidates` to `input`, best first, at most `limit`.
pub fn suggest(input: &str, candidates: &[String], limit: usize) -> Vec<String> {
    let needle = fold(input);
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }
    let allowed = tolerance(needle.len());

    let mut ranked: Vec<(usize, &String)> = candidates
        .iter()
        .filter_map(|candidate| {
            let folded = fold(candidate);
            if folded.is_empty() {
                return None;
            }
            let score = if folded == needle {
                0
            } else if is_subsequence(&needle, &folded) || is_subsequence(&folded, &needle) {
                1
            } else {
                edit_distance(&needle, &folded)
            };
            (score <= allowed).then_some((score, candidate))
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then_with(|| a.1.len().cmp(&b.1.len()))
            .then_with(|| a.1.cmp(b.1))
    });
    ranked.dedup_by(|a, b| a.1 == b.1);
    ranked
        .into_iter()
        .take(limit)
        .map(|(_, name)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_plural_ranks_first() {
        let tools = names(&["list_ghost_posts", "list_ghost_pages", "delete_ghost_post"]);
        let out = suggest("list_ghost_post", &tools, 3);
        assert_eq!(out.first().map(String::as_str), Some("list_ghost_posts"));
    }

    #[test]
    fn field_typos_are_caught() {
        let fields = names(&["page", "limit", "status", "include", "filter"]);
        assert_eq!(suggest("limt", &fields, 3), vec!["limit".to_string()]);
        assert_eq!(suggest("Stauts", &fields, 1), vec!["status".to_string()]);
    }

    #[test]
    fn unrelated_input_suggests_nothing() {
        let fields = names(&["page", "limit"]);
        assert!(suggest("visibility", &fields, 3).is_empty());
        assert!(suggest("", &fields, 3).is_empty());
    }

    #[test]
    fn distance_counts_single_edits() {
        assert_eq!(edit_distance(&fold("kitten"), &fold("sitting")), 3);
        assert_eq!(edit_distance(&fold(""), &fold("abc")), 3);
    }
}
