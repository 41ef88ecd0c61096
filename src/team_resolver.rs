use std::collections::BTreeSet;

use crate::record::MatchRecord;

/// Distinct team names, sorted.
pub fn canonical_names(records: &[MatchRecord]) -> Vec<&str> {
    records
        .iter()
        .flat_map(|rec| [rec.home_team.as_str(), rec.away_team.as_str()])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct team names, for listings.
pub fn teams(records: &[MatchRecord]) -> Vec<String> {
    canonical_names(records)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Maps user input onto a team name present in `records`.
///
/// Tried in order, first hit wins:
/// 1. case-insensitive equality,
/// 2. input contained in the name,
/// 3. every input word abbreviates a later word of the name ("man city").
///
/// Names are walked in sorted order, so ambiguous input ("united") resolves
/// to the alphabetically first candidate.
pub fn resolve(input: &str, records: &[MatchRecord]) -> Option<String> {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    let names = canonical_names(records);
    let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();

    let hit = lowered
        .iter()
        .position(|name| *name == needle)
        .or_else(|| lowered.iter().position(|name| name.contains(&needle)))
        .or_else(|| {
            let words: Vec<&str> = needle.split_whitespace().collect();
            lowered
                .iter()
                .position(|name| words_abbreviate(&words, name))
        })?;
    Some(names[hit].to_string())
}

fn words_abbreviate(words: &[&str], name: &str) -> bool {
    let mut targets = name.split_whitespace();
    words
        .iter()
        .all(|word| targets.any(|target| abbreviates(word, target)))
}

// Same first letter, remaining letters appear in order: "utd" -> "united".
fn abbreviates(short: &str, word: &str) -> bool {
    let mut short = short.chars();
    let mut word = word.chars();
    match (short.next(), word.next()) {
        (Some(a), Some(b)) if a == b => {}
        _ => return false,
    }
    short.all(|c| word.any(|w| w == c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::MatchStatus;

    fn fixture(home: &str, away: &str) -> MatchRecord {
        MatchRecord {
            home_team: home.to_string(),
            away_team: away.to_string(),
            date: None,
            status: MatchStatus::Scheduled,
            competition: "test".to_string(),
            season: None,
            rolling: None,
        }
    }

    fn league() -> Vec<MatchRecord> {
        vec![
            fixture("Manchester United", "Manchester City"),
            fixture("Leeds United", "Arsenal"),
            fixture("Arsenal", "Manchester City"),
        ]
    }

    #[test]
    fn exact_match_ignores_case() {
        assert_eq!(resolve("arsenal", &league()).as_deref(), Some("Arsenal"));
        assert_eq!(resolve("  LEEDS UNITED ", &league()).as_deref(), Some("Leeds United"));
    }

    #[test]
    fn ambiguous_substring_takes_alphabetically_first() {
        assert_eq!(resolve("united", &league()).as_deref(), Some("Leeds United"));
        assert_eq!(resolve("city", &league()).as_deref(), Some("Manchester City"));
    }

    #[test]
    fn abbreviated_words_resolve() {
        assert_eq!(resolve("man city", &league()).as_deref(), Some("Manchester City"));
        assert_eq!(resolve("man utd", &league()).as_deref(), Some("Manchester United"));
    }

    #[test]
    fn unknown_or_blank_is_none() {
        assert_eq!(resolve("nonexistent fc", &league()), None);
        assert_eq!(resolve("", &league()), None);
        assert_eq!(resolve("arsenal", &[]), None);
    }

    #[test]
    fn team_listing_is_sorted_and_unique() {
        assert_eq!(
            teams(&league()),
            vec!["Arsenal", "Leeds United", "Manchester City", "Manchester United"]
        );
    }
}
