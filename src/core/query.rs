use crate::domain::model::{Dataset, RaffleEntry};
use std::borrow::Borrow;

/// Case-insensitive substring search over seller and first names.
///
/// A blank query matches nothing. Results keep dataset order.
pub fn search<'a>(entries: &'a [RaffleEntry], query: &str) -> Vec<&'a RaffleEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    entries
        .iter()
        .filter(|entry| {
            entry.seller.to_lowercase().contains(&needle)
                || entry
                    .first_name
                    .as_ref()
                    .is_some_and(|f| f.to_lowercase().contains(&needle))
                || entry.display_name().to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn total_tickets<E: Borrow<RaffleEntry>>(entries: &[E]) -> u64 {
    entries
        .iter()
        .map(|e| u64::from(e.borrow().ticket_count))
        .sum()
}

/// Up to five numbers are listed in full; longer lists show the first three.
pub fn format_ticket_numbers(numbers: &[&str]) -> String {
    if numbers.len() <= 5 {
        return numbers.join(", ");
    }
    format!("{}... +{} more", numbers[..3].join(", "), numbers.len() - 3)
}

pub fn summary_line(dataset: &Dataset, last_updated: &str) -> String {
    format!(
        "Data last updated: {} • {} tickets from {} sellers",
        last_updated,
        total_tickets(&dataset.entries),
        dataset.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ingest::parse_csv;
    use crate::domain::model::Tickets;

    fn dataset() -> Dataset {
        parse_csv(
            "Ticket Number,Seller\n1001,Smith\n1002,Smith\n1003,Garcia\n1004,Goldsmith\n1005,Lee\n",
        )
        .unwrap()
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        let data = dataset();
        assert!(search(&data.entries, "").is_empty());
        assert!(search(&data.entries, "   \t").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let data = dataset();
        let found = search(&data.entries, "  SMITH ");

        let sellers: Vec<&str> = found.iter().map(|e| e.seller.as_str()).collect();
        assert_eq!(sellers, vec!["Goldsmith", "Smith"]);
        assert_eq!(total_tickets(&found), 3);
    }

    #[test]
    fn test_search_preserves_order_and_containment() {
        let data = dataset();
        for query in ["s", "g", "e", "zz", "1"] {
            let found = search(&data.entries, query);

            let mut cursor = data.entries.iter();
            for entry in &found {
                assert!(entry.seller.to_lowercase().contains(query));
                assert!(cursor.any(|e| std::ptr::eq(e, *entry)), "out of order for {}", query);
            }
        }
    }

    #[test]
    fn test_search_matches_first_and_full_name() {
        let entries = vec![RaffleEntry::new(
            "Smith".to_string(),
            Some("Sarah".to_string()),
            Tickets::Numbers { numbers: vec![] },
        )];

        assert_eq!(search(&entries, "sarah").len(), 1);
        assert_eq!(search(&entries, "sarah smith").len(), 1);
        assert!(search(&entries, "john").is_empty());
    }

    #[test]
    fn test_format_ticket_numbers() {
        assert_eq!(format_ticket_numbers(&[]), "");
        assert_eq!(format_ticket_numbers(&["1", "2", "3", "4", "5"]), "1, 2, 3, 4, 5");
        assert_eq!(
            format_ticket_numbers(&["1", "2", "3", "4", "5", "6"]),
            "1, 2, 3... +3 more"
        );
    }

    #[test]
    fn test_summary_line() {
        let data = dataset();
        assert_eq!(
            summary_line(&data, "10/15/2026"),
            "Data last updated: 10/15/2026 • 5 tickets from 4 sellers"
        );
    }
}
