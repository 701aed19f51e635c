use crate::core::aggregate::leading_int;
use crate::core::builder::sort_entries;
use crate::domain::model::{Dataset, RaffleEntry, Schema, Tickets};

// (last name, first name, ticket range)
const SEED_SELLERS: &[(&str, &str, &str)] = &[
    ("Smith", "John", "1001-1005"),
    ("Smith", "Sarah", "1006-1008"),
    ("Johnson", "Mike", "1009-1018"),
    ("Williams", "Emily", "1019-1020"),
    ("Brown", "David", "1021-1027"),
    ("Jones", "Lisa", "1028-1031"),
    ("Garcia", "Carlos", "1032-1037"),
    ("Martinez", "Ana", "1038-1045"),
    ("Davis", "Robert", "1046-1050"),
    ("Rodriguez", "Maria", "1051-1053"),
];

/// Expands `"1001-1005"` into each ticket number. A single number is returned as is.
pub fn expand_range(range: &str) -> Vec<String> {
    match range.split_once('-') {
        Some((start, end)) => {
            let (start, end) = (leading_int(start), leading_int(end));
            if start > end {
                return Vec::new();
            }
            (start..=end).map(|n| n.to_string()).collect()
        }
        None if range.trim().is_empty() => Vec::new(),
        None => vec![range.trim().to_string()],
    }
}

/// Dataset used until the first successful upload or sync.
pub fn seed_dataset() -> Dataset {
    let mut entries: Vec<RaffleEntry> = SEED_SELLERS
        .iter()
        .map(|(last, first, range)| {
            RaffleEntry::new(
                last.to_string(),
                Some(first.to_string()),
                Tickets::Numbers {
                    numbers: expand_range(range),
                },
            )
        })
        .collect();
    sort_entries(&mut entries);

    Dataset {
        schema: Schema::Person,
        entries,
    }
}
