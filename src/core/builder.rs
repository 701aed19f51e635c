use crate::core::aggregate::{leading_int, Aggregation, SellerGroup};
use crate::domain::model::{Dataset, RaffleEntry, Schema, SellerCasing, TicketDetail, Tickets};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Sorts ticket numbers by integer value; non-numeric values count as 0. The sort is stable.
pub fn sort_ticket_numbers(numbers: &mut [String]) {
    numbers.sort_by_key(|n| leading_int(n));
}

pub fn sort_ticket_details(details: &mut [TicketDetail]) {
    details.sort_by_key(|d| leading_int(&d.ticket_number));
}

pub fn canonical_name(name: &str, casing: SellerCasing) -> String {
    match casing {
        SellerCasing::Original => name.to_string(),
        SellerCasing::Capitalized => {
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        }
    }
}

/// Primary sort key: accents stripped, case folded. "Álvarez" and "alvarez" share a key.
pub fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accent- and case-insensitive first, then unaccented before accented, then raw text
/// so the ordering stays total.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| {
            let a: String = a.nfc().flat_map(char::to_lowercase).collect();
            let b: String = b.nfc().flat_map(char::to_lowercase).collect();
            a.cmp(&b)
        })
        .then_with(|| a.cmp(b))
}

pub fn sort_entries(entries: &mut [RaffleEntry]) {
    entries.sort_by(|a, b| {
        compare_names(&a.seller, &b.seller).then_with(|| {
            compare_names(
                a.first_name.as_deref().unwrap_or(""),
                b.first_name.as_deref().unwrap_or(""),
            )
        })
    });
}

fn build_entry(group: SellerGroup, schema: Schema) -> RaffleEntry {
    let SellerGroup {
        seller,
        first_name,
        mut ticket_numbers,
        mut details,
        count,
        labels,
    } = group;

    let tickets = match schema {
        Schema::Seller | Schema::Person => {
            sort_ticket_numbers(&mut ticket_numbers);
            Tickets::Numbers {
                numbers: ticket_numbers,
            }
        }
        Schema::Detailed => {
            sort_ticket_details(&mut details);
            Tickets::Details { details }
        }
        Schema::Tally => Tickets::Tally {
            count,
            label: (!labels.is_empty()).then(|| labels.join(", ")),
        },
    };

    let casing = schema.casing();
    RaffleEntry::new(
        canonical_name(&seller, casing),
        first_name.map(|f| canonical_name(&f, casing)),
        tickets,
    )
}

/// Turns grouped rows into a sorted dataset.
pub fn build_dataset(aggregation: Aggregation) -> Dataset {
    let schema = aggregation.schema;
    let mut entries: Vec<RaffleEntry> = aggregation
        .groups
        .into_iter()
        .map(|group| build_entry(group, schema))
        .collect();

    sort_entries(&mut entries);

    Dataset { schema, entries }
}
