use crate::core::tokenizer::ColumnMap;
use crate::domain::model::{Schema, TicketDetail};
use std::collections::HashMap;

/// Everything collected for one seller identity before sorting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SellerGroup {
    /// Seller as written in the first row seen for this group.
    pub seller: String,
    pub first_name: Option<String>,
    pub ticket_numbers: Vec<String>,
    pub details: Vec<TicketDetail>,
    pub count: u32,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub schema: Schema,
    /// Groups in first-seen order.
    pub groups: Vec<SellerGroup>,
    /// Rows skipped because the seller cell was blank.
    pub dropped_rows: usize,
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(|s| s.trim()).unwrap_or("")
}

pub fn group_key(schema: Schema, seller: &str, first_name: &str) -> String {
    if schema.groups_by_person() && !first_name.is_empty() {
        format!("{} {}", first_name, seller).to_lowercase()
    } else {
        seller.to_lowercase()
    }
}

/// Groups data rows by case-insensitive seller identity.
pub fn aggregate_rows(rows: &[Vec<String>], columns: &ColumnMap, schema: Schema) -> Aggregation {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<SellerGroup> = Vec::new();
    let mut dropped_rows = 0;

    for row in rows {
        let seller = cell(row, columns.seller);
        if seller.is_empty() {
            dropped_rows += 1;
            continue;
        }

        let ticket = cell(row, columns.ticket);
        let first = cell(row, columns.first_name);

        let key = group_key(schema, seller, first);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(SellerGroup {
                seller: seller.to_string(),
                first_name: (schema.groups_by_person() && !first.is_empty())
                    .then(|| first.to_string()),
                ..SellerGroup::default()
            });
            groups.len() - 1
        });
        let group = &mut groups[slot];

        match schema {
            Schema::Seller | Schema::Person => {
                if !ticket.is_empty() {
                    group.ticket_numbers.push(ticket.to_string());
                }
            }
            Schema::Detailed => {
                if !ticket.is_empty() {
                    group.details.push(TicketDetail {
                        ticket_number: ticket.to_string(),
                        first_name: first.to_string(),
                        last_name: cell(row, columns.last_name).to_string(),
                    });
                }
            }
            Schema::Tally => {
                let quantity = tally_quantity(cell(row, columns.count));
                group.count = group.count.saturating_add(quantity);
                if !ticket.is_empty() {
                    group.labels.push(ticket.to_string());
                }
            }
        }
    }

    if dropped_rows > 0 {
        tracing::debug!("Skipped {} row(s) without a seller", dropped_rows);
    }

    Aggregation {
        schema,
        groups,
        dropped_rows,
    }
}

/// Reported quantity of one tally row. Negative or missing is 0, anything past `u32::MAX` is capped.
pub fn tally_quantity(value: &str) -> u32 {
    u32::try_from(leading_int(value).max(0)).unwrap_or(u32::MAX)
}

/// Integer value of the leading digits (with optional sign), 0 when there are none.
pub fn leading_int(value: &str) -> i64 {
    let value = value.trim();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    match digits.parse::<i64>() {
        Ok(n) => sign * n,
        // 超出 i64 的位數
        Err(_) if !digits.is_empty() => sign * i64::MAX,
        Err(_) => 0,
    }
}
