use crate::domain::model::Schema;
use crate::utils::error::Result;
use csv::{ReaderBuilder, Trim};

/// Header row plus data rows, every field trimmed and unquoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Column roles found in a header row. `None` means the role is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMap {
    pub ticket: Option<usize>,
    pub seller: Option<usize>,
    pub first_name: Option<usize>,
    pub last_name: Option<usize>,
    pub count: Option<usize>,
    /// The seller column is headed "seller" rather than borrowed from a last-name column.
    pub seller_named: bool,
    /// No header named a seller, so the seller (and an unnamed ticket column) came from position.
    pub positional: bool,
}

impl ColumnMap {
    /// Layout implied by the mapping, or `None` when no seller column could be found.
    pub fn schema(&self) -> Option<Schema> {
        let seller = self.seller?;
        let distinct = |idx: Option<usize>| idx.is_some_and(|i| i != seller);

        let schema = if self.seller_named && distinct(self.first_name) && distinct(self.last_name)
        {
            Schema::Detailed
        } else if self.count.is_some() && self.count != self.ticket {
            Schema::Tally
        } else if distinct(self.first_name) {
            Schema::Person
        } else {
            Schema::Seller
        };
        Some(schema)
    }
}

pub fn clean_field(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}

/// Splits CSV text into a header and data rows, skipping blank lines.
///
/// Returns `Ok(None)` when there is no data row after the header.
pub fn tokenize(text: &str) -> Result<Option<CsvTable>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields: Vec<String> = record.iter().map(clean_field).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        lines.push(fields);
    }

    if lines.len() < 2 {
        tracing::debug!("CSV has {} non-empty line(s), need a header and data", lines.len());
        return Ok(None);
    }

    let headers = lines.remove(0);
    Ok(Some(CsvTable {
        headers,
        rows: lines,
    }))
}

/// Assigns column roles by case-insensitive substring match on header names.
pub fn classify_headers(headers: &[String]) -> ColumnMap {
    let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
    let find = |pred: &dyn Fn(&str) -> bool| lowered.iter().position(|h| pred(h));

    let ticket = find(&|h| h.contains("ticket") && h.contains("number"));
    let named_seller = find(&|h| h.contains("seller"));
    let last_name = find(&|h| h.contains("last"));
    let first_name = find(&|h| h.contains("first"));
    // 明確的數量欄優先，其次才是不含 number 的 ticket 欄（例如 "Tickets Purchased"）
    let count = find(&|h| h.contains("count") || h.contains("qty") || h.contains("quantity"))
        .or_else(|| find(&|h| h.contains("ticket") && !h.contains("number")));

    let mut map = ColumnMap {
        ticket,
        seller: named_seller.or(last_name),
        first_name,
        last_name,
        count,
        seller_named: named_seller.is_some(),
        positional: false,
    };

    if map.seller.is_none() && headers.len() >= 2 {
        if map.ticket.is_none() && map.count.is_none() {
            map.ticket = Some(0);
        }
        map.seller = (0..headers.len()).find(|&i| Some(i) != map.ticket && Some(i) != map.count);
        map.positional = map.seller.is_some();
        if map.first_name == map.seller {
            map.first_name = None;
        }
    }

    map
}
