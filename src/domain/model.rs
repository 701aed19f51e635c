use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single ticket together with the buyer it was sold to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketDetail {
    pub ticket_number: String,
    pub first_name: String,
    pub last_name: String,
}

/// Tickets attached to one seller, shaped by the sheet layout they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Tickets {
    Numbers { numbers: Vec<String> },
    Details { details: Vec<TicketDetail> },
    /// Count-style sheets report a quantity per row instead of one row per ticket.
    Tally { count: u32, label: Option<String> },
}

impl Tickets {
    pub fn count(&self) -> u32 {
        match self {
            Tickets::Numbers { numbers } => numbers.len() as u32,
            Tickets::Details { details } => details.len() as u32,
            Tickets::Tally { count, .. } => *count,
        }
    }

    pub fn ticket_numbers(&self) -> Vec<&str> {
        match self {
            Tickets::Numbers { numbers } => numbers.iter().map(String::as_str).collect(),
            Tickets::Details { details } => {
                details.iter().map(|d| d.ticket_number.as_str()).collect()
            }
            Tickets::Tally { .. } => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaffleEntry {
    pub seller: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    pub ticket_count: u32,
    pub tickets: Tickets,
}

impl RaffleEntry {
    pub fn new(seller: String, first_name: Option<String>, tickets: Tickets) -> Self {
        Self {
            seller,
            first_name,
            ticket_count: tickets.count(),
            tickets,
        }
    }

    /// "First Last" for person-style entries, the seller otherwise.
    pub fn display_name(&self) -> String {
        match &self.first_name {
            Some(first) if !first.is_empty() => format!("{} {}", first, self.seller),
            _ => self.seller.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellerCasing {
    /// Keep the casing of the first row seen for the seller.
    Original,
    /// First letter upper-case, rest lower-case.
    Capitalized,
}

/// Layout detected from a CSV header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schema {
    /// `Ticket Number, Seller`
    Seller,
    /// `First Name, Last Name[, Ticket Number]`
    Person,
    /// `Ticket Number, First Name, Last Name, Seller`
    Detailed,
    /// `Last Name, First Name, Ticket Count[, Ticket Numbers]`
    Tally,
}

impl Schema {
    pub fn casing(self) -> SellerCasing {
        match self {
            Schema::Detailed => SellerCasing::Capitalized,
            Schema::Seller | Schema::Person | Schema::Tally => SellerCasing::Original,
        }
    }

    /// Whether the first name is part of the grouping key.
    pub fn groups_by_person(self) -> bool {
        matches!(self, Schema::Person | Schema::Tally)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub schema: Schema,
    pub entries: Vec<RaffleEntry>,
}

impl Dataset {
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Default,
    File,
    Sheet,
}

impl DataSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Default => "default",
            DataSource::File => "file",
            DataSource::Sheet => "sheet",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "default" => Ok(DataSource::Default),
            "file" => Ok(DataSource::File),
            "sheet" => Ok(DataSource::Sheet),
            other => Err(format!("unknown data source: {}", other)),
        }
    }
}

/// Outcome of a successful load, shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub tickets: u64,
    pub sellers: usize,
    pub source: DataSource,
    pub last_updated: String,
}

impl LoadSummary {
    pub fn message(&self) -> String {
        format!("Loaded {} tickets from {} sellers", self.tickets, self.sellers)
    }
}
