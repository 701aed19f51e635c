use crate::core::aggregate::aggregate_rows;
use crate::core::builder::build_dataset;
use crate::core::tokenizer::{classify_headers, tokenize};
use crate::domain::model::{Dataset, Schema, Tickets};
use crate::utils::error::Result;

/// Runs raw CSV text through tokenizing, grouping and sorting.
///
/// Unusable input (no data rows, no seller column, every row blank) yields an
/// empty dataset rather than an error; callers decide how to report that.
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let Some(table) = tokenize(text)? else {
        return Ok(Dataset::empty(Schema::Seller));
    };

    let columns = classify_headers(&table.headers);
    let Some(schema) = columns.schema() else {
        tracing::debug!("No seller column in headers {:?}", table.headers);
        return Ok(Dataset::empty(Schema::Seller));
    };

    if columns.positional {
        tracing::debug!("No seller header, using column {:?} as seller", columns.seller);
    }
    tracing::debug!("Detected {:?} layout: {:?}", schema, columns);

    let aggregation = aggregate_rows(&table.rows, &columns, schema);
    Ok(build_dataset(aggregation))
}

/// Writes a dataset back out in its own layout so that it parses to the same dataset.
pub fn write_csv(dataset: &Dataset) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    match dataset.schema {
        Schema::Seller => writer.write_record(["Ticket Number", "Seller"])?,
        Schema::Person => writer.write_record(["First Name", "Last Name", "Ticket Number"])?,
        Schema::Detailed => {
            writer.write_record(["Ticket Number", "First Name", "Last Name", "Seller"])?
        }
        Schema::Tally => {
            writer.write_record(["Last Name", "First Name", "Ticket Count", "Ticket Numbers"])?
        }
    }

    for entry in &dataset.entries {
        let first = entry.first_name.as_deref().unwrap_or("");
        match (&entry.tickets, dataset.schema) {
            (Tickets::Details { details }, _) => {
                if details.is_empty() {
                    writer.write_record(["", "", "", entry.seller.as_str()])?;
                }
                for d in details {
                    writer.write_record([
                        d.ticket_number.as_str(),
                        d.first_name.as_str(),
                        d.last_name.as_str(),
                        entry.seller.as_str(),
                    ])?;
                }
            }
            (Tickets::Tally { count, label }, _) => {
                writer.write_record([
                    entry.seller.as_str(),
                    first,
                    count.to_string().as_str(),
                    label.as_deref().unwrap_or(""),
                ])?;
            }
            (Tickets::Numbers { numbers }, schema) => {
                let row = |ticket: &str| -> Vec<String> {
                    match schema {
                        Schema::Person => {
                            vec![first.to_string(), entry.seller.clone(), ticket.to_string()]
                        }
                        _ => vec![ticket.to_string(), entry.seller.clone()],
                    }
                };
                if numbers.is_empty() {
                    writer.write_record(row(""))?;
                }
                for number in numbers {
                    writer.write_record(row(number))?;
                }
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| crate::utils::error::RaffleError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::total_tickets;

    const SAMPLE: &str = "Ticket Number,Seller\n1001,Smith\n1002,Smith\n1003,Garcia\n";

    #[test]
    fn test_parse_worked_example() {
        let dataset = parse_csv(SAMPLE).unwrap();

        assert_eq!(dataset.schema, Schema::Seller);
        assert_eq!(dataset.len(), 2);

        let garcia = &dataset.entries[0];
        assert_eq!(garcia.seller, "Garcia");
        assert_eq!(garcia.ticket_count, 1);
        assert_eq!(garcia.tickets.ticket_numbers(), vec!["1003"]);

        let smith = &dataset.entries[1];
        assert_eq!(smith.seller, "Smith");
        assert_eq!(smith.ticket_count, 2);
        assert_eq!(smith.tickets.ticket_numbers(), vec!["1001", "1002"]);
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        assert!(parse_csv("Ticket Number,Seller").unwrap().is_empty());
        assert!(parse_csv("Ticket Number,Seller\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_without_seller_column_is_empty() {
        assert!(parse_csv("Ticket Number\n1001\n").unwrap().is_empty());
        assert!(parse_csv("Name\nSmith\n").unwrap().is_empty());
    }

    #[test]
    fn test_unnamed_seller_column_next_to_ticket_number() {
        let dataset = parse_csv("Ticket Number,Name\n1002,Okafor\n1001,okafor\n").unwrap();

        assert_eq!(dataset.schema, Schema::Seller);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.entries[0].seller, "Okafor");
        assert_eq!(dataset.entries[0].tickets.ticket_numbers(), vec!["1001", "1002"]);
    }

    #[test]
    fn test_tickets_purchased_header_is_a_tally() {
        let dataset = parse_csv("Last Name,First Name,Tickets Purchased\nSmith,John,5\n").unwrap();

        assert_eq!(dataset.schema, Schema::Tally);
        assert_eq!(dataset.entries[0].display_name(), "John Smith");
        assert_eq!(dataset.entries[0].ticket_count, 5);
        assert_eq!(total_tickets(&dataset.entries), 5);
    }

    #[test]
    fn test_total_tickets_counts_non_blank_tickets_with_seller() {
        let csv = "Ticket Number,Seller\n1001,Smith\n,Smith\n1002,\n1003,Lee\n1004,lee\n";
        let dataset = parse_csv(csv).unwrap();

        // 1001, 1003, 1004: the blank ticket and the row without a seller contribute nothing.
        assert_eq!(total_tickets(&dataset.entries), 3);
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn test_positional_columns() {
        let dataset = parse_csv("id,who\n7,Patel\n3,Patel\n").unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.entries[0].tickets.ticket_numbers(), vec!["3", "7"]);
    }

    #[test]
    fn test_round_trip_is_stable_for_each_layout() {
        let inputs = [
            SAMPLE.to_string(),
            "Ticket Number,Seller\n,Nguyen\n9,abc\n".to_string(),
            "First Name,Last Name,Ticket Number\nJohn,Smith,1002\nSarah,Smith,1006\njohn,smith,1001\n"
                .to_string(),
            "Ticket Number,First Name,Last Name,Seller\n5,Ana,Lopez,smith\n2,Bo,Kim,GARCIA\n"
                .to_string(),
            "Last Name,First Name,Ticket Count,Ticket Numbers\nBrown,David,4,1021-1024\nbrown,david,3,1025-1027\n"
                .to_string(),
        ];

        for input in inputs {
            let first = parse_csv(&input).unwrap();
            let written = write_csv(&first).unwrap();
            let second = parse_csv(&written).unwrap();
            assert_eq!(first, second, "round trip changed dataset for:\n{}", input);
        }
    }

    #[test]
    fn test_tally_label_survives_commas() {
        let input = "Last Name,First Name,Ticket Count,Ticket Numbers\nBrown,David,4,1021-1024\nbrown,david,3,1025-1027\n";
        let dataset = parse_csv(input).unwrap();
        let written = write_csv(&dataset).unwrap();

        assert!(written.contains("\"1021-1024, 1025-1027\""));
        assert_eq!(dataset.entries[0].ticket_count, 7);
    }
}
