use crate::model::Transaction;
use crate::Result;
use anyhow::Context;
use std::io::Write;

pub const CSV_HEADERS: [&str; 5] = ["Date", "Description", "Category", "Type", "Amount"];

/// Writes `transactions` as CSV in list order. Fields are never quoted, so a description holding
/// a comma shifts the columns of its row.
pub fn export_csv<'a, W: Write>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
    writer: W,
) -> Result<()> {
    let mut w = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    w.write_record(CSV_HEADERS)
        .context("Unable to write the CSV header")?;
    for t in transactions {
        let date = t.date_string();
        let r#type = t.r#type().to_string();
        let amount = t.amount().to_plain_string();
        w.write_record([
            date.as_str(),
            t.description(),
            t.category(),
            r#type.as_str(),
            amount.as_str(),
        ])
        .with_context(|| format!("Unable to write transaction {} as CSV", t.id()))?;
    }
    w.flush().context("Unable to flush CSV output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use chrono::NaiveDate;

    #[test]
    fn test_export_csv() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        let transactions = vec![
            Transaction::new(
                "kopi, susu",
                Amount::from(15_000),
                "Makanan",
                TransactionType::Expense,
                d,
            ),
            Transaction::new("gaji", Amount::from(8_000_000), "Gaji", TransactionType::Income, d),
        ];
        let mut buf = Vec::new();
        export_csv(&transactions, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Date,Description,Category,Type,Amount\n\
             07/03/2026,kopi, susu,Makanan,expense,15000\n\
             07/03/2026,gaji,Gaji,income,8000000\n"
        );
    }

    #[test]
    fn test_export_empty_list_writes_header() {
        let mut buf = Vec::new();
        export_csv(&[], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "Date,Description,Category,Type,Amount\n");
    }
}
