// src/export.rs
//
// Table export in the Brazilian spreadsheet convention: semicolon delimiter,
// decimal comma, UTF-8 with byte-order mark, dates as ISO calendar strings.

use anyhow::Result;
use crate::analysis::assemble::AssembledRecord;
use crate::analysis::balance::BalanceRow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Serializes the assembled record table in display order.
pub fn records_csv(records: &[AssembledRecord]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record([
        "Data",
        "CO_NCM",
        "Produto",
        "País",
        "UF",
        "Valor FOB (US$)",
        "Peso (KG)",
    ])?;
    for record in records {
        writer.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.ncm.clone(),
            record.product.clone(),
            record.country.clone(),
            record.state.clone(),
            decimal_comma(record.fob),
            decimal_comma(record.kg),
        ])?;
    }

    finish(writer)
}

/// Serializes the consolidated per-product balance table.
pub fn balance_csv(rows: &[BalanceRow]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record([
        "CO_NCM",
        "Produto",
        "Exportação (US$)",
        "Importação (US$)",
        "Saldo (US$)",
    ])?;
    for row in rows {
        writer.write_record([
            row.ncm.clone(),
            row.product.clone(),
            decimal_comma(row.export),
            decimal_comma(row.import),
            decimal_comma(row.balance),
        ])?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to finish CSV export: {}", e))
}

fn decimal_comma(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn record_export_uses_regional_convention() {
        let records = vec![AssembledRecord {
            year: 2023,
            month: 4,
            ncm: "2709".to_string(),
            country_code: "249".to_string(),
            state: "RJ".to_string(),
            fob: 1234.5,
            kg: 10.0,
            product: "Petróleo".to_string(),
            country: "Estados Unidos".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
        }];

        let bytes = records_csv(&records).unwrap();
        assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Data;CO_NCM;Produto;País;UF;Valor FOB (US$);Peso (KG)"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2023-04-01;2709;Petróleo;Estados Unidos;RJ;1234,50;10,00"
        );
    }

    #[test]
    fn balance_export_keeps_signed_decimal_comma_values() {
        let rows = vec![BalanceRow {
            ncm: "8471".to_string(),
            product: "Máquinas".to_string(),
            export: 0.0,
            import: 80.25,
            balance: -80.25,
        }];

        let bytes = balance_csv(&rows).unwrap();
        let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with("0,00;80,25;-80,25"));
    }
}
