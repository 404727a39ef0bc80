use serde_json::{Map, Value};
use std::io::{self, Write};

/// Event, period, scheme or holding rows as CSV; otherwise `field,value`
/// pairs of the result.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), value) {
        eprintln!("CSV output error: {e}");
    }
}

fn write_csv<W: Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match super::row_array(result) {
                Some((_, rows)) => write_rows(&mut wtr, rows)?,
                None => write_fields(&mut wtr, result)?,
            },
            _ => write_fields(&mut wtr, map)?,
        },
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        other => wtr.write_record([cell(other)])?,
    }
    wtr.flush()?;
    Ok(())
}

fn write_fields<W: Write>(
    wtr: &mut csv::Writer<W>,
    fields: &Map<String, Value>,
) -> csv::Result<()> {
    wtr.write_record(["field", "value"])?;
    for (key, val) in fields {
        wtr.write_record([key.as_str(), &cell(val)])?;
    }
    Ok(())
}

/// Columns come from the first row; later rows missing a column get a blank.
fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let Some(Value::Object(first)) = rows.first() else {
        for row in rows {
            wtr.write_record([cell(row)])?;
        }
        return Ok(());
    };

    let columns: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    wtr.write_record(&columns)?;
    for row in rows {
        if let Value::Object(map) = row {
            let record: Vec<String> = columns
                .iter()
                .map(|c| map.get(*c).map(cell).unwrap_or_default())
                .collect();
            wtr.write_record(&record)?;
        }
    }
    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
