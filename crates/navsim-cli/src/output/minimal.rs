use serde_json::Value;

/// Headline figure per command, first present wins: plan value, portfolio
/// value, return figures, then row counts for peers and search.
const HEADLINE_KEYS: [&str; 6] = [
    "current_value",
    "total_value",
    "annualized_return_pct",
    "simple_return_pct",
    "total_gain_loss_pct",
    "count",
];

/// Print the single figure a script is most likely to want.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(fields) = result else {
        return scalar(result);
    };
    if let Some(figure) = HEADLINE_KEYS
        .iter()
        .filter_map(|key| fields.get(*key))
        .find(|v| !v.is_null())
    {
        return scalar(figure);
    }
    match fields.iter().next() {
        Some((key, val)) => format!("{key}: {}", scalar(val)),
        None => String::new(),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
