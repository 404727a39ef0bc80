pub mod analytics;
pub mod plans;
pub mod returns;
pub mod search;

use navsim_core::nav::SchemeMeta;
use serde_json::Value;

/// Attach the scheme's descriptive fields to a calculator envelope.
pub(crate) fn with_scheme(
    mut value: Value,
    meta: &SchemeMeta,
) -> Result<Value, Box<dyn std::error::Error>> {
    if let Value::Object(ref mut map) = value {
        map.insert("scheme".to_string(), serde_json::to_value(meta)?);
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scheme_attached_to_envelope() {
        let meta = SchemeMeta {
            scheme_code: "120503".into(),
            scheme_name: "Example Fund".into(),
            ..Default::default()
        };
        let value = with_scheme(json!({"result": {}}), &meta).unwrap();
        assert_eq!(value["scheme"]["scheme_code"], "120503");
    }
}
