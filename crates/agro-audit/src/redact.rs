//! Redaction helpers for audit `details`.

use serde_json::Value;

/// Placeholder written in place of a sensitive value.
pub const REDACTED: &str = "[REDACTED]";

const SENSITIVE_KEYS: &[&str] = &["password", "token", "authorization", "secret", "cpf", "cnpj"];

/// `"[REDACTED]"` when the value was supplied, `null` otherwise.
pub fn redact_presence(present: bool) -> Value {
    if present {
        Value::String(REDACTED.to_string())
    } else {
        Value::Null
    }
}

/// Replace the values of sensitive keys, recursively, with [`REDACTED`].
pub fn sanitize_details(details: Value) -> Value {
    match details {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let lowered = key.to_ascii_lowercase();
                    if SENSITIVE_KEYS.contains(&lowered.as_str()) && !value.is_null() {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, sanitize_details(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_details).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn presence() {
        assert_eq!(redact_presence(true), json!("[REDACTED]"));
        assert_eq!(redact_presence(false), Value::Null);
    }

    #[test]
    fn sanitize_replaces_sensitive_keys_recursively() {
        let details = json!({
            "cpf": "529.982.247-25",
            "nome_produtor": "João",
            "nested": {"Password": "hunter2", "cnpj": null},
            "list": [{"token": "abc"}]
        });
        let clean = sanitize_details(details);
        assert_eq!(clean["cpf"], "[REDACTED]");
        assert_eq!(clean["nome_produtor"], "João");
        assert_eq!(clean["nested"]["Password"], "[REDACTED]");
        assert!(clean["nested"]["cnpj"].is_null());
        assert_eq!(clean["list"][0]["token"], "[REDACTED]");
    }
}
