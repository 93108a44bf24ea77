//! Deserializers for identifier fields that the wire format declares as
//! strings but some implementations send as numbers.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(v: StringOrNumber) -> Self {
        match v {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
            StringOrNumber::UInt(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    StringOrNumber::deserialize(deserializer).map(String::from)
}

pub(crate) fn option_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<StringOrNumber>::deserialize(deserializer)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "string")]
        id: String,
        #[serde(default, deserialize_with = "option_string")]
        size: Option<String>,
    }

    #[test]
    fn accepts_strings_and_numbers() {
        let p: Probe = serde_json::from_value(json!({"id": "42", "size": 10})).unwrap();
        assert_eq!(p.id, "42");
        assert_eq!(p.size.as_deref(), Some("10"));

        let p: Probe = serde_json::from_value(json!({"id": 998})).unwrap();
        assert_eq!(p.id, "998");
        assert!(p.size.is_none());
    }

    #[test]
    fn null_option_is_none() {
        let p: Probe = serde_json::from_value(json!({"id": "1", "size": null})).unwrap();
        assert!(p.size.is_none());
    }

    #[test]
    fn rejects_objects() {
        let r: Result<Probe, _> = serde_json::from_value(json!({"id": {"x": 1}}));
        assert!(r.is_err());
    }
}
