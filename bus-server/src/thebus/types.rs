//! JSON response DTOs.
//!
//! The service encodes almost everything as strings, but numbers and booleans
//! turn up in places, so every field is read leniently: missing, `null`,
//! empty, or unrecognised values become `None` rather than errors.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Response from the route search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoutesResponse {
    #[serde(default, deserialize_with = "nullable_list")]
    pub route: Vec<RouteEntry>,
}

/// One trip pattern in a route search response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    #[serde(default, deserialize_with = "text")]
    pub route_num: Option<String>,

    #[serde(default, rename = "shapeID", deserialize_with = "text")]
    pub shape_id: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub first_stop: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub headsign: Option<String>,
}

/// Response from the arrivals endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArrivalsResponse {
    #[serde(default, deserialize_with = "text")]
    pub stop: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub timestamp: Option<String>,

    #[serde(default, deserialize_with = "nullable_list")]
    pub arrivals: Vec<ArrivalEntry>,
}

/// One arrival in an arrivals response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrivalEntry {
    #[serde(default, deserialize_with = "text")]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub trip: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub route: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub headsign: Option<String>,

    /// Fleet number, or `???` when no vehicle is assigned yet.
    #[serde(default, deserialize_with = "text")]
    pub vehicle: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub direction: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub stop_time: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub date: Option<String>,

    #[serde(default, deserialize_with = "flag")]
    pub estimated: bool,

    #[serde(default, deserialize_with = "flag")]
    pub canceled: bool,

    #[serde(default, deserialize_with = "text")]
    pub latitude: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub longitude: Option<String>,

    #[serde(default, deserialize_with = "text")]
    pub shape: Option<String>,
}

/// The service's error message, if `value` is an object carrying one.
pub fn service_error_message(value: &Value) -> Option<String> {
    value
        .get("errorMessage")
        .cloned()
        .and_then(value_text)
}

fn value_text(value: Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(value_text))
}

fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        ),
        _ => false,
    })
}

fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn route_entries_deserialize() {
        let value = json!({
            "route": [
                {"routeNum": "2", "shapeID": "20059", "firstStop": "KAPAHULU AV + PAKI AV", "headsign": "WAIKIKI"},
                {"routeNum": 2, "headsign": "SCHOOL STREET", "extra": "ignored"}
            ]
        });
        let resp: RoutesResponse = serde_json::from_value(value).unwrap();
        assert_eq!(resp.route.len(), 2);
        assert_eq!(resp.route[0].shape_id.as_deref(), Some("20059"));
        assert_eq!(resp.route[1].route_num.as_deref(), Some("2"));
        assert_eq!(resp.route[1].shape_id, None);
    }

    #[test]
    fn null_route_list_is_empty() {
        let resp: RoutesResponse = serde_json::from_value(json!({"route": null})).unwrap();
        assert!(resp.route.is_empty());
        let resp: RoutesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(resp.route.is_empty());
    }

    #[test]
    fn flags_accept_strings_numbers_and_bools() {
        let value = json!({
            "arrivals": [
                {"estimated": "1", "canceled": "0"},
                {"estimated": 1, "canceled": true},
                {"estimated": false},
                {}
            ]
        });
        let resp: ArrivalsResponse = serde_json::from_value(value).unwrap();
        let flags: Vec<(bool, bool)> = resp
            .arrivals
            .iter()
            .map(|a| (a.estimated, a.canceled))
            .collect();
        assert_eq!(
            flags,
            vec![(true, false), (true, true), (false, false), (false, false)]
        );
    }

    #[test]
    fn blank_and_null_text_is_none() {
        let value = json!({"arrivals": [{"direction": "  ", "date": "null", "route": null}]});
        let resp: ArrivalsResponse = serde_json::from_value(value).unwrap();
        let a = &resp.arrivals[0];
        assert_eq!(a.direction, None);
        assert_eq!(a.date, None);
        assert_eq!(a.route, None);
    }

    #[test]
    fn detects_service_error() {
        assert_eq!(
            service_error_message(&json!({"errorMessage": "bad route"})).as_deref(),
            Some("bad route")
        );
        assert_eq!(service_error_message(&json!({"errorMessage": ""})), None);
        assert_eq!(service_error_message(&json!({"route": []})), None);
        assert_eq!(service_error_message(&json!([1, 2])), None);
    }
}
