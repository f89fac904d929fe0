//! Order domain types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// File extension given to downloaded print files
pub const GCODE_EXTENSION: &str = "gcode";

/// A print job published by the order API
///
/// Identity is `id`. The status is only ever advanced through the order API
/// after the file at `location` has been downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Order {
    pub id: i64,
    /// Also the file name of the downloaded print file, so it must be a
    /// single plain path segment
    #[serde(deserialize_with = "deserialize_file_name")]
    pub name: String,
    pub location: Url,
    pub status: OrderStatus,
}

impl Order {
    /// Path the order's print file is written to inside `destination`
    ///
    /// The file is named after the order: `<destination>/<name>.gcode`.
    /// Returns `None` if the name would place the file anywhere else.
    pub fn gcode_path(&self, destination: &Path) -> Option<PathBuf> {
        is_plain_file_name(&self.name)
            .then(|| destination.join(format!("{}.{}", self.name, GCODE_EXTENSION)))
    }
}

/// Whether `name` is exactly one normal path segment (no separators, no
/// `..`, no root or drive prefix)
pub fn is_plain_file_name(name: &str) -> bool {
    if name.contains(['/', '\\']) {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn deserialize_file_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    if is_plain_file_name(&name) {
        Ok(name)
    } else {
        Err(serde::de::Error::custom(format!(
            "order name '{}' is not a plain file name",
            name
        )))
    }
}

/// Order status as understood by the order API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum OrderStatus {
    /// Waiting to be picked up by a printer
    Pending,
    /// Downloaded by a printer
    Sent,
}

impl OrderStatus {
    /// Wire representation of the status
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the known status literals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status '{0}', expected 'pending' or 'sent'")]
pub struct ParseOrderStatusError(pub String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = ParseOrderStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<OrderStatus> for &'static str {
    fn from(status: OrderStatus) -> Self {
        status.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_payload() -> serde_json::Value {
        json!([
            {"id": 1, "name": "a", "location": "http://x/a.gcode", "status": "pending"},
            {"id": 2, "name": "benchy", "location": "https://files.example.com/benchy.gcode", "status": "sent"}
        ])
    }

    #[test]
    fn test_deserialize_order_list() {
        let orders: Vec<Order> = serde_json::from_value(sample_payload()).unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, 1);
        assert_eq!(orders[0].name, "a");
        assert_eq!(orders[0].location.as_str(), "http://x/a.gcode");
        assert_eq!(orders[0].status, OrderStatus::Pending);
        assert_eq!(orders[1].id, 2);
        assert_eq!(orders[1].status, OrderStatus::Sent);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let payload = r#"[{"id": 1, "name": "a", "location": "http://x/a.gcode", "status": "printing"}]"#;
        let err = serde_json::from_str::<Vec<Order>>(payload).unwrap_err();
        assert!(err.to_string().contains("unknown order status"));

        // Literals are case sensitive
        let payload = r#"{"id": 1, "name": "a", "location": "http://x/a.gcode", "status": "PENDING"}"#;
        assert!(serde_json::from_str::<Order>(payload).is_err());
    }

    #[test]
    fn test_invalid_location_is_rejected() {
        let payload = r#"{"id": 1, "name": "a", "location": "not a url", "status": "pending"}"#;
        assert!(serde_json::from_str::<Order>(payload).is_err());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let payload = r#"{"id": 1, "location": "http://x/a.gcode", "status": "pending"}"#;
        let err = serde_json::from_str::<Order>(payload).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let payload = r#"{"id": 1, "name": "a", "location": "http://x/a.gcode", "status": "pending", "price": 3}"#;
        assert!(serde_json::from_str::<Order>(payload).is_err());
    }

    #[test]
    fn test_status_round_trips_through_wire_literal() {
        assert_eq!("pending".parse::<OrderStatus>().unwrap(), OrderStatus::Pending);
        assert_eq!(OrderStatus::Sent.to_string(), "sent");
        assert_eq!(serde_json::to_value(OrderStatus::Sent).unwrap(), json!("sent"));
        assert_eq!(
            "done".parse::<OrderStatus>(),
            Err(ParseOrderStatusError("done".to_string()))
        );
    }

    #[test]
    fn test_gcode_path() {
        let order: Order = serde_json::from_value(json!(
            {"id": 7, "name": "bracket", "location": "http://x/b", "status": "pending"}
        ))
        .unwrap();

        assert_eq!(
            order.gcode_path(Path::new("/srv/watched")),
            Some(PathBuf::from("/srv/watched/bracket.gcode"))
        );
    }

    #[test]
    fn test_names_leaving_destination_are_rejected() {
        for name in ["/etc/x", "../x", "..", ".", "", "nested/x", "nested\\x", "x/"] {
            let payload = json!(
                {"id": 1, "name": name, "location": "http://x/a", "status": "pending"}
            );
            let err = serde_json::from_value::<Order>(payload).unwrap_err();
            assert!(err.to_string().contains("not a plain file name"), "{name}");
        }
    }

    #[test]
    fn test_gcode_path_refuses_escaping_name() {
        let mut order: Order = serde_json::from_value(json!(
            {"id": 7, "name": "bracket", "location": "http://x/b", "status": "pending"}
        ))
        .unwrap();

        for name in ["/etc/cron.d/evil", "../evil"] {
            order.name = name.to_string();
            assert_eq!(order.gcode_path(Path::new("/srv/watched")), None, "{name}");
        }
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("benchy"));
        assert!(is_plain_file_name("benchy v2 (0.2mm)"));
        assert!(is_plain_file_name("part.final"));
        assert!(!is_plain_file_name("a/b"));
    }
}
