//! Order DTOs for the order API

use serde::{Deserialize, Serialize};

use crate::domain::order::OrderStatus;

/// Body of the status update sent once an order's file has been retrieved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderStatus {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_body_uses_wire_literal() {
        let body = serde_json::to_string(&UpdateOrderStatus {
            status: OrderStatus::Sent,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"sent"}"#);
    }
}
