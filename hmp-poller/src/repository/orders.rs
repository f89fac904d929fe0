//! Orders repository
//!
//! Handles communication with the order API for order-related operations:
//! - Fetching pending orders
//! - Downloading an order's print file
//! - Updating order status

use async_trait::async_trait;
use hmp_client::{ApiClient, ClientError, Result};
use hmp_core::domain::order::{Order, OrderStatus};
use hmp_core::dto::order::UpdateOrderStatus;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Repository trait for order-related operations with the order API
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Fetches the orders waiting to be printed
    ///
    /// Fails with a deserialization error if the API answers with anything
    /// other than a list of well-formed orders.
    async fn get_pending_orders(&self) -> Result<Vec<Order>>;

    /// Updates the status of an order
    ///
    /// The API's answer is not inspected; only a failure to reach the API is
    /// reported.
    ///
    /// # Arguments
    /// * `id` - The ID of the order to update
    /// * `status` - The new status
    async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<()>;

    /// Downloads an order's print file into `destination`
    ///
    /// The file is written to `<destination>/<name>.gcode`, replacing any
    /// previous file of that name.
    ///
    /// # Returns
    /// The path of the written file
    async fn download_order(&self, order: &Order, destination: &Path) -> Result<PathBuf>;
}

/// Order API implementation of OrderRepository
#[derive(Debug, Clone)]
pub struct ApiOrderRepository {
    client: ApiClient,
}

impl ApiOrderRepository {
    /// Creates a new order repository
    ///
    /// # Arguments
    /// * `server` - Base URL of the order API (e.g., "http://localhost:3000")
    /// * `api_key` - Key sent as bearer token
    pub fn new(server: &str, api_key: &str) -> Result<Self> {
        Ok(Self::with_client(ApiClient::new(server, api_key)?))
    }

    /// Creates a repository over an existing client
    pub fn with_client(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrderRepository for ApiOrderRepository {
    async fn get_pending_orders(&self) -> Result<Vec<Order>> {
        let response = self.client.get("orders/?status=pending").await?;
        let body = response.bytes().await?;

        let orders: Vec<Order> = serde_json::from_slice(&body)?;
        debug!("Fetched {} pending order(s)", orders.len());

        Ok(orders)
    }

    async fn update_order_status(&self, id: i64, status: OrderStatus) -> Result<()> {
        let response = self
            .client
            .patch(&format!("orders/{}/", id), &UpdateOrderStatus { status })
            .await?;

        debug!(
            "Status update of order {} to '{}' answered {}",
            id,
            status,
            response.status()
        );

        Ok(())
    }

    async fn download_order(&self, order: &Order, destination: &Path) -> Result<PathBuf> {
        let path = order
            .gcode_path(destination)
            .ok_or_else(|| ClientError::InvalidFileName(order.name.clone()))?;
        self.client.download(&order.location, &path).await?;

        Ok(path)
    }
}
