use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::client::FleetClient;
use crate::controller::FetchTicket;
use crate::envelope::PageEnvelope;
use crate::error::ConsoleError;
use crate::models::{Driver, Maintenance, Trip, Vehicle};

pub const VEHICLES_PATH: &str = "api/vehicles";
pub const DRIVERS_PATH: &str = "api/drivers";
pub const TRIPS_PATH: &str = "api/trips";
pub const MAINTENANCES_PATH: &str = "api/maintenances";

/// One CRUD collection of the back-office API.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    client: FleetClient,
    path: &'static str,
    _row: PhantomData<fn() -> T>,
}

impl<T> Resource<T> {
    pub fn new(client: FleetClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _row: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.path, id)
    }
}

impl<T> Resource<T>
where
    T: DeserializeOwned + Serialize,
{
    /// Fetches the page described by `ticket`.
    pub async fn list_page(&self, ticket: &FetchTicket) -> Result<PageEnvelope<T>, ConsoleError> {
        let body: serde_json::Value = self
            .client
            .get_json(self.path, &ticket.query_pairs())
            .await?;
        PageEnvelope::from_value(body)
    }

    pub async fn get(&self, id: &str) -> Result<T, ConsoleError> {
        self.client.get_json(&self.item_path(id), &[]).await
    }

    pub async fn create(&self, row: &T) -> Result<T, ConsoleError> {
        self.client.post_json(self.path, row).await
    }

    pub async fn update(&self, id: &str, row: &T) -> Result<T, ConsoleError> {
        self.client
            .put_json(&self.item_path(id), Some(row), &[])
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), ConsoleError> {
        self.client.delete(&self.item_path(id)).await
    }

    /// PUT `/{id}/{action}` carrying only query parameters.
    async fn action(
        &self,
        id: &str,
        action: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ConsoleError> {
        let path = format!("{}/{}", self.item_path(id), action);
        self.client.put_json::<(), T>(&path, None, &query).await
    }
}

fn optional_param(name: &str, value: Option<&str>) -> Option<(String, String)> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| (name.to_string(), v.to_string()))
}

impl Resource<Trip> {
    pub async fn complete_trip(
        &self,
        id: &str,
        end_mileage: f64,
        notes: Option<&str>,
    ) -> Result<Trip, ConsoleError> {
        let mut query = vec![("endMileage".to_string(), end_mileage.to_string())];
        query.extend(optional_param("notes", notes));
        self.action(id, "complete", query).await
    }
}

impl Resource<Maintenance> {
    pub async fn start_maintenance(&self, id: &str) -> Result<Maintenance, ConsoleError> {
        self.action(id, "start", Vec::new()).await
    }

    pub async fn complete_maintenance(
        &self,
        id: &str,
        final_cost: Option<f64>,
        notes: Option<&str>,
    ) -> Result<Maintenance, ConsoleError> {
        let mut query: Vec<(String, String)> = final_cost
            .map(|c| ("finalCost".to_string(), c.to_string()))
            .into_iter()
            .collect();
        query.extend(optional_param("notes", notes));
        self.action(id, "complete", query).await
    }

    pub async fn cancel_maintenance(
        &self,
        id: &str,
        reason: Option<&str>,
    ) -> Result<Maintenance, ConsoleError> {
        let query = optional_param("reason", reason).into_iter().collect();
        self.action(id, "cancel", query).await
    }
}

impl FleetClient {
    pub fn vehicles(&self) -> Resource<Vehicle> {
        Resource::new(self.clone(), VEHICLES_PATH)
    }

    pub fn drivers(&self) -> Resource<Driver> {
        Resource::new(self.clone(), DRIVERS_PATH)
    }

    pub fn trips(&self) -> Resource<Trip> {
        Resource::new(self.clone(), TRIPS_PATH)
    }

    pub fn maintenances(&self) -> Resource<Maintenance> {
        Resource::new(self.clone(), MAINTENANCES_PATH)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_resource_paths() {
        let client = FleetClient::new("http://localhost:8080", Duration::from_secs(5)).unwrap();
        assert_eq!(client.vehicles().path(), "api/vehicles");
        assert_eq!(client.maintenances().path(), "api/maintenances");
        assert_eq!(client.drivers().item_path("d-7"), "api/drivers/d-7");
    }

    #[test]
    fn test_optional_params_skip_blank() {
        assert_eq!(optional_param("notes", Some("  ")), None);
        assert_eq!(optional_param("notes", None), None);
        assert_eq!(
            optional_param("reason", Some(" parts late ")),
            Some(("reason".to_string(), "parts late".to_string()))
        );
    }
}
