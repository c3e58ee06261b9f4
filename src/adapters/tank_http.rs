//! HTTP tank-level adapter.
//!
//! Implements [`TankPort`] by fetching the tank controller's status page
//! with a blocking client and handing the body to
//! [`parse_tank_page`](crate::sensors::tank::parse_tank_page).  The client
//! carries a hard timeout so a hung controller cannot stall the poll loop
//! for longer than `tank_timeout_secs`.

use std::time::Duration;

use chrono::Local;
use reqwest::blocking::Client;

use crate::app::ports::TankPort;
use crate::app::state::TankReading;
use crate::config::SystemConfig;
use crate::error::TankError;
use crate::sensors::tank::{TankGeometry, parse_tank_page};

#[derive(Debug, Clone)]
pub struct HttpTankAdapter {
    client: Client,
    url: String,
    depth_label: String,
    geometry: TankGeometry,
}

impl HttpTankAdapter {
    pub fn new(config: &SystemConfig) -> Result<Self, TankError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.tank_timeout_secs))
            .build()
            .map_err(|e| TankError::Http(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            url: config.tank_url.trim().to_string(),
            depth_label: config.tank_depth_label.clone(),
            geometry: TankGeometry::from_config(config),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }
}

impl TankPort for HttpTankAdapter {
    fn fetch_tank(&mut self) -> Result<TankReading, TankError> {
        if !self.is_configured() {
            return Err(TankError::NotConfigured);
        }
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| TankError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TankError::Status(status.as_u16()));
        }
        let body = response
            .text()
            .map_err(|e| TankError::Http(format!("body read failed: {e}")))?;
        let page = parse_tank_page(&body, &self.depth_label)?;
        Ok(self.geometry.reading(&page, Local::now()))
    }
}
