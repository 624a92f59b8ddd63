//! Request types for soil readings

use crate::error::ServiceError;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One sensor submission as posted by the field device
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSubmission {
    pub sensor_id: String,
    pub fertility: f64,
    pub moisture: f64,
    pub ph: f64,
    pub temperature: f64,
    pub sunlight: f64,
    pub humidity: f64,
    pub interpretation: String,
    /// When the sensor took the sample; defaults to the submission time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ReadingSubmission {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.sensor_id.trim().is_empty() {
            return Err(ServiceError::invalid("sensorId must not be empty"));
        }
        if self.interpretation.trim().is_empty() {
            return Err(ServiceError::invalid("interpretation must not be empty"));
        }

        let values = [
            ("fertility", self.fertility),
            ("moisture", self.moisture),
            ("ph", self.ph),
            ("temperature", self.temperature),
            ("sunlight", self.sunlight),
            ("humidity", self.humidity),
        ];
        if let Some((field, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ServiceError::invalid(format!("{} must be a finite number", field)));
        }

        check_range("ph", self.ph, 0.0, 14.0)?;
        check_range("moisture", self.moisture, 0.0, 100.0)?;
        check_range("humidity", self.humidity, 0.0, 100.0)
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ServiceError> {
    if !(min..=max).contains(&value) {
        return Err(ServiceError::invalid(format!(
            "{} must be within [{}, {}]",
            field, min, max
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_submission(sensor_id: &str) -> ReadingSubmission {
    ReadingSubmission {
        sensor_id: sensor_id.to_string(),
        fertility: 42.0,
        moisture: 35.5,
        ph: 6.8,
        temperature: 27.3,
        sunlight: 810.0,
        humidity: 71.0,
        interpretation: "Slightly acidic, adequate moisture".to_string(),
        created_at: None,
    }
}
