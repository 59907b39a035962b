use std::fmt;

use thiserror::Error;

/// Stage of the lookup chain, used to label failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    IpLookup,
    Geolocation,
    Weather,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::IpLookup => "public IP address",
            Step::Geolocation => "coordinates",
            Step::Weather => "weather",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    /// Transport failure, or a non-success status from the IP or geolocation service.
    #[error("Failed to retrieve {step}: {detail}")]
    Network { step: Step, detail: String },

    /// The geolocation body did not hold a usable coordinate pair.
    #[error("Failed to retrieve coordinates: {0}")]
    Geolocation(String),

    #[error("Error: {status}, {status_text}")]
    WeatherProvider { status: u16, status_text: String },

    /// A response arrived but its body could not be understood.
    #[error("Unexpected {step} response: {detail}")]
    Parse { step: Step, detail: String },
}

impl LookupError {
    pub fn network(step: Step, detail: impl fmt::Display) -> Self {
        LookupError::Network {
            step,
            detail: detail.to_string(),
        }
    }

    pub fn parse(step: Step, detail: impl fmt::Display) -> Self {
        LookupError::Parse {
            step,
            detail: detail.to_string(),
        }
    }

    /// The stage that produced this error.
    pub fn step(&self) -> Step {
        match self {
            LookupError::Network { step, .. } | LookupError::Parse { step, .. } => *step,
            LookupError::Geolocation(_) => Step::Geolocation,
            LookupError::WeatherProvider { .. } => Step::Weather,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_message_names_the_step() {
        let err = LookupError::network(Step::IpLookup, "HTTP 500 Internal Server Error");
        assert_eq!(
            err.to_string(),
            "Failed to retrieve public IP address: HTTP 500 Internal Server Error"
        );
        assert_eq!(err.step(), Step::IpLookup);
    }

    #[test]
    fn weather_provider_message_has_status() {
        let err = LookupError::WeatherProvider {
            status: 401,
            status_text: "Unauthorized".into(),
        };
        assert_eq!(err.to_string(), "Error: 401, Unauthorized");
        assert_eq!(err.step(), Step::Weather);
    }
}
