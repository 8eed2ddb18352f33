use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Health check used by the REST server's `/health` route.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance.
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Ward records are alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_is_ok() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert_eq!(res.message, "Ward records are alive");
    }
}
