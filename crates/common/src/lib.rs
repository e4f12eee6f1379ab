//! Shared helpers for the heroes workspace: logging setup, wire types and the
//! Prometheus text encoder used by the `/metrics` route.

pub mod types;
pub mod metrics;
pub mod utils {
    pub mod logging;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
