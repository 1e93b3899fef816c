use once_cell::sync::Lazy;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::entities::{route_key, Request, Response, RouteHandler, Router};

static STARTED: Lazy<Instant> = Lazy::new(Instant::now);

/// Liveness endpoint: `GET {base}/health`
pub struct HealthRouter {
    base_path: String,
}

impl HealthRouter {
    pub fn new(base_path: impl Into<String>) -> Self {
        Lazy::force(&STARTED);
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Router for HealthRouter {
    fn base_path(&self) -> &str {
        &self.base_path
    }

    fn routes(&self) -> Vec<(String, RouteHandler)> {
        let health: RouteHandler = Arc::new(|_req: &Request, res: &mut Response| {
            res.status(200).json(json!({
                "status": "ok",
                "uptime_secs": STARTED.elapsed().as_secs(),
            }));
        });
        vec![(route_key("GET", &self.base_path, "/health"), health)]
    }
}

pub fn health(base_path: String) -> Arc<dyn Router> {
    Arc::new(HealthRouter::new(base_path))
}
