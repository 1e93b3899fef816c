use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Request as handed over by the HTTP layer
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub method: String,
    pub path: String,
    pub params: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }
}

/// Response filled in by a route handler
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Option<Value>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            headers: HashMap::new(),
            body: None,
        }
    }
}

impl Response {
    pub fn status(&mut self, status: u16) -> &mut Self {
        self.status = status;
        self
    }

    pub fn json(&mut self, body: Value) -> &mut Self {
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        self.body = Some(body);
        self
    }
}

/// Route handler signature
pub type RouteFn = dyn Fn(&Request, &mut Response) + Send + Sync;

pub type RouteHandler = Arc<RouteFn>;

/// A set of HTTP routes mounted under a base path.
///
/// The base path is decided by the loader from the router file's position
/// under `routes/`: empty at the root, `/<subdir>` otherwise.
pub trait Router: Send + Sync {
    fn base_path(&self) -> &str;

    /// Route identifier to handler
    fn routes(&self) -> Vec<(String, RouteHandler)>;
}

/// Conventional route identifier: `"GET /base/path"`.
pub fn route_key(method: &str, base_path: &str, path: &str) -> String {
    format!("{} {}{}", method.to_uppercase(), base_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_key() {
        assert_eq!(route_key("get", "/admin", "/users"), "GET /admin/users");
        assert_eq!(route_key("POST", "", "/health"), "POST /health");
    }

    #[test]
    fn test_response_json() {
        let mut res = Response::default();
        res.status(201).json(serde_json::json!({"ok": true}));

        assert_eq!(res.status, 201);
        assert_eq!(res.headers.get("content-type").map(String::as_str), Some("application/json"));
        assert!(res.body.is_some());
    }
}
