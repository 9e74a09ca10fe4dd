//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use oauth2_service::config::AppConfig;
use oauth2_service::di::{self, Container};
use tracing_subscriber::fmt::MakeWriter;

/// Container with the default registrations, configured from `vars` instead of
/// the process environment.
pub fn container_with_env(vars: &[(&str, &str)]) -> Arc<Container> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut container = Container::new();
    di::register_with(&mut container, move || {
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    });
    Arc::new(container)
}

/// Test configuration bound to an ephemeral loopback port.
pub fn test_container() -> Arc<Container> {
    container_with_env(&[
        ("APP_ENV", "test"),
        ("HOST", "127.0.0.1"),
        ("PORT", "0"),
        ("SERVICE_NAME", "oauth2-test"),
        ("LOG_LEVEL", "warn"),
    ])
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// In-memory log sink; every writer it hands out appends to the same buffer.
#[derive(Clone, Default)]
pub struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    /// Captured output parsed as JSON, one value per line.
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
