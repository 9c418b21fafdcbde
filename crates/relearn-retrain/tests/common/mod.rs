//! Shared test helpers: an in-memory transport that replays scripted responses.

#![allow(dead_code)]

use async_trait::async_trait;
use relearn_abstraction::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use relearn_retrain::{JobStatus, ManualClock};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const JOBS_URL: &str = "https://svc.test/workspaces/w/services/s/jobs";
pub const ENDPOINT_URL: &str = "https://mgmt.test/workspaces/w/webservices/p/endpoints/update";
pub const RETRAIN_KEY: &str = "retrain-key";
pub const ENDPOINT_KEY: &str = "endpoint-key";

#[derive(Default)]
struct Route {
    queue: VecDeque<HttpResponse>,
    fallback: Option<HttpResponse>,
}

/// Replays responses per HTTP method, in the order they were scripted.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<HttpMethod, Route>>,
    requests: Mutex<Vec<HttpRequest>>,
    latency: Option<(Arc<ManualClock>, Mutex<VecDeque<Duration>>)>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `response` for the next unanswered request with `method`.
    pub fn respond(self, method: HttpMethod, response: HttpResponse) -> Self {
        self.routes.lock().unwrap().entry(method).or_default().queue.push_back(response);
        self
    }

    /// Answer every request with `method` using `response` once its queue is empty.
    pub fn always(self, method: HttpMethod, response: HttpResponse) -> Self {
        self.routes.lock().unwrap().entry(method).or_default().fallback = Some(response);
        self
    }

    /// Advance `clock` by the next duration in `delays` on every request.
    pub fn with_latency(mut self, clock: Arc<ManualClock>, delays: Vec<Duration>) -> Self {
        self.latency = Some((clock, Mutex::new(delays.into())));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod) -> usize {
        self.requests.lock().unwrap().iter().filter(|r| r.method == method).count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = request.method;
        self.requests.lock().unwrap().push(request);

        if let Some((clock, delays)) = &self.latency {
            if let Some(delay) = delays.lock().unwrap().pop_front() {
                clock.advance(delay);
            }
        }

        let mut routes = self.routes.lock().unwrap();
        let route = routes.entry(method).or_default();
        route
            .queue
            .pop_front()
            .or_else(|| route.fallback.clone())
            .ok_or_else(|| TransportError::Other(format!("no scripted response for {}", method)))
    }
}

pub fn status(status: &JobStatus) -> HttpResponse {
    HttpResponse::json_ok(status).unwrap()
}

pub fn job_id(id: &str) -> HttpResponse {
    HttpResponse::json_ok(id).unwrap()
}

pub fn ok() -> HttpResponse {
    HttpResponse::new(200, "")
}
