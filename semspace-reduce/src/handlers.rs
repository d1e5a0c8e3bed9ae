use parking_lot::RwLock;
use semspace_core::{Method, Mode, PathTracker, ReduceError, Reducer, Segment, Vec3};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Handler failures, each mapped to an HTTP-style status code for the client.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Reduce(#[from] ReduceError),

    #[error("unknown operation: {0}")]
    UnknownOp(String),

    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidRequest(_) => 400,
            Self::Reduce(ReduceError::InvalidInput(_)) => 400,
            Self::Reduce(_) => 500,
            Self::UnknownOp(_) => 404,
            Self::Serialization(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, HandlerError>;

/// One response line.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse {
    pub status_code: u16,
    pub body: serde_json::Value,
}

/// Per-session visualization state.
pub(crate) struct SessionState {
    pub tracker: PathTracker,
    /// Camera focus target, eased toward the path centroid on walk records
    pub focus: Vec3,
    /// Records handled this session, both modes
    pub records: usize,
}

impl SessionState {
    pub(crate) fn new() -> Self {
        Self {
            tracker: PathTracker::new(),
            focus: Vec3::ZERO,
            records: 0,
        }
    }
}

/// Handler context wrapping the reducer and shared session state.
pub struct HandlerContext {
    reducer: Reducer,
    pub(crate) state: Arc<RwLock<SessionState>>,
}

#[derive(Deserialize)]
struct ReduceRequest {
    embedding: Vec<f64>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct ReduceResponse {
    text: Option<String>,
    vector: Vec3,
    embedding_dimensions: usize,
    method: &'static str,
}

impl HandlerContext {
    pub fn new(reducer: Reducer) -> Self {
        Self {
            reducer,
            state: Arc::new(RwLock::new(SessionState::new())),
        }
    }

    fn reduce(&self, req: &ReduceRequest) -> Result<(Vec3, Method)> {
        let method = Method::parse(req.method.as_deref());
        info!(
            "Reducing embedding for: {} | Method: {}",
            req.text.as_deref().unwrap_or("<no text>"),
            method
        );
        let vector = self.reducer.reduce(&req.embedding, method)?;
        info!("3D vector: {}", vector);
        Ok((vector, method))
    }

    /// op "reduce" - reduce one embedding to a 3D vector.
    pub fn handle_reduce(&self, body: serde_json::Value) -> Result<JsonResponse> {
        let req: ReduceRequest = serde_json::from_value(body)
            .map_err(|e| HandlerError::InvalidRequest(format!("Invalid reduce request: {}", e)))?;

        let (vector, method) = self.reduce(&req)?;

        json_response(
            200,
            &ReduceResponse {
                embedding_dimensions: req.embedding.len(),
                text: req.text,
                vector,
                method: method.label(),
            },
        )
    }

    /// op "record" - reduce an embedding and place it on the session path.
    pub fn handle_record(&self, body: serde_json::Value) -> Result<JsonResponse> {
        #[derive(Deserialize)]
        struct RecordRequest {
            #[serde(flatten)]
            reduce: ReduceRequest,
            #[serde(default)]
            mode: Option<String>,
        }

        let req: RecordRequest = serde_json::from_value(body)
            .map_err(|e| HandlerError::InvalidRequest(format!("Invalid record request: {}", e)))?;

        let mode = match req.mode.as_deref() {
            Some(m) => m.parse::<Mode>()?,
            None => Mode::default(),
        };
        let (vector, method) = self.reduce(&req.reduce)?;

        // Whole read-modify-write under one write lock so concurrent walks serialize
        let (segment, index, focus) = {
            let mut guard = self.state.write();
            let state = &mut *guard;
            let segment = state.tracker.record(vector, mode);
            state.records += 1;
            state.focus =
                state
                    .tracker
                    .focus_target(mode, state.focus, self.reducer.config().focus_lerp);
            (segment, state.records, state.focus)
        };

        debug!(%mode, index, start = %segment.start, end = %segment.end, "recorded segment");

        #[derive(Serialize)]
        struct RecordResponse {
            #[serde(flatten)]
            reduced: ReduceResponse,
            mode: Mode,
            #[serde(flatten)]
            segment: Segment,
            index: usize,
            focus: Vec3,
        }

        json_response(
            200,
            &RecordResponse {
                reduced: ReduceResponse {
                    embedding_dimensions: req.reduce.embedding.len(),
                    text: req.reduce.text,
                    vector,
                    method: method.label(),
                },
                mode,
                segment,
                index,
                focus,
            },
        )
    }

    /// op "path" - current walk state.
    pub fn handle_path(&self) -> Result<JsonResponse> {
        let state = self.state.read();

        #[derive(Serialize)]
        struct PathResponse<'a> {
            current_point: Vec3,
            path_points: &'a [Vec3],
            centroid: Vec3,
            focus: Vec3,
            total_distance: f64,
        }

        json_response(
            200,
            &PathResponse {
                current_point: state.tracker.current_point(),
                path_points: state.tracker.path_points(),
                centroid: state.tracker.centroid(),
                focus: state.focus,
                total_distance: state.tracker.total_distance(),
            },
        )
    }

    /// op "status" - reducer settings and session counters.
    pub fn handle_status(&self) -> Result<JsonResponse> {
        let state = self.state.read();
        let config = self.reducer.config();

        #[derive(Serialize)]
        struct StatusResponse {
            dimensions: usize,
            seed: u64,
            projection_scale: f64,
            simple_scale: f64,
            records: usize,
            steps: usize,
        }

        json_response(
            200,
            &StatusResponse {
                dimensions: self.reducer.matrix().cols(),
                seed: self.reducer.matrix().seed(),
                projection_scale: config.projection_scale,
                simple_scale: config.simple_scale,
                records: state.records,
                steps: state.tracker.steps(),
            },
        )
    }

    /// op "reset" - start a new session at the origin.
    pub fn handle_reset(&self) -> Result<JsonResponse> {
        let mut state = self.state.write();
        let steps = state.tracker.steps();
        *state = SessionState::new();
        info!("Session reset after {} walk steps", steps);
        json_response(200, &serde_json::json!({ "reset": true }))
    }
}

/// Create a JSON response.
fn json_response<T: Serialize>(status_code: u16, data: &T) -> Result<JsonResponse> {
    let body = serde_json::to_value(data)?;
    Ok(JsonResponse { status_code, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn context() -> HandlerContext {
        HandlerContext::new(Reducer::default())
    }

    fn vec3(value: &serde_json::Value) -> Vec3 {
        serde_json::from_value(value.clone()).unwrap()
    }

    #[test]
    fn reduce_reports_label_and_dimensions() {
        let ctx = context();
        let resp = ctx
            .handle_reduce(json!({
                "text": "hello",
                "embedding": vec![0.5; 3072],
                "method": "simple"
            }))
            .unwrap();

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.body["method"], "Simple Averaging");
        assert_eq!(resp.body["embedding_dimensions"], 3072);
        assert_eq!(resp.body["text"], "hello");
        let v = vec3(&resp.body["vector"]);
        assert!((v.magnitude() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn reduce_defaults_to_projection() {
        let resp = context()
            .handle_reduce(json!({ "embedding": [1.0, 2.0, 3.0] }))
            .unwrap();
        assert_eq!(resp.body["method"], "Random Projection");
    }

    #[test]
    fn reduce_rejects_missing_embedding() {
        let err = context().handle_reduce(json!({ "text": "x" })).unwrap_err();
        assert!(matches!(err, HandlerError::InvalidRequest(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn reduce_short_simple_is_bad_request() {
        let err = context()
            .handle_reduce(json!({ "embedding": [1.0, 2.0], "method": "simple" }))
            .unwrap_err();
        assert!(matches!(err, HandlerError::Reduce(ReduceError::InvalidInput(_))));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn record_walk_then_scatter() {
        let ctx = context();
        let walk = ctx
            .handle_record(json!({ "embedding": [1.0, 0.0, 0.0], "method": "simple", "mode": "walk" }))
            .unwrap();
        assert_eq!(vec3(&walk.body["start"]), Vec3::ZERO);
        assert_eq!(vec3(&walk.body["end"]), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(walk.body["mode"], "walk");
        assert_eq!(walk.body["index"], 1);

        let scatter = ctx
            .handle_record(json!({ "embedding": [0.0, 1.0, 0.0], "method": "simple", "mode": "scatter" }))
            .unwrap();
        assert_eq!(vec3(&scatter.body["start"]), Vec3::ZERO);
        assert_eq!(vec3(&scatter.body["end"]), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(vec3(&scatter.body["focus"]), Vec3::ZERO);
        assert_eq!(scatter.body["index"], 2);

        let path = ctx.handle_path().unwrap();
        assert_eq!(path.body["path_points"].as_array().unwrap().len(), 2);
        assert_eq!(vec3(&path.body["current_point"]), Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(vec3(&path.body["centroid"]), Vec3::new(2.5, 0.0, 0.0));
    }

    #[test]
    fn record_defaults_to_walk() {
        let ctx = context();
        ctx.handle_record(json!({ "embedding": [0.0, 0.0, 2.0], "method": "simple" }))
            .unwrap();
        let second = ctx
            .handle_record(json!({ "embedding": [0.0, 0.0, 2.0], "method": "simple" }))
            .unwrap();
        assert_eq!(vec3(&second.body["start"]), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(vec3(&second.body["end"]), Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn record_rejects_unknown_mode_without_mutating() {
        let ctx = context();
        let err = ctx
            .handle_record(json!({ "embedding": [1.0, 1.0, 1.0], "mode": "orbit" }))
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(ctx.state.read().records, 0);
        assert_eq!(ctx.state.read().tracker.steps(), 0);
    }

    #[test]
    fn status_and_reset() {
        let ctx = context();
        ctx.handle_record(json!({ "embedding": [1.0, 2.0, 3.0] })).unwrap();

        let status = ctx.handle_status().unwrap();
        assert_eq!(status.body["seed"], 42);
        assert_eq!(status.body["dimensions"], 3072);
        assert_eq!(status.body["records"], 1);
        assert_eq!(status.body["steps"], 1);

        ctx.handle_reset().unwrap();
        let status = ctx.handle_status().unwrap();
        assert_eq!(status.body["records"], 0);
        assert_eq!(status.body["steps"], 0);
    }

    #[test]
    fn concurrent_walks_serialize() {
        let ctx = Arc::new(context());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ctx = Arc::clone(&ctx);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        ctx.handle_record(json!({ "embedding": [1.0, 0.0, 0.0], "method": "simple" }))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let state = ctx.state.read();
        assert_eq!(state.records, 80);
        assert_eq!(state.tracker.steps(), 80);
        assert_eq!(state.tracker.current_point(), Vec3::new(400.0, 0.0, 0.0));
    }
}
