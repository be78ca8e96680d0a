//! Request builders and assertions

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use serde_json::Value;
use talks::backend::realtime::connection::EventReceiver;
use talks::shared::ServerEvent;

pub fn json_request(method: Method, uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

/// The next queued event, failing if there is none
pub fn next_event(rx: &mut EventReceiver) -> ServerEvent {
    rx.try_recv().expect("expected a queued event")
}

pub fn assert_no_event(rx: &mut EventReceiver) {
    if let Ok(event) = rx.try_recv() {
        panic!("unexpected event {:?}", event);
    }
}
