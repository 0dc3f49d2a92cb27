//! Conversion of simulated responses into HTTP responses
//!
//! Complete replies map one to one. A dribble streams its chunks through
//! a bounded channel; once hyper drops the body (client gone) the next
//! write fails and the remaining chunks are abandoned. A connection
//! reset is a body that errors on its first poll, which makes hyper
//! abort the connection before anything is flushed.

use std::io;

use application::{ChunkSink, DribblePlan, Headers, Reply, SimulatedResponse, SinkClosed};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::{StreamExt, stream};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

type ChunkResult = Result<Bytes, io::Error>;

/// Chunk sink backed by the sending half of a streaming body
#[derive(Debug)]
pub struct ChannelSink {
    tx: Option<mpsc::Sender<ChunkResult>>,
}

impl ChannelSink {
    /// Create a sink and the body that receives its chunks
    pub fn channel() -> (Self, Body) {
        let (tx, rx) = mpsc::channel(1);
        (Self { tx: Some(tx) }, Body::from_stream(ReceiverStream::new(rx)))
    }
}

#[async_trait]
impl ChunkSink for ChannelSink {
    async fn write(&mut self, chunk: Bytes) -> Result<(), SinkClosed> {
        match &self.tx {
            Some(tx) => tx.send(Ok(chunk)).await.map_err(|_| SinkClosed),
            None => Err(SinkClosed),
        }
    }

    async fn close(&mut self) {
        // Dropping the sender ends the body stream
        self.tx = None;
    }
}

/// Turn the engine output into an axum response
pub fn into_response(simulated: SimulatedResponse) -> Response {
    match simulated {
        SimulatedResponse::Reply(reply) => reply_response(reply),
        SimulatedResponse::Dribble { headers, plan } => dribble_response(&headers, plan),
        SimulatedResponse::ResetConnection => reset_response(),
    }
}

fn reply_response(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let headers = header_map(&reply.headers);

    // hyper replaces a mismatching Content-Length when the body length is
    // known, so a deliberately wrong one needs a body of unknown length
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    let body = match declared {
        Some(len) if len != reply.body.len() => {
            debug!(declared = len, actual = reply.body.len(), "Sending mismatching Content-Length");
            mismatching_body(reply.body)
        },
        _ => Body::from(reply.body),
    };

    (status, headers, body).into_response()
}

/// Body that yields `bytes` and then ends short of the declared length
///
/// hyper aborts the connection as soon as the stream ends with bytes still
/// owed, dropping whatever it has buffered. Returning `Pending` once after
/// the chunk lets the dispatcher flush the head and the bytes first.
fn mismatching_body(bytes: Bytes) -> Body {
    let chunk: ChunkResult = Ok(bytes);
    let flush =
        stream::once(tokio::task::yield_now()).filter_map(|()| async { None::<ChunkResult> });
    Body::from_stream(stream::iter([chunk]).chain(flush))
}

fn dribble_response(headers: &Headers, plan: DribblePlan) -> Response {
    let (mut sink, body) = ChannelSink::channel();
    tokio::spawn(async move {
        let outcome = plan.run(&mut sink).await;
        debug!(?outcome, "Dribble finished");
    });

    let mut headers = header_map(headers);
    // hyper frames the stream itself
    headers.remove(header::TRANSFER_ENCODING);
    headers.remove(header::CONTENT_LENGTH);

    (StatusCode::OK, headers, body).into_response()
}

fn reset_response() -> Response {
    let reset: ChunkResult = Err(io::Error::new(
        io::ErrorKind::ConnectionReset,
        "connection reset by peer",
    ));
    Body::from_stream(stream::iter([reset])).into_response()
}

fn header_map(headers: &Headers) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        match (
            HeaderName::try_from(name),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.append(name, value);
            },
            _ => warn!(header = name, "Dropping header that is not valid HTTP"),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn reply_keeps_status_headers_and_body() {
        let mut headers = Headers::new();
        headers.set("content-type", "application/json; charset=utf-8");
        headers.append("x-dup", "a");
        headers.append("x-dup", "b");
        let reply = Reply {
            status: 201,
            headers,
            body: Bytes::from_static(b"{}"),
        };

        let response = into_response(reply.into());

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get_all("x-dup").iter().count(), 2);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"{}");
    }

    #[tokio::test]
    async fn mismatching_content_length_is_kept() {
        let mut headers = Headers::new();
        headers.set("content-length", "999");
        let reply = Reply {
            status: 200,
            headers,
            body: Bytes::from_static(b"abc"),
        };

        let response = into_response(reply.into());

        assert_eq!(response.headers()[header::CONTENT_LENGTH], "999");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"abc");
    }

    #[test]
    fn invalid_header_is_dropped() {
        let mut headers = Headers::new();
        headers.set("bad header", "x");
        headers.set("x-ok", "1");

        let map = header_map(&headers);

        assert_eq!(map.len(), 1);
        assert!(map.contains_key("x-ok"));
    }

    #[tokio::test(start_paused = true)]
    async fn dribble_streams_every_chunk() {
        let mut headers = Headers::new();
        headers.set("transfer-encoding", "chunked");
        headers.set("content-type", "text/event-stream");
        let plan = DribblePlan::new("abcdef", 3, 30);

        let response = into_response(SimulatedResponse::Dribble { headers, plan });

        assert!(response.headers().get(header::TRANSFER_ENCODING).is_none());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"abcdef");
    }

    #[tokio::test]
    async fn dropped_body_closes_the_sink() {
        let (mut sink, body) = ChannelSink::channel();
        drop(body);

        assert!(sink.write(Bytes::from_static(b"x")).await.is_err());
    }

    #[tokio::test]
    async fn reset_body_fails() {
        let response = into_response(SimulatedResponse::ResetConnection);
        assert!(to_bytes(response.into_body(), usize::MAX).await.is_err());
    }
}
