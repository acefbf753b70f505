//! RagGen Stream
//!
//! SSE transport layer for the RagGen phased streaming protocol:
//! - `sse` - incremental `text/event-stream` frame parsing
//! - `channel` - the per-session event channel (`StreamChannel`)
//! - `cancel` - out-of-band cancellation (`CancellationChannel`)
//! - `transport` - the `StreamTransport` seam the orchestrator runs against
//! - `http` - HTTP client construction
//! - `types` - configuration and transport errors

pub mod cancel;
pub mod channel;
pub mod http;
pub mod sse;
pub mod transport;
pub mod types;

// Re-export main types
pub use cancel::CancellationChannel;
pub use channel::{EventStream, StreamChannel};
pub use http::{build_request_client, build_stream_client};
pub use sse::{SseFrame, SseFrameParser};
pub use transport::{HttpStreamTransport, StreamTransport};
pub use types::{StreamAck, StreamConfig, StreamError, StreamResult};
