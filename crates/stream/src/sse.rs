//! SSE Frame Parsing
//!
//! Incremental parser for the `text/event-stream` wire format used by the
//! generation channel: every server message is a named event (`event:`
//! field) with a payload (`data:` field), dispatched on a blank line.
//! `id:` and `retry:` fields are not used by this protocol and are skipped.

/// One complete server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Event name; `message` when the server omits the `event:` field.
    pub event: String,
    /// Payload; multiple `data:` lines are joined with a newline.
    pub data: String,
}

/// Accumulates field lines until the blank dispatch line completes a frame.
#[derive(Debug, Default)]
pub struct SseFrameParser {
    event: Option<String>,
    data: Vec<String>,
}

impl SseFrameParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one line (without its trailing newline). Returns a complete
    /// frame when the line is the blank dispatch line and fields were
    /// collected.
    pub fn push_line(&mut self, line: &str) -> Option<SseFrame> {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            // SSE comment / keep-alive line.
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }

        None
    }

    /// Force-completes a pending frame (stream ended without a final blank
    /// line).
    pub fn flush(&mut self) -> Option<SseFrame> {
        self.dispatch()
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        if self.event.is_none() && self.data.is_empty() {
            return None;
        }
        let event = self.event.take().unwrap_or_else(|| "message".to_string());
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame { event, data })
    }
}
