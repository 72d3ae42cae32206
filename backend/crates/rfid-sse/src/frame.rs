use bytes::Bytes;

/// Event name every card frame is sent under
pub const CARD_EVENT: &str = "card";

/// Plain-text body sent instead of a stream when the channel is full
pub const CLIENTS_FULL_MESSAGE: &str = "CLIENTS LIST ARE FULL!";

pub const EVENT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// Encode one delivered line as a server-sent event.
///
/// The line's own terminator is stripped; the frame supplies the
/// `\n\n` that ends the event. A bare `\r` inside the line would end the
/// field early on the client, so each `\r`-separated piece gets its own
/// `data:` field.
pub fn encode_frame(event: &str, line: &str) -> Bytes {
    let data = line.strip_suffix('\n').unwrap_or(line);
    let data = data.strip_suffix('\r').unwrap_or(data);

    let mut frame = String::with_capacity(event.len() + data.len() + 16);
    frame.push_str("event: ");
    frame.push_str(event);
    frame.push('\n');
    for piece in data.split('\r') {
        frame.push_str("data: ");
        frame.push_str(piece);
        frame.push('\n');
    }
    frame.push('\n');
    Bytes::from(frame)
}

pub fn encode_card_frame(line: &str) -> Bytes {
    encode_frame(CARD_EVENT, line)
}
