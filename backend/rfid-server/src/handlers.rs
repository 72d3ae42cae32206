use rfid_sse::AppState;

use axum::{
    extract::{RawQuery, State},
    response::Html,
};
use log::info;

/// Published to every open stream when someone loads the demo page
pub const VISIT_MESSAGE: &str = "New visit!";

/// Card id `/id` publishes when the request has no query string
pub const DEFAULT_CARD_ID: &str = "B65BBC19";

pub const HELLO_PAGE: &str = r#"<html>
    <body>
        <p>Open this page in new tabs to see the real time visits.</p>
        <p>Attach a card to the reader to see CardID.</p>
        <div id="events"></div>
        <script>
        function insertMessage(e) {
            document.getElementById('events').innerHTML += e.data + '<br>';
        }
        var eventSource = new EventSource('/subscribe');
        eventSource.addEventListener('card', insertMessage);
        </script>
    </body>
</html>
"#;

/// GET /hello - announce the visit to open streams, then serve the demo page
pub async fn hello(State(state): State<AppState>) -> Html<&'static str> {
    state.publisher.publish(VISIT_MESSAGE, &state.channel).await;
    Html(HELLO_PAGE)
}

/// GET /id[?<card id>] - publish a card id as if the reader had seen it
///
/// The raw query string is the id; an empty or missing query publishes
/// `DEFAULT_CARD_ID`. The published id is echoed back.
pub async fn card_id(State(state): State<AppState>, RawQuery(query): RawQuery) -> String {
    let id = query
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| DEFAULT_CARD_ID.to_string());

    let report = state.publisher.publish(&id, &state.channel).await;
    info!(
        "Injected card id '{id}' for {} subscribers",
        report.subscribers
    );

    id
}
