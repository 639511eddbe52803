use super::*;

/// One AJAX form submission as it goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub url: String,
    pub method: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl SubmissionRequest {
    pub(crate) fn post_form(url: &str, entries: &[(String, String)]) -> Self {
        Self {
            url: url.to_string(),
            method: "POST".to_string(),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                (
                    "Content-Type".to_string(),
                    "application/x-www-form-urlencoded".to_string(),
                ),
            ],
            body: serialize_form_urlencoded(entries),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
}

impl TransportResponse {
    pub fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Network(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
        }
    }
}

impl StdError for TransportError {}

/// Sends AJAX submissions. Called once per request when the page settles
/// its network queue.
pub trait Transport {
    fn send(
        &mut self,
        request: &SubmissionRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum MockReply {
    Status(u16),
    NetworkError(String),
}

/// Canned replies keyed by URL, with a default for everything else.
#[derive(Debug, Clone)]
pub struct MockTransport {
    replies: HashMap<String, MockReply>,
    default_reply: MockReply,
    requests: Vec<SubmissionRequest>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            replies: HashMap::new(),
            default_reply: MockReply::Status(200),
            requests: Vec::new(),
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_response(&mut self, url: &str, status: u16) {
        self.replies
            .insert(url.to_string(), MockReply::Status(status));
    }

    pub fn set_network_error(&mut self, url: &str, message: &str) {
        self.replies
            .insert(url.to_string(), MockReply::NetworkError(message.to_string()));
    }

    pub fn set_default_response(&mut self, status: u16) {
        self.default_reply = MockReply::Status(status);
    }

    pub fn set_default_network_error(&mut self, message: &str) {
        self.default_reply = MockReply::NetworkError(message.to_string());
    }

    pub fn clear_responses(&mut self) {
        self.replies.clear();
    }

    pub fn requests(&self) -> &[SubmissionRequest] {
        &self.requests
    }

    pub fn take_requests(&mut self) -> Vec<SubmissionRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl Transport for MockTransport {
    fn send(
        &mut self,
        request: &SubmissionRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        self.requests.push(request.clone());
        match self.replies.get(&request.url).unwrap_or(&self.default_reply) {
            MockReply::Status(status) => Ok(TransportResponse { status: *status }),
            MockReply::NetworkError(message) => Err(TransportError::Network(message.clone())),
        }
    }
}
