use async_trait::async_trait;
use futures_util::StreamExt;
use http::{HeaderMap, Method};
use reqwest::{Client, Request, Response};

use crate::error::AttemptError;
use crate::sinks::{AttemptTrace, TraceSink};

use super::port::{AttemptTag, RequestPort};

/// Longest body prefix, in bytes, kept in a status error.
const SNIPPET_LIMIT: usize = 200;

/// `RequestPort` backed by a pooled reqwest client. Every response body is
/// drained so the connection goes back to the pool.
#[derive(Debug, Clone)]
pub struct HttpRequestPort {
    client: Client,
    trace: Option<TraceSink>,
}

impl HttpRequestPort {
    #[must_use]
    pub const fn new(client: Client, trace: Option<TraceSink>) -> Self {
        Self { client, trace }
    }
}

struct CapturedResponse {
    status: u16,
    head: String,
    body: Vec<u8>,
}

#[async_trait]
impl RequestPort for HttpRequestPort {
    async fn attempt(&self, url: &str, tag: AttemptTag) -> Result<u16, AttemptError> {
        let request = self
            .client
            .request(Method::GET, url)
            .build()
            .map_err(|err| AttemptError::setup(&err))?;
        let request_dump = self.trace.as_ref().map(|_| dump_request(&request));

        let captured = match self.client.execute(request).await {
            Ok(response) => read_response(response, self.trace.is_some()).await,
            Err(err) => Err(AttemptError::transport(&err)),
        };

        if let (Some(trace), Some(request)) = (self.trace.as_ref(), request_dump) {
            let response = match &captured {
                Ok(captured) => format!(
                    "{}\n\n{}",
                    captured.head,
                    String::from_utf8_lossy(&captured.body)
                ),
                Err(err) => format!("error: {}", err),
            };
            trace.send(AttemptTrace {
                run_id: tag.run_id,
                request_id: tag.request_id,
                attempt: tag.attempt,
                request,
                response,
            });
        }

        let captured = captured?;
        classify_status(captured.status, &captured.body)
    }
}

/// Reads the whole body. Bytes beyond what the caller needs are discarded
/// as they arrive.
async fn read_response(response: Response, keep_all: bool) -> Result<CapturedResponse, AttemptError> {
    let status = response.status().as_u16();
    let head = if keep_all {
        format!(
            "{:?} {}\n{}",
            response.version(),
            response.status(),
            render_headers(response.headers())
        )
    } else {
        String::new()
    };
    let limit = if keep_all {
        usize::MAX
    } else if status >= 400 {
        SNIPPET_LIMIT
    } else {
        0
    };

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| AttemptError::transport(&err))?;
        let room = limit.saturating_sub(body.len());
        if room > 0 {
            body.extend_from_slice(bytes.get(..room.min(bytes.len())).unwrap_or(bytes.as_ref()));
        }
    }

    Ok(CapturedResponse { status, head, body })
}

/// Maps a received status to the attempt outcome.
///
/// # Errors
///
/// Returns `AttemptError::Status` with a trimmed body snippet of at most
/// 200 bytes for statuses of 400 and above.
pub(crate) fn classify_status(status: u16, body: &[u8]) -> Result<u16, AttemptError> {
    if status < 400 {
        return Ok(status);
    }
    Err(AttemptError::Status {
        status,
        snippet: body_snippet(body),
    })
}

fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut end = SNIPPET_LIMIT.min(text.len());
    while !text.is_char_boundary(end) {
        end = end.saturating_sub(1);
    }
    text.get(..end).unwrap_or_default().trim().to_owned()
}

fn dump_request(request: &Request) -> String {
    format!(
        "{} {} {:?}\n{}",
        request.method(),
        request.url(),
        request.version(),
        render_headers(request.headers())
    )
}

fn render_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value.to_str().unwrap_or("<binary>")))
        .collect::<Vec<_>>()
        .join("\n")
}
