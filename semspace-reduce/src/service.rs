use crate::handlers::{HandlerContext, HandlerError, JsonResponse};
use semspace_core::Reducer;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Line-delimited JSON reduction service.
///
/// Each input line is an object with an `op` field; each produces exactly one
/// output line.
pub struct ReduceService {
    handlers: HandlerContext,
}

impl ReduceService {
    pub fn new(reducer: Reducer) -> Self {
        Self {
            handlers: HandlerContext::new(reducer),
        }
    }

    /// Route one request line and turn failures into error responses.
    pub fn handle_line(&self, line: &str) -> JsonResponse {
        let result = serde_json::from_str::<serde_json::Value>(line)
            .map_err(|e| HandlerError::InvalidRequest(format!("Invalid JSON body: {}", e)))
            .and_then(|body| self.route(body));

        match result {
            Ok(response) => response,
            Err(err) => {
                warn!("request failed: {}", err);
                let status_code = err.status_code();
                JsonResponse {
                    status_code,
                    body: serde_json::json!({
                        "error": err.to_string(),
                        "status": status_code,
                    }),
                }
            }
        }
    }

    fn route(&self, body: serde_json::Value) -> Result<JsonResponse, HandlerError> {
        let op = body
            .get("op")
            .and_then(|v| v.as_str())
            .ok_or_else(|| HandlerError::InvalidRequest("missing \"op\" field".to_string()))?
            .to_string();

        debug!("request: {}", op);

        match op.as_str() {
            "reduce" => self.handlers.handle_reduce(body),
            "record" => self.handlers.handle_record(body),
            "path" => self.handlers.handle_path(),
            "status" => self.handlers.handle_status(),
            "reset" => self.handlers.handle_reset(),
            _ => Err(HandlerError::UnknownOp(op)),
        }
    }

    /// Serve requests from `reader` until EOF, writing responses to `writer`.
    ///
    /// Returns the number of requests handled.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = LinesStream::new(reader.lines());
        let mut handled = 0;

        while let Some(line) = lines.next().await {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_line(&line);
            writer.write_all(&encode_line(&response.body)?).await?;
            writer.flush().await?;
            handled += 1;
        }

        info!("Input closed after {} requests", handled);
        Ok(handled)
    }
}

/// Serialize one response body as a newline-terminated JSON line.
fn encode_line(body: &serde_json::Value) -> std::io::Result<Vec<u8>> {
    let mut out = serde_json::to_vec(body).map_err(std::io::Error::other)?;
    out.push(b'\n');
    Ok(out)
}

impl Default for ReduceService {
    fn default() -> Self {
        Self::new(Reducer::default())
    }
}
