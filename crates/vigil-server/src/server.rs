//! The sequential read-process-write loop behind the stdio server.

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use vigil_core::{ReviewResult, VigilError};
use vigil_review::pipeline::ReviewPipeline;

const REVIEW_METHOD: &str = "review_diff";

// Field names are matched case-insensitively; clients written against the
// schema with capitalized keys still work.
#[derive(Deserialize)]
struct Request {
    #[serde(alias = "Method", alias = "METHOD")]
    method: String,
    #[serde(alias = "Params", alias = "PARAMS")]
    params: Option<Params>,
}

#[derive(Deserialize)]
struct Params {
    #[serde(alias = "Patch", alias = "PATCH")]
    patch: String,
}

/// Serve the line protocol on stdin/stdout, blocking until the peer closes
/// stdin (or, in one-shot mode, after the first response).
///
/// # Errors
///
/// Returns [`VigilError::Io`] on transport failures. Request-level problems
/// never abort the loop — they produce fallback responses instead.
pub async fn serve(pipeline: &ReviewPipeline, one_shot: bool) -> Result<(), VigilError> {
    run(
        pipeline,
        one_shot,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Drive the protocol over arbitrary reader/writer halves.
///
/// Requests are handled strictly in sequence: each one runs to completion,
/// including the provider round trip, and its response line is flushed
/// before the next line is read. Unrecognized methods are ignored without a
/// response; malformed lines produce a fallback response so the channel
/// survives a confused client.
///
/// # Errors
///
/// Returns [`VigilError::Io`] if reading or writing the channel fails, or
/// [`VigilError::Serialization`] if a response cannot be encoded.
pub async fn run<R, W>(
    pipeline: &ReviewPipeline,
    one_shot: bool,
    mut reader: R,
    mut writer: W,
) -> Result<(), VigilError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let read = reader.read_line(&mut line).await?;
        if read == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let result = match serde_json::from_str::<Request>(trimmed) {
            Ok(request) if request.method == REVIEW_METHOD => match request.params {
                Some(params) => pipeline.review(&params.patch).await,
                None => ReviewResult::fallback("Review failed: request is missing params"),
            },
            Ok(request) => {
                eprintln!("warning: ignoring unrecognized method: {}", request.method);
                continue;
            }
            Err(e) => {
                eprintln!("warning: malformed request line: {e}");
                ReviewResult::fallback(format!("Review failed: invalid request: {e}"))
            }
        };

        let json = serde_json::to_string(&result)?;
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;

        if one_shot {
            break;
        }
    }
    Ok(())
}
