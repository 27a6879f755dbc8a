use super::reply::{err, Reply};
use super::router::handle_request;
use super::types::{AppState, Request};
use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

/// Answers JSON-lines requests from `input` until it is exhausted, writing one
/// reply line per non-blank request line. Returns early only when `output`
/// can no longer be written.
pub fn serve<R: BufRead, W: Write>(state: &AppState, input: R, mut output: W) -> io::Result<()> {
    for line in input.lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "stopped reading requests");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let reply = match serde_json::from_str::<Request>(&line) {
            Ok(req) => {
                debug!(id = %req.id, method = %req.method, "request");
                handle_request(state, req)
            }
            Err(e) => {
                // No id to reply to.
                warn!(error = %e, "unparseable request line");
                err("", "bad_json", e.to_string(), None)
            }
        };
        write_reply(&mut output, &reply)?;
    }
    Ok(())
}

fn write_reply<W: Write>(output: &mut W, reply: &Reply) -> io::Result<()> {
    serde_json::to_writer(&mut *output, reply)?;
    output.write_all(b"\n")?;
    output.flush()
}
