use serde_json::{json, Value};
use std::io::{self, Cursor, Write};
use timetabled::config::TimetableConfig;
use timetabled::ipc::{self, AppState};
use timetabled::render::Renderer;

fn state() -> AppState {
    AppState {
        config: TimetableConfig::default(),
        renderer: Renderer::new().expect("templates"),
    }
}

fn replies(output: &[u8]) -> Vec<Value> {
    std::str::from_utf8(output)
        .expect("utf-8 output")
        .lines()
        .map(|l| serde_json::from_str(l).expect("reply json"))
        .collect()
}

#[test]
fn serve_answers_each_line_in_order() {
    let input = concat!(
        "{\"id\":\"1\",\"method\":\"health\"}\n",
        "\n",
        "   \n",
        "{not json\n",
        "{\"id\":\"2\",\"method\":\"nope.method\",\"params\":{}}\n",
        "{\"id\":\"3\",\"method\":\"timetable.class\",\"params\":{}}\n",
    );
    let mut out = Vec::new();
    ipc::serve(&state(), Cursor::new(input), &mut out).expect("serve");

    let got = replies(&out);
    assert_eq!(got.len(), 4);
    assert_eq!(got[0]["id"], json!("1"));
    assert_eq!(got[0]["ok"], json!(true));
    assert!(got[0].get("error").is_none());
    assert_eq!(got[1]["id"], json!(""));
    assert_eq!(got[1]["error"]["code"], json!("bad_json"));
    assert!(got[1].get("result").is_none());
    assert_eq!(got[2]["error"]["code"], json!("not_implemented"));
    assert_eq!(got[3]["id"], json!("3"));
    assert_eq!(got[3]["error"]["code"], json!("bad_params"));
}

#[test]
fn serve_with_no_input_writes_nothing() {
    let mut out = Vec::new();
    ipc::serve(&state(), Cursor::new(""), &mut out).expect("serve");
    assert!(out.is_empty());
}

struct ClosedPipe;

impl Write for ClosedPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn serve_stops_when_output_is_gone() {
    let input = "{\"id\":\"1\",\"method\":\"health\"}\n{\"id\":\"2\",\"method\":\"health\"}\n";
    let err = ipc::serve(&state(), Cursor::new(input), ClosedPipe).expect_err("write fails");
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn handle_request_returns_typed_reply() {
    let req: ipc::Request =
        serde_json::from_value(json!({"id": "9", "method": "timetable.teacher", "params": {}}))
            .expect("request");
    let reply = ipc::handle_request(&state(), req);
    assert!(!reply.ok);
    assert!(reply.result.is_none());
    assert_eq!(reply.error_code(), Some("bad_params"));
}
