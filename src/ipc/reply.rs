use crate::error::TimetableError;
use serde::Serialize;
use serde_json::Value;

/// One response line. Exactly one of `result` and `error` is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub id: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Reply {
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}

pub fn ok(id: &str, result: Value) -> Reply {
    Reply {
        id: id.to_string(),
        ok: true,
        result: Some(result),
        error: None,
    }
}

pub fn err(id: &str, code: &str, message: impl Into<String>, details: Option<Value>) -> Reply {
    Reply {
        id: id.to_string(),
        ok: false,
        result: None,
        error: Some(ErrorBody {
            code: code.to_string(),
            message: message.into(),
            details,
        }),
    }
}

pub fn from_timetable_error(id: &str, e: &TimetableError) -> Reply {
    err(id, e.code(), e.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_reply_omits_error() {
        let v = serde_json::to_value(ok("7", json!({"n": 1}))).expect("serialize");
        assert_eq!(v, json!({"id": "7", "ok": true, "result": {"n": 1}}));
    }

    #[test]
    fn err_reply_omits_result_and_empty_details() {
        let v = serde_json::to_value(err("8", "not_found", "gone", None)).expect("serialize");
        assert_eq!(
            v,
            json!({"id": "8", "ok": false, "error": {"code": "not_found", "message": "gone"}})
        );
        let with = err("9", "bad_params", "x", Some(json!({"path": "a"})));
        assert_eq!(with.error_code(), Some("bad_params"));
        assert_eq!(
            serde_json::to_value(with).expect("serialize")["error"]["details"]["path"],
            json!("a")
        );
    }
}
