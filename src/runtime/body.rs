use crate::error::{Error, Result};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

/// Request payload, either structured params still to be encoded or a
/// pre-built body that is sent as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Structured params, encoded according to the Content-Type header
    Params(Value),
    Text(String),
    Bytes(Bytes),
    /// Multipart form; the transport writes the boundary header itself
    Form(FormData),
}

impl Body {
    /// Serialize any value into structured params
    pub fn params<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Body::Params(serde_json::to_value(value)?))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Body::Params(_) => "structured",
            Body::Text(_) => "text",
            Body::Bytes(_) => "binary",
            Body::Form(_) => "multipart",
        }
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Params(value)
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Bytes(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(bytes))
    }
}

impl From<FormData> for Body {
    fn from(form: FormData) -> Self {
        Body::Form(form)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    File {
        bytes: Bytes,
        file_name: Option<String>,
        mime: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: FormValue,
}

/// Ordered multipart form fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<FormPart>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.append_text(name, value);
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Bytes>,
        file_name: Option<&str>,
        mime: Option<&str>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::File {
                bytes: bytes.into(),
                file_name: file_name.map(str::to_string),
                mime: mime.map(str::to_string),
            },
        });
        self
    }

    pub fn append_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(FormPart {
            name: name.into(),
            value: FormValue::Text(value.into()),
        });
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn get(&self, name: &str) -> Option<&FormValue> {
        self.parts
            .iter()
            .find(|part| part.name == name)
            .map(|part| &part.value)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

/// Encode a request body according to its Content-Type.
///
/// - no content type: the body is returned untouched (pre-built payloads
///   such as multipart forms)
/// - `application/json`: JSON text of the params
/// - `x-www-form-urlencoded`: form-encoded params
/// - anything else: pre-built bodies pass through, structured params fail
pub fn handle_content_type(content_type: Option<&str>, body: Body) -> Result<Body> {
    let content_type = match content_type.map(str::trim) {
        None | Some("") => return Ok(body),
        Some(content_type) => content_type,
    };

    if content_type.contains("application/json") {
        return match body {
            Body::Params(value) => Ok(Body::Text(serde_json::to_string(&value)?)),
            Body::Text(text) => Ok(Body::Text(serde_json::to_string(&text)?)),
            other => Err(unencodable(content_type, &other)),
        };
    }

    if content_type.contains("x-www-form-urlencoded") {
        return match body {
            Body::Params(value) => Ok(Body::Text(super::url::stringify(&value))),
            other => Err(unencodable(content_type, &other)),
        };
    }

    match body {
        Body::Params(_) => Err(unencodable(content_type, &body)),
        prebuilt => {
            log::trace!(
                "Sending {} body unmodified for content type '{}'",
                prebuilt.kind(),
                content_type
            );
            Ok(prebuilt)
        }
    }
}

fn unencodable(content_type: &str, body: &Body) -> Error {
    Error::Encoding {
        content_type: content_type.to_string(),
        body: body.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_content_type_returns_params_unchanged() {
        let params = Body::Params(json!({"a": 1, "nested": {"b": [1, 2]}}));
        assert_eq!(handle_content_type(None, params.clone()).unwrap(), params);
        assert_eq!(handle_content_type(Some(""), params.clone()).unwrap(), params);

        let form = Body::Form(FormData::new().text("k", "v"));
        assert_eq!(handle_content_type(None, form.clone()).unwrap(), form);
    }

    #[test]
    fn test_json_content_type() {
        let body = handle_content_type(Some("application/json"), Body::Params(json!({"a": 1})));
        assert_eq!(body.unwrap(), Body::Text(r#"{"a":1}"#.to_string()));

        let body = handle_content_type(
            Some("application/json; charset=utf-8"),
            Body::Text("hi".into()),
        );
        assert_eq!(body.unwrap(), Body::Text(r#""hi""#.to_string()));
    }

    #[test]
    fn test_form_content_type() {
        let body = handle_content_type(
            Some("application/x-www-form-urlencoded"),
            Body::Params(json!({"a": 1, "b": "x"})),
        );
        assert_eq!(body.unwrap(), Body::Text("a=1&b=x".to_string()));
    }

    #[test]
    fn test_unsupported_content_type() {
        let err = handle_content_type(Some("text/xml"), Body::Params(json!({"a": 1})))
            .unwrap_err();
        assert!(matches!(err, Error::Encoding { body: "structured", .. }));

        let raw = Body::Text("<a/>".into());
        assert_eq!(handle_content_type(Some("text/xml"), raw.clone()).unwrap(), raw);
    }

    #[test]
    fn test_multipart_cannot_be_json() {
        let err = handle_content_type(Some("application/json"), Body::Form(FormData::new()))
            .unwrap_err();
        assert!(matches!(err, Error::Encoding { body: "multipart", .. }));
    }
}
