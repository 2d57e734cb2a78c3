use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{LlmError, Result};

pub const TITLE_COUNT: usize = 5;

/// One generated post: five candidate titles and the body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub titles: Vec<String>,
    pub content: String,
}

impl PostDraft {
    pub fn schema() -> Value {
        json!({
            "title": "PostDraft",
            "description": "用于定义小红书内容的输出格式。",
            "type": "object",
            "properties": {
                "titles": {
                    "title": "Titles",
                    "description": "小红书的5个标题",
                    "type": "array",
                    "items": { "type": "string" },
                    "minItems": TITLE_COUNT,
                    "maxItems": TITLE_COUNT
                },
                "content": {
                    "title": "Content",
                    "description": "小红书的正文内容",
                    "type": "string"
                }
            },
            "required": ["titles", "content"]
        })
    }
}

/// Turns free-form model output into a validated [`PostDraft`].
pub struct PostParser {
    schema: Value,
    validator: Validator,
}

impl PostParser {
    pub fn new() -> Result<Self> {
        let schema = PostDraft::schema();
        let validator =
            jsonschema::validator_for(&schema).map_err(|e| LlmError::InvalidSchema(e.to_string()))?;

        Ok(Self { schema, validator })
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Instructions appended to the system prompt so the model answers with a
    /// JSON object matching the schema.
    pub fn format_instructions(&self) -> String {
        let mut reduced = self.schema.clone();
        if let Some(object) = reduced.as_object_mut() {
            object.remove("title");
            object.remove("type");
        }

        format!(
            r#"The output should be formatted as a JSON instance that conforms to the JSON schema below.

As an example, for the schema {{"properties": {{"foo": {{"title": "Foo", "description": "a list of strings", "type": "array", "items": {{"type": "string"}}}}}}, "required": ["foo"]}}
the object {{"foo": ["bar", "baz"]}} is a well-formatted instance of the schema. The object {{"properties": {{"foo": ["bar", "baz"]}}}} is not well-formatted.

Here is the output schema:
```
{}
```"#,
            reduced
        )
    }

    pub fn parse(&self, text: &str) -> Result<PostDraft> {
        let candidate = extract_json(text)
            .ok_or_else(|| LlmError::InvalidJson("no JSON object found in model output".to_string()))?;

        let value: Value =
            serde_json::from_str(candidate).map_err(|e| LlmError::InvalidJson(e.to_string()))?;

        let violations: Vec<String> = self
            .validator
            .iter_errors(&value)
            .map(|error| error.to_string())
            .collect();
        if !violations.is_empty() {
            tracing::debug!(?violations, "model output rejected by schema");
            return Err(LlmError::SchemaViolation(violations));
        }

        Ok(serde_json::from_value(value)?)
    }
}

/// Prefers a fenced code block; falls back to the outermost `{ ... }` span.
fn extract_json(text: &str) -> Option<&str> {
    if let Some(fenced) = fenced_block(text) {
        return Some(fenced);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // skip the info string, e.g. "json"
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    let block = body[..close].trim();

    block.starts_with('{').then_some(block)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("标题{} ✨", i)).collect()
    }

    fn parser() -> PostParser {
        PostParser::new().unwrap()
    }

    #[test]
    fn parses_bare_json_object() {
        let text = json!({ "titles": titles(5), "content": "正文 🌸 #秋天" }).to_string();

        let draft = parser().parse(&text).unwrap();

        assert_eq!(draft.titles, titles(5));
        assert_eq!(draft.content, "正文 🌸 #秋天");
    }

    #[test]
    fn parses_fenced_block_with_surrounding_chatter() {
        let body = json!({ "titles": titles(5), "content": "hello" });
        let text = format!("Sure! Here you go:\n```json\n{}\n```\nEnjoy.", body);

        let draft = parser().parse(&text).unwrap();

        assert_eq!(draft.content, "hello");
    }

    #[test]
    fn falls_back_to_brace_span_when_fence_holds_no_object() {
        let body = json!({ "titles": titles(5), "content": "x" });
        let text = format!("```\nnot json\n```\n{}", body);

        assert!(parser().parse(&text).is_ok());
    }

    #[test]
    fn rejects_wrong_title_count() {
        for count in [4, 6] {
            let text = json!({ "titles": titles(count), "content": "x" }).to_string();

            let err = parser().parse(&text).unwrap_err();

            assert!(matches!(err, LlmError::SchemaViolation(ref v) if v.len() == 1), "{count}: {err}");
        }
    }

    #[test]
    fn rejects_missing_content() {
        let text = json!({ "titles": titles(5) }).to_string();

        let err = parser().parse(&text).unwrap_err();

        match err {
            LlmError::SchemaViolation(violations) => {
                assert!(violations.iter().any(|v| v.contains("content")))
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_string_titles() {
        let text = json!({ "titles": [1, 2, 3, 4, 5], "content": "x" }).to_string();

        assert!(matches!(
            parser().parse(&text),
            Err(LlmError::SchemaViolation(_))
        ));
    }

    #[test]
    fn rejects_plain_prose() {
        let err = parser().parse("I cannot help with that.").unwrap_err();

        assert!(matches!(err, LlmError::InvalidJson(_)));
    }

    #[test]
    fn rejects_truncated_json() {
        let err = parser().parse(r#"{"titles": ["a", "b"], "content": "x"#).unwrap_err();

        assert!(matches!(err, LlmError::InvalidJson(_)));
    }

    #[test]
    fn format_instructions_embed_schema_without_top_level_title() {
        let instructions = parser().format_instructions();

        assert!(instructions.contains("\"minItems\":5"));
        assert!(instructions.contains("小红书的正文内容"));
        assert!(!instructions.contains("\"title\":\"PostDraft\""));
    }
}
