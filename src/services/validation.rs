use crate::errors::ToolError;
use serde_json::{json, Value};

#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    pub fn ensure_string(
        &self,
        value: &Value,
        label: &str,
        trim: bool,
    ) -> Result<String, ToolError> {
        let text = value.as_str().ok_or_else(|| {
            ToolError::invalid_params(format!("{} must be a non-empty string", label))
        })?;
        let normalized = text.trim();
        if normalized.is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(if trim {
            normalized.to_string()
        } else {
            text.to_string()
        })
    }

    /// A present string, possibly empty. `null` and absent both read as `None`.
    pub fn optional_text(&self, args: &Value, key: &str) -> Result<Option<String>, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ToolError::invalid_params(format!(
                "{} must be a string",
                key
            ))),
        }
    }

    /// Like [`Self::optional_text`], but blank strings read as `None`.
    pub fn optional_non_empty(
        &self,
        args: &Value,
        key: &str,
    ) -> Result<Option<String>, ToolError> {
        Ok(self
            .optional_text(args, key)?
            .filter(|s| !s.trim().is_empty()))
    }

    pub fn optional_bool(&self, args: &Value, key: &str) -> Result<Option<bool>, ToolError> {
        match args.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(ToolError::invalid_params(format!(
                    "{} must be a boolean",
                    key
                ))),
            },
            Some(_) => Err(ToolError::invalid_params(format!(
                "{} must be a boolean",
                key
            ))),
        }
    }

    /// Identifier of the entity an update or delete targets. It becomes one
    /// URL path segment, so separators, query and fragment markers, escapes
    /// and dot segments are rejected.
    pub fn ensure_id(&self, args: &Value, key: &str, label: &str) -> Result<String, ToolError> {
        let id = self
            .optional_non_empty(args, key)?
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ToolError::invalid_params(format!("{} ID is required", label)))?;
        let unsafe_char = id.chars().any(|c| {
            matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
        });
        if unsafe_char || id == "." || id == ".." {
            return Err(ToolError::invalid_params(format!(
                "Invalid {} ID '{}': must be a single path segment",
                label, id
            )));
        }
        Ok(id)
    }

    pub fn ensure_positive_int(
        &self,
        args: &Value,
        key: &str,
        fallback: u64,
    ) -> Result<u64, ToolError> {
        let value = match args.get(key) {
            None | Some(Value::Null) => return Ok(fallback),
            Some(value) => value,
        };
        value
            .as_u64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
            .filter(|n| *n >= 1)
            .ok_or_else(|| ToolError::invalid_params(format!("{} must be a positive integer", key)))
    }

    pub fn ensure_choice(
        &self,
        field: &str,
        value: Option<String>,
        allowed: &[&str],
    ) -> Result<Option<String>, ToolError> {
        let Some(value) = value else {
            return Ok(None);
        };
        if allowed.contains(&value.as_str()) {
            return Ok(Some(value));
        }
        Err(ToolError::invalid_params(format!(
            "Invalid {} '{}': expected one of {}",
            field,
            value,
            allowed.join(", ")
        )))
    }

    /// Accepts `rrggbb` or `#rrggbb` and returns the `#`-prefixed lowercase form.
    pub fn normalize_accent_color(&self, raw: &str) -> Result<String, ToolError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ToolError::invalid_params(format!(
                "Invalid accent_color '{}': expected a 6-digit hex color such as #ff5500",
                raw
            )));
        }
        Ok(format!("#{}", digits.to_lowercase()))
    }

    /// Tag references for a post: plain names become `{"name": ...}` objects.
    pub fn normalize_tag_refs(&self, value: Option<&Value>) -> Result<Option<Vec<Value>>, ToolError> {
        let items = match value {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ToolError::invalid_params("tags must be a list")),
        };
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::String(name) if !name.trim().is_empty() => {
                    out.push(json!({ "name": name.trim() }));
                }
                Value::Object(map)
                    if map
                        .get("name")
                        .and_then(|v| v.as_str())
                        .is_some_and(|n| !n.trim().is_empty())
                        || map.contains_key("id")
                        || map.contains_key("slug") =>
                {
                    out.push(item.clone());
                }
                _ => {
                    return Err(ToolError::invalid_params(
                        "tags entries must be tag names or objects with a name",
                    ))
                }
            }
        }
        Ok(Some(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_id_uses_label_in_message() {
        let v = Validation::new();
        let err = v
            .ensure_id(&json!({}), "post_id", "Post")
            .expect_err("missing id");
        assert_eq!(err.render(), "Post ID is required");
        let err = v
            .ensure_id(&json!({"tag_id": "  "}), "tag_id", "Tag")
            .expect_err("blank id");
        assert_eq!(err.render(), "Tag ID is required");
        assert_eq!(
            v.ensure_id(&json!({"page_id": " p1 "}), "page_id", "Page")
                .expect("id"),
            "p1"
        );
    }

    #[test]
    fn ensure_id_rejects_values_that_leave_the_path_segment() {
        let v = Validation::new();
        for id in ["../posts/p1", "p1/", "p1?x=1", "p1#frag", "%2e%2e", "..", ".", "a b"] {
            let err = v
                .ensure_id(&json!({"tag_id": id}), "tag_id", "Tag")
                .expect_err(id);
            assert!(
                err.render().starts_with("Invalid Tag ID '"),
                "{}: {}",
                id,
                err.render()
            );
        }
        assert_eq!(
            v.ensure_id(&json!({"tag_id": "6489a1f0c2a4b10001d0aa11"}), "tag_id", "Tag")
                .expect("object id"),
            "6489a1f0c2a4b10001d0aa11"
        );
    }

    #[test]
    fn bool_accepts_true_false_strings() {
        let v = Validation::new();
        let args = json!({"a": "true", "b": "False", "c": false, "d": "yes"});
        assert_eq!(v.optional_bool(&args, "a").expect("a"), Some(true));
        assert_eq!(v.optional_bool(&args, "b").expect("b"), Some(false));
        assert_eq!(v.optional_bool(&args, "c").expect("c"), Some(false));
        assert!(v.optional_bool(&args, "d").is_err());
        assert_eq!(v.optional_bool(&args, "missing").expect("none"), None);
    }

    #[test]
    fn choice_lists_allowed_values() {
        let v = Validation::new();
        let err = v
            .ensure_choice("status", Some("live".to_string()), &["draft", "published"])
            .expect_err("invalid");
        assert_eq!(
            err.render(),
            "Invalid status 'live': expected one of draft, published"
        );
        assert_eq!(
            v.ensure_choice("status", None, &["draft"]).expect("none"),
            None
        );
    }

    #[test]
    fn positive_int_defaults_and_rejects_zero() {
        let v = Validation::new();
        assert_eq!(v.ensure_positive_int(&json!({}), "page", 1).expect("default"), 1);
        assert_eq!(
            v.ensure_positive_int(&json!({"limit": "25"}), "limit", 15)
                .expect("string"),
            25
        );
        assert!(v.ensure_positive_int(&json!({"page": 0}), "page", 1).is_err());
        assert!(v.ensure_positive_int(&json!({"page": -2}), "page", 1).is_err());
    }

    #[test]
    fn accent_color_is_normalized() {
        let v = Validation::new();
        assert_eq!(v.normalize_accent_color("FF5500").expect("ok"), "#ff5500");
        assert_eq!(v.normalize_accent_color("#00aa11").expect("ok"), "#00aa11");
        assert!(v.normalize_accent_color("#fff").is_err());
        assert!(v.normalize_accent_color("zzzzzz").is_err());
    }

    #[test]
    fn tag_refs_accept_names_and_objects() {
        let v = Validation::new();
        let tags = v
            .normalize_tag_refs(Some(&json!(["news", {"name": "Rust"}])))
            .expect("tags")
            .expect("present");
        assert_eq!(tags, vec![json!({"name": "news"}), json!({"name": "Rust"})]);
        assert!(v.normalize_tag_refs(Some(&json!([42]))).is_err());
        assert!(v.normalize_tag_refs(None).expect("none").is_none());
    }

    #[test]
    fn optional_text_keeps_empty_strings() {
        let v = Validation::new();
        let args = json!({"title": "", "x": null, "n": 3});
        assert_eq!(v.optional_text(&args, "title").expect("ok"), Some(String::new()));
        assert_eq!(v.optional_non_empty(&args, "title").expect("ok"), None);
        assert_eq!(v.optional_text(&args, "x").expect("ok"), None);
        assert!(v.optional_text(&args, "n").is_err());
    }
}
