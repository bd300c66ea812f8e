use std::collections::HashMap;

use crate::constants::keys;

/// Formats user-facing strings by key.
pub trait Localizer: Send + Sync {
    fn string(&self, key: &str) -> String;

    /// Substitute `{0}`, `{1}`, ... in the string for `key`.
    fn format(&self, key: &str, args: &[&str]) -> String {
        let mut text = self.string(key);
        for (index, arg) in args.iter().enumerate() {
            text = text.replace(&format!("{{{index}}}"), arg);
        }
        text
    }
}

const EN: &[(&str, &str)] = &[
    (keys::RECEIVED_MESSAGES, "You received {0} messages"),
    (keys::MEMBER_SAYS, "{0} says:"),
    (keys::MEMBER_SAYS_IN_GROUP, "{0} said in {1}:"),
    (keys::FILE_TITLE, "File: {0}"),
    (keys::IMAGE_TITLE, "Image"),
    (keys::MEMBER_LIST_SEPARATOR, ", "),
    (keys::UNKNOWN_MEMBER, "Unknown member"),
];

const ZH_CN: &[(&str, &str)] = &[
    (keys::RECEIVED_MESSAGES, "你收到 {0} 条新消息"),
    (keys::MEMBER_SAYS, "{0} 说："),
    (keys::MEMBER_SAYS_IN_GROUP, "{0} 在 {1} 中说："),
    (keys::FILE_TITLE, "文件 {0}"),
    (keys::IMAGE_TITLE, "图片"),
    (keys::MEMBER_LIST_SEPARATOR, "、"),
    (keys::UNKNOWN_MEMBER, "未知成员"),
];

/// Built-in string tables with per-key overrides
#[derive(Debug, Clone)]
pub struct Lang {
    locale: String,
    strings: HashMap<String, String>,
}

impl Lang {
    /// Tables for `locale`; unknown locales use English.
    pub fn new(locale: &str) -> Self {
        let table = match locale.to_ascii_lowercase().as_str() {
            "zh-cn" | "zh" => ZH_CN,
            _ => EN,
        };
        let mut strings: HashMap<String, String> = EN
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (key, value) in table {
            strings.insert(key.to_string(), value.to_string());
        }
        Self {
            locale: locale.to_string(),
            strings,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.strings.insert(key.into(), value.into());
    }

    /// Apply overrides from a flat JSON object of `key: string` pairs.
    pub fn extend_from_json(&mut self, json: &str) -> Result<(), serde_json::Error> {
        let overrides: HashMap<String, String> = serde_json::from_str(json)?;
        self.strings.extend(overrides);
        Ok(())
    }
}

impl Default for Lang {
    fn default() -> Self {
        Self::new("en")
    }
}

impl Localizer for Lang {
    fn string(&self, key: &str) -> String {
        self.strings
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_substitutes_positional_args() {
        let lang = Lang::default();
        assert_eq!(
            lang.format(keys::MEMBER_SAYS_IN_GROUP, &["Alice", "Team"]),
            "Alice said in Team:"
        );
        assert_eq!(lang.format(keys::RECEIVED_MESSAGES, &["3"]), "You received 3 messages");
    }

    #[test]
    fn test_missing_key_returns_key() {
        let lang = Lang::default();
        assert_eq!(lang.string("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_locale_tables_and_overrides() {
        let mut lang = Lang::new("zh-CN");
        assert_eq!(lang.string(keys::IMAGE_TITLE), "图片");

        lang.extend_from_json(r#"{"file.image.title": "Picture"}"#).unwrap();
        assert_eq!(lang.string(keys::IMAGE_TITLE), "Picture");

        let fallback = Lang::new("fr");
        assert_eq!(fallback.string(keys::IMAGE_TITLE), "Image");
    }
}
