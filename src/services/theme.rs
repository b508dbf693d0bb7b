//! Page theme objects: a built-in default plus an optional per-user override
//! stored as JSON in object storage under `themes/<username>.json`.

use serde_json::{Map, Value, json};
use std::time::Duration;

use crate::cache::{SharedCache, keys};
use crate::error::AppError;
use crate::services::validation::{is_valid_color, normalize_username};
use crate::storage::{SharedStorage, StorageError};

const THEME_PREFIX: &str = "themes/";
const SECTIONS: &[&str] = &["colors", "header", "footer", "fonts"];
const MAX_OVERRIDE_BYTES: usize = 64 * 1024;

pub fn default_theme() -> Value {
    json!({
        "colors": {
            "primary": "#3b82f6",
            "secondary": "#8b5cf6",
            "accent": "#f59e0b",
            "background": "#ffffff",
            "text": "#1f2937"
        },
        "header": {
            "title": "My Portfolio",
            "showLogo": true,
            "sticky": true,
            "menuLinks": [
                { "label": "หน้าแรก", "href": "#hero" },
                { "label": "เกี่ยวกับ", "href": "#about" },
                { "label": "ผลงาน", "href": "#portfolio" },
                { "label": "ติดต่อ", "href": "#contact" }
            ]
        },
        "footer": {
            "text": "© My Portfolio",
            "showSocial": true,
            "socialLinks": []
        },
        "fonts": {
            "heading": "Prompt, sans-serif",
            "body": "Sarabun, sans-serif"
        }
    })
}

/// Overlay `overlay` onto `base`. Objects merge key by key; arrays and
/// scalars replace the base value wholesale. `null` in the overlay keeps the base.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in overlay_map {
                let next = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None if value.is_null() => continue,
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, Value::Null) => base.clone(),
        (_, other) => other.clone(),
    }
}

/// Shape check for a user override before it is stored.
pub fn validate_override(value: &Value) -> Result<(), AppError> {
    let Some(map) = value.as_object() else {
        return Err(AppError::Validation(vec!["ธีมต้องเป็นออบเจ็กต์ JSON".to_string()]));
    };

    let mut errors = Vec::new();
    if serde_json::to_vec(value).map(|b| b.len()).unwrap_or(usize::MAX) > MAX_OVERRIDE_BYTES {
        errors.push("ข้อมูลธีมมีขนาดใหญ่เกินไป".to_string());
    }
    for (key, section) in map {
        if !SECTIONS.contains(&key.as_str()) {
            errors.push(format!("ไม่รู้จักส่วนของธีม: {key}"));
            continue;
        }
        if !section.is_object() && !section.is_null() {
            errors.push(format!("ส่วน {key} ต้องเป็นออบเจ็กต์"));
        }
    }

    if let Some(colors) = map.get("colors").and_then(Value::as_object) {
        for (name, color) in colors {
            if !color.as_str().is_some_and(is_valid_color) {
                errors.push(format!("สี {name} ต้องเป็นรหัสสี hex"));
            }
        }
    }
    for (section, list) in [("header", "menuLinks"), ("footer", "socialLinks")] {
        let links = map.get(section).and_then(|s| s.get(list));
        if let Some(links) = links.filter(|l| !l.is_null()) {
            let well_formed = links.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|i| i.get("href").is_some_and(Value::is_string))
            });
            if !well_formed {
                errors.push(format!("{section}.{list} ต้องเป็นรายการลิงก์ที่มี href"));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

/// Storage key holding a user's override.
pub fn theme_key(username: &str) -> String {
    format!("{THEME_PREFIX}{}.json", normalize_username(username))
}

/// Loads overrides from object storage and merges them onto the default.
/// Misses are remembered for `not_found_ttl` so pages without a custom theme
/// do not hit storage on every request.
#[derive(Clone)]
pub struct ThemeResolver {
    storage: SharedStorage,
    cache: SharedCache,
    not_found_ttl: Duration,
}

impl ThemeResolver {
    pub fn new(storage: SharedStorage, cache: SharedCache, not_found_ttl: Duration) -> Self {
        Self {
            storage,
            cache,
            not_found_ttl,
        }
    }

    pub async fn resolve(&self, username: &str) -> Value {
        let defaults = default_theme();
        match self.load_override(username).await {
            Some(overlay) => deep_merge(&defaults, &overlay),
            None => defaults,
        }
    }

    /// The stored override, if any. Storage failures degrade to `None`.
    pub async fn load_override(&self, username: &str) -> Option<Value> {
        let username = normalize_username(username);
        if username.is_empty() {
            return None;
        }
        let miss_key = keys::theme_missing(&username);
        match self.cache.get(&miss_key).await {
            Ok(Some(_)) => return None,
            Ok(None) => {}
            Err(e) => tracing::warn!(username, "theme cache read failed: {e}"),
        }

        let key = theme_key(&username);
        match self.storage.get(&key).await {
            Ok(object) => match serde_json::from_slice::<Value>(&object.bytes) {
                Ok(value) if value.is_object() => Some(value),
                Ok(_) | Err(_) => {
                    tracing::warn!(key, "stored theme is not a JSON object, using default");
                    None
                }
            },
            Err(StorageError::NotFound(_)) => {
                if let Err(e) = self
                    .cache
                    .set(&miss_key, Value::Bool(true), self.not_found_ttl)
                    .await
                {
                    tracing::warn!(username, "theme cache write failed: {e}");
                }
                None
            }
            Err(e) => {
                tracing::error!(key, error = %e, "failed to load theme override, using default");
                None
            }
        }
    }

    /// Validate and persist an override, returning the merged theme.
    pub async fn save_override(&self, username: &str, overlay: Value) -> Result<Value, AppError> {
        validate_override(&overlay)?;
        let key = theme_key(username);
        let bytes = serde_json::to_vec(&overlay)
            .map_err(|e| AppError::Internal(format!("serialize theme: {e}")))?;
        self.storage.put(&key, bytes, "application/json").await?;

        let miss_key = keys::theme_missing(&normalize_username(username));
        if let Err(e) = self.cache.delete(&miss_key).await {
            tracing::warn!(username, "theme cache invalidation failed: {e}");
        }
        Ok(deep_merge(&default_theme(), &overlay))
    }
}
