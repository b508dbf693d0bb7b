//! Field validation for request DTOs. Failures are collected so one 400
//! response can list every problem at once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::AppError;
use crate::models::{
    contact_messages::CreateContactMessage, edit_histories::CreateEditHistory,
    site_settings::UpdateSettings, theme_preferences::UpdateThemePreference,
    users::RegisterRequest,
};

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_]{3,30}$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());

/// Canonical form of a username: trimmed and lowercased.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_valid_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw.trim())
}

pub fn is_valid_color(raw: &str) -> bool {
    COLOR_RE.is_match(raw.trim())
}

/// Collects messages; `finish` turns a non-empty list into [`AppError::Validation`].
#[derive(Debug, Default)]
pub struct Validator {
    messages: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.messages.push(message.to_string());
        }
        self
    }

    pub fn required(&mut self, value: &str, message: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), message)
    }

    pub fn max_len(&mut self, value: &str, max: usize, message: &str) -> &mut Self {
        self.check(value.chars().count() <= max, message)
    }

    pub fn color(&mut self, value: Option<&str>, message: &str) -> &mut Self {
        self.check(value.is_none_or(is_valid_color), message)
    }

    pub fn finish(&mut self) -> Result<(), AppError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(std::mem::take(&mut self.messages)))
        }
    }
}

/// Boundary validation for request bodies.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AppError> {
        let username = normalize_username(&self.username);
        Validator::new()
            .required(&username, "กรุณากรอกชื่อผู้ใช้")
            .check(
                username.is_empty() || USERNAME_RE.is_match(&username),
                "ชื่อผู้ใช้ต้องมี 3-30 ตัวอักษร ประกอบด้วย a-z 0-9 หรือ _ เท่านั้น",
            )
            .required(&self.email, "กรุณากรอกอีเมล")
            .check(
                self.email.trim().is_empty() || is_valid_email(&self.email),
                "รูปแบบอีเมลไม่ถูกต้อง",
            )
            .check(
                self.password.chars().count() >= 6,
                "รหัสผ่านต้องมีอย่างน้อย 6 ตัวอักษร",
            )
            .max_len(&self.password, 72, "รหัสผ่านต้องไม่เกิน 72 ตัวอักษร")
            .finish()
    }
}

impl Validate for CreateContactMessage {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .required(&self.name, "กรุณากรอกชื่อ")
            .max_len(&self.name, 100, "ชื่อต้องไม่เกิน 100 ตัวอักษร")
            .required(&self.email, "กรุณากรอกอีเมล")
            .check(
                self.email.trim().is_empty() || is_valid_email(&self.email),
                "รูปแบบอีเมลไม่ถูกต้อง",
            )
            .required(&self.message, "กรุณากรอกข้อความ")
            .max_len(&self.message, 5000, "ข้อความต้องไม่เกิน 5000 ตัวอักษร")
            .finish()
    }
}

impl Validate for UpdateSettings {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        if let Some(title) = &self.site_title {
            v.max_len(title, 100, "ชื่อเว็บไซต์ต้องไม่เกิน 100 ตัวอักษร");
        }
        if let Some(items) = &self.menu_items {
            v.check(items.len() <= 20, "เมนูต้องมีไม่เกิน 20 รายการ");
            v.check(
                items.iter().all(|i| !i.label.trim().is_empty()),
                "ชื่อเมนูต้องไม่ว่าง",
            );
        }
        v.color(self.primary_color.as_deref(), "สีหลักต้องเป็นรหัสสี hex")
            .color(self.secondary_color.as_deref(), "สีรองต้องเป็นรหัสสี hex")
            .color(self.background_color.as_deref(), "สีพื้นหลังต้องเป็นรหัสสี hex")
            .color(self.text_color.as_deref(), "สีตัวอักษรต้องเป็นรหัสสี hex")
            .finish()
    }
}

impl Validate for UpdateThemePreference {
    fn validate(&self) -> Result<(), AppError> {
        let mut v = Validator::new();
        if let Some(font) = &self.font_family {
            v.max_len(font, 100, "ชื่อฟอนต์ต้องไม่เกิน 100 ตัวอักษร");
        }
        v.color(self.primary_color.as_deref(), "สีหลักต้องเป็นรหัสสี hex")
            .color(self.secondary_color.as_deref(), "สีรองต้องเป็นรหัสสี hex")
            .color(self.accent_color.as_deref(), "สีเน้นต้องเป็นรหัสสี hex")
            .color(self.background_color.as_deref(), "สีพื้นหลังต้องเป็นรหัสสี hex")
            .color(self.text_color.as_deref(), "สีตัวอักษรต้องเป็นรหัสสี hex")
            .finish()
    }
}

impl Validate for CreateEditHistory {
    fn validate(&self) -> Result<(), AppError> {
        Validator::new()
            .required(&self.page, "กรุณาระบุหน้า")
            .required(&self.section, "กรุณาระบุส่วน")
            .required(&self.action, "กรุณาระบุการกระทำ")
            .max_len(&self.page, 100, "ชื่อหน้าต้องไม่เกิน 100 ตัวอักษร")
            .max_len(&self.section, 100, "ชื่อส่วนต้องไม่เกิน 100 ตัวอักษร")
            .max_len(&self.action, 50, "การกระทำต้องไม่เกิน 50 ตัวอักษร")
            .finish()
    }
}
