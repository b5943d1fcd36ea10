//! Form types and field-level validation.
//!
//! Each form deserializes every field as a plain string (missing fields become
//! empty) so that bad input is reported next to the field instead of failing
//! extraction. Length rules are declared with `validator`; parsing rules
//! (price, category, URL, store id) are checked by hand and merged into the
//! same [`FormErrors`].

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use grocery_core::{ItemCategory, Price, StoreId, Username};

use crate::models::{GroceryItem, GroceryStore, NewItem, NewStore};
use crate::services::auth::validate_password;

/// Field name → messages, in a stable order for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    /// An empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Whether no field has an error.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the given field has at least one error.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// All messages for a field.
    #[must_use]
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// The first message for a field, for inline display.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.messages(field).first().map(String::as_str)
    }

    /// Errors not tied to a single field (e.g. bad credentials).
    #[must_use]
    pub fn general(&self) -> &[String] {
        self.messages(GENERAL)
    }

    /// Record an error not tied to a single field.
    pub fn add_general(&mut self, message: impl Into<String>) {
        self.add(GENERAL, message);
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Pseudo-field for form-wide errors.
const GENERAL: &str = "__all__";

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = Self::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .clone()
                    .unwrap_or_else(|| Cow::Owned(format!("{field} is invalid")));
                out.add(field.to_string(), message);
            }
        }
        out
    }
}

/// Run the declarative rules, collecting failures instead of returning early.
fn declared_errors(form: &impl Validate) -> FormErrors {
    form.validate().map_or_else(FormErrors::from, |()| FormErrors::new())
}

// =============================================================================
// Store
// =============================================================================

/// Store create/edit form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct StoreForm {
    #[validate(length(min = 3, max = 80, message = "Title must be between 3 and 80 characters"))]
    pub title: String,
    #[validate(length(min = 3, max = 200, message = "Address must be between 3 and 200 characters"))]
    pub address: String,
}

impl StoreForm {
    /// Pre-populate the form from an existing store.
    #[must_use]
    pub fn from_store(store: &GroceryStore) -> Self {
        Self {
            title: store.title.clone(),
            address: store.address.clone(),
        }
    }

    /// Validate the submission.
    ///
    /// # Errors
    ///
    /// Returns the field-level errors if any rule fails.
    pub fn parse(&self) -> Result<NewStore, FormErrors> {
        let trimmed = Self {
            title: self.title.trim().to_owned(),
            address: self.address.trim().to_owned(),
        };

        declared_errors(&trimmed).into_result(NewStore {
            title: trimmed.title,
            address: trimmed.address,
        })
    }
}

// =============================================================================
// Item
// =============================================================================

/// Item create/edit form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ItemForm {
    #[validate(length(min = 3, max = 80, message = "Name must be between 3 and 80 characters"))]
    pub name: String,
    pub price: String,
    pub category: String,
    #[validate(length(max = 500, message = "Photo URL must be at most 500 characters"))]
    pub photo_url: String,
    pub store_id: String,
}

impl ItemForm {
    /// Pre-populate the form from an existing item.
    #[must_use]
    pub fn from_item(item: &GroceryItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price.to_input_value(),
            category: item.category.as_str().to_owned(),
            photo_url: item.photo_url.clone().unwrap_or_default(),
            store_id: item.store_id.to_string(),
        }
    }

    /// Validate the submission.
    ///
    /// Whether the chosen store exists is checked by the caller, which has the
    /// database at hand.
    ///
    /// # Errors
    ///
    /// Returns the field-level errors if any rule fails.
    pub fn parse(&self) -> Result<NewItem, FormErrors> {
        let trimmed = Self {
            name: self.name.trim().to_owned(),
            price: self.price.trim().to_owned(),
            category: self.category.trim().to_owned(),
            photo_url: self.photo_url.trim().to_owned(),
            store_id: self.store_id.trim().to_owned(),
        };

        let mut errors = declared_errors(&trimmed);

        let price = Price::parse(&trimmed.price)
            .map_err(|e| errors.add("price", capitalize(&e.to_string())))
            .ok();

        let category = if trimmed.category.is_empty() {
            errors.add("category", "Choose a category");
            None
        } else {
            ItemCategory::parse(&trimmed.category)
                .map_err(|_| errors.add("category", "Choose one of the listed categories"))
                .ok()
        };

        let photo_url = if trimmed.photo_url.is_empty() {
            None
        } else if is_http_url(&trimmed.photo_url) {
            Some(trimmed.photo_url.clone())
        } else {
            errors.add("photo_url", "Photo URL must be an http(s) address");
            None
        };

        let store_id = trimmed
            .store_id
            .parse::<i64>()
            .map(StoreId::new)
            .map_err(|_| errors.add("store_id", "Choose a store"))
            .ok();

        match (price, category, store_id) {
            (Some(price), Some(category), Some(store_id)) if errors.is_empty() => Ok(NewItem {
                name: trimmed.name,
                price,
                category,
                photo_url,
                store_id,
            }),
            _ => Err(errors),
        }
    }
}

fn is_http_url(s: &str) -> bool {
    url::Url::parse(s)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

// =============================================================================
// Auth
// =============================================================================

/// Sign up form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupForm {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,
}

impl SignupForm {
    /// Validate the submission. Uniqueness is checked by the auth service.
    ///
    /// # Errors
    ///
    /// Returns the field-level errors if any rule fails.
    pub fn check(&self) -> Result<(), FormErrors> {
        let trimmed = Self {
            username: self.username.trim().to_owned(),
            password: self.password.clone(),
        };

        let mut errors = declared_errors(&trimmed);

        if !errors.has("username")
            && let Err(e) = Username::parse(&trimmed.username)
        {
            errors.add("username", capitalize(&e.to_string()));
        }

        if !errors.has("password")
            && let Err(e) = validate_password(&trimmed.password)
        {
            errors.add("password", e.to_string());
        }

        errors.into_result(())
    }
}

/// Login form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginForm {
    /// Check required fields. Credentials are verified by the auth service.
    ///
    /// # Errors
    ///
    /// Returns the field-level errors if a field is empty.
    pub fn check(&self) -> Result<(), FormErrors> {
        let trimmed = Self {
            username: self.username.trim().to_owned(),
            password: self.password.clone(),
        };
        declared_errors(&trimmed).into_result(())
    }
}
