//! Material editor form state and its client-side checks.

use std::borrow::Cow;
use std::collections::BTreeMap;

use shared_types::{Career, Material, MaterialFields};
use validator::{Validate, ValidationError};

use crate::error::ClientResult;

/// Raw editor inputs. `career` is empty until a program is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct MaterialForm {
    #[validate(custom(function = "required"))]
    pub title: String,
    #[validate(custom(function = "known_career"))]
    pub career: String,
    #[validate(url(message = "Ingresa un enlace válido (https://...)"))]
    pub url: String,
    pub author: String,
}

impl MaterialForm {
    pub fn from_material(material: &Material) -> Self {
        Self {
            title: material.title.clone(),
            career: material.career.as_str().to_string(),
            url: material.url.clone(),
            author: material.author.clone(),
        }
    }

    /// Validate and convert to the fields written to the backend.
    pub fn to_fields(&self) -> ClientResult<MaterialFields> {
        self.validate()?;
        let career = self
            .career
            .parse::<Career>()
            .map_err(crate::error::ClientError::Validation)?;

        Ok(MaterialFields {
            title: self.title.clone(),
            career,
            url: self.url.trim().to_string(),
            author: self.author.clone(),
        })
    }

    /// Inline message per invalid field, keyed by field name. Empty when valid.
    pub fn field_messages(&self) -> BTreeMap<String, String> {
        let Err(errors) = self.validate() else {
            return BTreeMap::new();
        };
        errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errors)| {
                let first = errors.first()?;
                let message = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| first.code.to_string());
                Some((field.to_string(), message))
            })
            .collect()
    }
}

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed("Campo obligatorio")));
    }
    Ok(())
}

fn known_career(value: &str) -> Result<(), ValidationError> {
    if value.parse::<Career>().is_err() {
        return Err(ValidationError::new("career").with_message(Cow::Borrowed("Selecciona carrera...")));
    }
    Ok(())
}
