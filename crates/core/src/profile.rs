//! Profile domain type and the field alias table.
//!
//! The profile is a flat record of optional typed fields. Users address
//! fields by Spanish or English aliases (`/profile peso 70`); the alias
//! table maps each spelling to one canonical field with an expected type.
//! Numeric fields reject unparseable input, leaving the prior value intact.

use serde::{Deserialize, Serialize};

use crate::error::WardrobeError;

/// The user profile: body metrics, style notes, city, daily-outfit flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_weight_kg: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undertone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair: Option<String>,

    /// City used for the weather lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Free-text style description included in every AI context
    #[serde(default = "default_style_notes")]
    pub style_notes: String,

    /// Free-text outfit preferences included in every AI context
    #[serde(default = "default_preferences")]
    pub preferences: String,

    /// Whether the daily outfit job should fire
    #[serde(default)]
    pub daily_enabled: bool,
}

fn default_style_notes() -> String {
    "Estilo casual con toques urbanos. Quiere verse bien sin esfuerzo.".into()
}

fn default_preferences() -> String {
    "Prefiere outfits simples pero con un detalle que destaque.".into()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            age: None,
            height_cm: None,
            weight_kg: None,
            target_weight_kg: None,
            skin_tone: None,
            undertone: None,
            hair: None,
            city: None,
            style_notes: default_style_notes(),
            preferences: default_preferences(),
            daily_enabled: false,
        }
    }
}

/// A canonical profile field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Age,
    HeightCm,
    WeightKg,
    TargetWeightKg,
    SkinTone,
    Undertone,
    Hair,
    City,
}

/// All fields, in render order.
pub const ALL_FIELDS: [ProfileField; 8] = [
    ProfileField::Age,
    ProfileField::HeightCm,
    ProfileField::WeightKg,
    ProfileField::TargetWeightKg,
    ProfileField::SkinTone,
    ProfileField::Undertone,
    ProfileField::Hair,
    ProfileField::City,
];

impl ProfileField {
    /// Resolve a user-typed alias (Spanish or English) to a canonical field.
    pub fn resolve(alias: &str) -> Option<Self> {
        match alias.trim().to_lowercase().as_str() {
            "peso" | "weight" => Some(Self::WeightKg),
            "meta" | "target" => Some(Self::TargetWeightKg),
            "edad" | "age" => Some(Self::Age),
            "pelo" | "hair" | "cabello" => Some(Self::Hair),
            "tono" | "skin" => Some(Self::SkinTone),
            "subtono" | "undertone" => Some(Self::Undertone),
            "estatura" | "height" => Some(Self::HeightCm),
            "ciudad" | "city" => Some(Self::City),
            _ => None,
        }
    }

    /// Canonical key, as persisted and shown in confirmations.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::HeightCm => "height_cm",
            Self::WeightKg => "weight_kg",
            Self::TargetWeightKg => "target_weight_kg",
            Self::SkinTone => "skin_tone",
            Self::Undertone => "undertone",
            Self::Hair => "hair",
            Self::City => "city",
        }
    }

    /// Aliases accepted for this field, for usage messages.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Age => &["edad", "age"],
            Self::HeightCm => &["estatura", "height"],
            Self::WeightKg => &["peso", "weight"],
            Self::TargetWeightKg => &["meta", "target"],
            Self::SkinTone => &["tono", "skin"],
            Self::Undertone => &["subtono", "undertone"],
            Self::Hair => &["pelo", "hair", "cabello"],
            Self::City => &["ciudad", "city"],
        }
    }
}

/// A typed profile field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(u32),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl Profile {
    /// Set a field from raw user text, coercing to the field's type.
    ///
    /// Numeric fields fail with `InvalidValue` when the text does not parse;
    /// the prior value is left untouched. String fields accept any text.
    pub fn set(
        &mut self,
        field: ProfileField,
        raw: &str,
    ) -> std::result::Result<FieldValue, WardrobeError> {
        let raw = raw.trim();
        let invalid = || WardrobeError::InvalidValue {
            field: field.key().into(),
            value: raw.into(),
        };

        let value = match field {
            ProfileField::Age => {
                let v: u32 = raw.parse().map_err(|_| invalid())?;
                self.age = Some(v);
                FieldValue::Integer(v)
            }
            ProfileField::HeightCm => {
                let v: f64 = raw.parse().map_err(|_| invalid())?;
                self.height_cm = Some(v);
                FieldValue::Float(v)
            }
            ProfileField::WeightKg => {
                let v: f64 = raw.parse().map_err(|_| invalid())?;
                self.weight_kg = Some(v);
                FieldValue::Float(v)
            }
            ProfileField::TargetWeightKg => {
                let v: f64 = raw.parse().map_err(|_| invalid())?;
                self.target_weight_kg = Some(v);
                FieldValue::Float(v)
            }
            ProfileField::SkinTone => {
                self.skin_tone = Some(raw.into());
                FieldValue::Text(raw.into())
            }
            ProfileField::Undertone => {
                self.undertone = Some(raw.into());
                FieldValue::Text(raw.into())
            }
            ProfileField::Hair => {
                self.hair = Some(raw.into());
                FieldValue::Text(raw.into())
            }
            ProfileField::City => {
                self.city = Some(raw.into());
                FieldValue::Text(raw.into())
            }
        };

        Ok(value)
    }

    /// Read a field, if set.
    pub fn get(&self, field: ProfileField) -> Option<FieldValue> {
        match field {
            ProfileField::Age => self.age.map(FieldValue::Integer),
            ProfileField::HeightCm => self.height_cm.map(FieldValue::Float),
            ProfileField::WeightKg => self.weight_kg.map(FieldValue::Float),
            ProfileField::TargetWeightKg => self.target_weight_kg.map(FieldValue::Float),
            ProfileField::SkinTone => self.skin_tone.clone().map(FieldValue::Text),
            ProfileField::Undertone => self.undertone.clone().map(FieldValue::Text),
            ProfileField::Hair => self.hair.clone().map(FieldValue::Text),
            ProfileField::City => self.city.clone().map(FieldValue::Text),
        }
    }

    /// Render a field for display, substituting `?` when absent.
    pub fn render(&self, field: ProfileField) -> String {
        self.get(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "?".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alias_table_resolves_both_languages() {
        assert_eq!(ProfileField::resolve("peso"), Some(ProfileField::WeightKg));
        assert_eq!(ProfileField::resolve("weight"), Some(ProfileField::WeightKg));
        assert_eq!(ProfileField::resolve("PELO"), Some(ProfileField::Hair));
        assert_eq!(ProfileField::resolve("cabello"), Some(ProfileField::Hair));
        assert_eq!(ProfileField::resolve("ciudad"), Some(ProfileField::City));
        assert_eq!(ProfileField::resolve("zapato"), None);
    }

    #[test]
    fn every_alias_resolves_to_its_field() {
        for field in ALL_FIELDS {
            for alias in field.aliases() {
                assert_eq!(ProfileField::resolve(alias), Some(field), "alias {alias}");
            }
        }
    }

    #[test]
    fn numeric_field_accepts_number() {
        let mut profile = Profile::default();
        let v = profile.set(ProfileField::WeightKg, "70").unwrap();
        assert_eq!(v, FieldValue::Float(70.0));
        assert_eq!(profile.weight_kg, Some(70.0));
    }

    #[test]
    fn numeric_field_rejects_text_and_keeps_prior_value() {
        let mut profile = Profile::default();
        profile.set(ProfileField::WeightKg, "68.5").unwrap();

        let err = profile.set(ProfileField::WeightKg, "abc").unwrap_err();
        assert!(matches!(err, WardrobeError::InvalidValue { .. }));
        assert_eq!(profile.weight_kg, Some(68.5));
    }

    #[test]
    fn age_is_integer_typed() {
        let mut profile = Profile::default();
        assert!(profile.set(ProfileField::Age, "36").is_ok());
        assert!(profile.set(ProfileField::Age, "36.5").is_err());
        assert_eq!(profile.age, Some(36));
    }

    #[test]
    fn string_field_accepts_any_text() {
        let mut profile = Profile::default();
        let v = profile.set(ProfileField::Hair, "corto pixie").unwrap();
        assert_eq!(v, FieldValue::Text("corto pixie".into()));
    }

    #[test]
    fn absent_field_renders_placeholder() {
        let profile = Profile::default();
        assert_eq!(profile.render(ProfileField::Age), "?");
    }
}
