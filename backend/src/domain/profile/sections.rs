//! Profile section schemas.
//!
//! Each section is a fixed struct; together they form the tagged union that
//! replaces the loosely-typed preference document of the original system.
//! Sections are the unit of independent update: a patch replaces exactly one
//! section and never touches the others.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the five independently updatable profile sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProfileSection {
    Dietary,
    Budget,
    Cooking,
    Nutritional,
    Personal,
}

impl ProfileSection {
    /// Returns the wire/storage string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dietary => "dietary",
            Self::Budget => "budget",
            Self::Cooking => "cooking",
            Self::Nutritional => "nutritional",
            Self::Personal => "personal",
        }
    }

    /// All sections, in completion-accounting order.
    pub fn all() -> [Self; 5] {
        [
            Self::Dietary,
            Self::Budget,
            Self::Cooking,
            Self::Nutritional,
            Self::Personal,
        ]
    }
}

impl std::fmt::Display for ProfileSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported cooking skill level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum CookingExperience {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Dietary restrictions and allergies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct DietarySection {
    /// Restriction labels such as `vegan` or `gluten_free`.
    pub restrictions: Vec<String>,
    /// Ingredient allergies to exclude from suggestions.
    pub allergies: Vec<String>,
}

/// Weekly food budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSection {
    /// Weekly amount in the stated currency; must not be negative.
    pub weekly_amount: f64,
    /// ISO currency code.
    pub currency: String,
}

/// Cooking experience and kitchen equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CookingSection {
    pub experience: CookingExperience,
    /// Equipment labels such as `oven` or `slow_cooker`.
    pub equipment: Vec<String>,
    /// Upper bound on acceptable preparation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_prep_minutes: Option<u32>,
}

/// Nutritional goals as macro fractions of daily intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<u32>,
    /// Protein fraction in `[0, 1]`.
    pub protein: f64,
    /// Carbohydrate fraction in `[0, 1]`.
    pub carbs: f64,
    /// Fat fraction in `[0, 1]`.
    pub fat: f64,
}

/// Personal details also mirrored to the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonalSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Number of people eating; at least one.
    pub household_size: u32,
}

/// Validation failures detected before any store write.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SectionValidationError {
    #[error("{section} entries must not be blank")]
    BlankEntry { section: ProfileSection },
    #[error("weekly budget must not be negative (got {amount})")]
    NegativeBudget { amount: f64 },
    #[error("budget currency must not be empty")]
    EmptyCurrency,
    #[error("{field} fraction must lie between 0 and 1 (got {value})")]
    MacroOutOfRange { field: &'static str, value: f64 },
    #[error("macro fractions must not sum above 1.0 (got {total:.2})")]
    MacroSplitOverflow { total: f64 },
    #[error("household size must be at least 1")]
    ZeroHouseholdSize,
}

impl SectionValidationError {
    /// Machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankEntry { .. } => "blank_entry",
            Self::NegativeBudget { .. } => "negative_budget",
            Self::EmptyCurrency => "empty_currency",
            Self::MacroOutOfRange { .. } => "macro_out_of_range",
            Self::MacroSplitOverflow { .. } => "macro_split_overflow",
            Self::ZeroHouseholdSize => "zero_household_size",
        }
    }
}

fn check_entries(
    entries: &[String],
    section: ProfileSection,
) -> Result<(), SectionValidationError> {
    if entries.iter().any(|entry| entry.trim().is_empty()) {
        return Err(SectionValidationError::BlankEntry { section });
    }
    Ok(())
}

impl DietarySection {
    /// Validate the section contents.
    pub fn validate(&self) -> Result<(), SectionValidationError> {
        check_entries(&self.restrictions, ProfileSection::Dietary)?;
        check_entries(&self.allergies, ProfileSection::Dietary)
    }
}

impl BudgetSection {
    /// Validate the section contents.
    pub fn validate(&self) -> Result<(), SectionValidationError> {
        if self.weekly_amount < 0.0 {
            return Err(SectionValidationError::NegativeBudget {
                amount: self.weekly_amount,
            });
        }
        if self.currency.trim().is_empty() {
            return Err(SectionValidationError::EmptyCurrency);
        }
        Ok(())
    }
}

impl CookingSection {
    /// Validate the section contents.
    pub fn validate(&self) -> Result<(), SectionValidationError> {
        check_entries(&self.equipment, ProfileSection::Cooking)
    }
}

impl NutritionalSection {
    /// Validate the section contents.
    ///
    /// Each macro fraction must lie in `[0, 1]` and together they must not
    /// exceed a whole intake.
    pub fn validate(&self) -> Result<(), SectionValidationError> {
        for (field, value) in [
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SectionValidationError::MacroOutOfRange { field, value });
            }
        }
        let total = self.protein + self.carbs + self.fat;
        if total > 1.0 + f64::EPSILON {
            return Err(SectionValidationError::MacroSplitOverflow { total });
        }
        Ok(())
    }
}

impl PersonalSection {
    /// Validate the section contents.
    pub fn validate(&self) -> Result<(), SectionValidationError> {
        if self.household_size == 0 {
            return Err(SectionValidationError::ZeroHouseholdSize);
        }
        Ok(())
    }
}

/// A request to replace one profile section.
///
/// Wire form is the tagged pair the REST surface uses:
/// `{"section": "dietary", "patch": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "section", content = "patch", rename_all = "snake_case")]
pub enum SectionPatch {
    Dietary(DietarySection),
    Budget(BudgetSection),
    Cooking(CookingSection),
    Nutritional(NutritionalSection),
    Personal(PersonalSection),
}

impl SectionPatch {
    /// The section this patch replaces.
    pub fn section(&self) -> ProfileSection {
        match self {
            Self::Dietary(_) => ProfileSection::Dietary,
            Self::Budget(_) => ProfileSection::Budget,
            Self::Cooking(_) => ProfileSection::Cooking,
            Self::Nutritional(_) => ProfileSection::Nutritional,
            Self::Personal(_) => ProfileSection::Personal,
        }
    }

    /// Validate the patch against its section schema.
    pub fn validate(&self) -> Result<(), SectionValidationError> {
        match self {
            Self::Dietary(section) => section.validate(),
            Self::Budget(section) => section.validate(),
            Self::Cooking(section) => section.validate(),
            Self::Nutritional(section) => section.validate(),
            Self::Personal(section) => section.validate(),
        }
    }
}
