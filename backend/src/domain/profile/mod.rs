//! Preference document aggregate and profile completion accounting.
//!
//! The document is the single per-user record held by the document store.
//! Each of its five sections is optional and replaced independently; absent
//! sections read as defaults and contribute nothing to completion.

mod diff;
mod sections;

pub use diff::{changed_fields, FieldChange};
pub use sections::{
    BudgetSection, CookingExperience, CookingSection, DietarySection, NutritionalSection,
    PersonalSection, ProfileSection, SectionPatch, SectionValidationError,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Number of required profile fields across all sections.
///
/// Dietary contributes one (restrictions), budget two (amount, currency),
/// cooking two (experience, equipment), nutrition three (the macro split),
/// and personal two (first name, household size).
pub const REQUIRED_FIELD_TOTAL: u32 = 10;

/// Per-user preference document, one per user, created lazily on the first
/// section write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary: Option<DietarySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooking: Option<CookingSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutritional: Option<NutritionalSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal: Option<PersonalSection>,
    pub updated_at: DateTime<Utc>,
}

impl PreferenceDocument {
    /// An empty document with no sections filled.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            dietary: None,
            budget: None,
            cooking: None,
            nutritional: None,
            personal: None,
            updated_at: now,
        }
    }

    /// Replace one section, leaving every other section untouched.
    pub fn apply(&mut self, patch: SectionPatch, now: DateTime<Utc>) {
        match patch {
            SectionPatch::Dietary(section) => self.dietary = Some(section),
            SectionPatch::Budget(section) => self.budget = Some(section),
            SectionPatch::Cooking(section) => self.cooking = Some(section),
            SectionPatch::Nutritional(section) => self.nutritional = Some(section),
            SectionPatch::Personal(section) => self.personal = Some(section),
        }
        self.updated_at = now;
    }

    /// JSON value of one section, when present.
    ///
    /// Used to diff old against new state when building the change ledger.
    pub fn section_value(&self, section: ProfileSection) -> Option<Value> {
        let serialised = match section {
            ProfileSection::Dietary => self.dietary.as_ref().map(serde_json::to_value),
            ProfileSection::Budget => self.budget.as_ref().map(serde_json::to_value),
            ProfileSection::Cooking => self.cooking.as_ref().map(serde_json::to_value),
            ProfileSection::Nutritional => self.nutritional.as_ref().map(serde_json::to_value),
            ProfileSection::Personal => self.personal.as_ref().map(serde_json::to_value),
        };
        serialised.and_then(Result::ok)
    }

    fn filled_required_fields(&self) -> u32 {
        let mut filled = 0;
        if let Some(dietary) = &self.dietary {
            if !dietary.restrictions.is_empty() {
                filled += 1;
            }
        }
        if let Some(budget) = &self.budget {
            filled += 1; // weekly amount
            if !budget.currency.trim().is_empty() {
                filled += 1;
            }
        }
        if let Some(cooking) = &self.cooking {
            filled += 1; // experience level
            if !cooking.equipment.is_empty() {
                filled += 1;
            }
        }
        if self.nutritional.is_some() {
            filled += 3; // the macro split
        }
        if let Some(personal) = &self.personal {
            if personal.first_name.as_deref().is_some_and(|n| !n.is_empty()) {
                filled += 1;
            }
            if personal.household_size >= 1 {
                filled += 1;
            }
        }
        filled
    }

    /// Completion as a whole percentage of required fields filled.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use foodi_backend::domain::profile::PreferenceDocument;
    ///
    /// assert_eq!(PreferenceDocument::empty(Utc::now()).completion_percent(), 0);
    /// ```
    pub fn completion_percent(&self) -> u8 {
        let filled = self.filled_required_fields().min(REQUIRED_FIELD_TOTAL);
        u8::try_from(filled * 100 / REQUIRED_FIELD_TOTAL).unwrap_or(100)
    }

    /// Whether every section has been written at least once.
    pub fn onboarding_completed(&self) -> bool {
        self.dietary.is_some()
            && self.budget.is_some()
            && self.cooking.is_some()
            && self.nutritional.is_some()
            && self.personal.is_some()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn full_document(now: DateTime<Utc>) -> PreferenceDocument {
        let mut doc = PreferenceDocument::empty(now);
        doc.apply(
            SectionPatch::Dietary(DietarySection {
                restrictions: vec!["vegan".into()],
                allergies: vec![],
            }),
            now,
        );
        doc.apply(
            SectionPatch::Budget(BudgetSection {
                weekly_amount: 80.0,
                currency: "EUR".into(),
            }),
            now,
        );
        doc.apply(
            SectionPatch::Cooking(CookingSection {
                experience: CookingExperience::Intermediate,
                equipment: vec!["oven".into()],
                max_prep_minutes: Some(45),
            }),
            now,
        );
        doc.apply(
            SectionPatch::Nutritional(NutritionalSection {
                calorie_target: Some(2100),
                protein: 0.3,
                carbs: 0.5,
                fat: 0.2,
            }),
            now,
        );
        doc.apply(
            SectionPatch::Personal(PersonalSection {
                first_name: Some("John".into()),
                last_name: Some("Doe".into()),
                household_size: 2,
            }),
            now,
        );
        doc
    }

    #[rstest]
    fn empty_document_has_zero_completion() {
        let doc = PreferenceDocument::empty(Utc::now());
        assert_eq!(doc.completion_percent(), 0);
        assert!(!doc.onboarding_completed());
    }

    #[rstest]
    fn full_document_reaches_full_completion() {
        let doc = full_document(Utc::now());
        assert_eq!(doc.completion_percent(), 100);
        assert!(doc.onboarding_completed());
    }

    #[rstest]
    fn partial_document_reports_partial_completion() {
        let now = Utc::now();
        let mut doc = PreferenceDocument::empty(now);
        doc.apply(
            SectionPatch::Budget(BudgetSection {
                weekly_amount: 50.0,
                currency: "USD".into(),
            }),
            now,
        );

        // Two of ten required fields filled.
        assert_eq!(doc.completion_percent(), 20);
        assert!(!doc.onboarding_completed());
    }

    #[rstest]
    fn apply_replaces_only_the_patched_section() {
        let now = Utc::now();
        let mut doc = full_document(now);
        let budget_before = doc.budget.clone();

        doc.apply(
            SectionPatch::Dietary(DietarySection {
                restrictions: vec!["vegetarian".into()],
                allergies: vec!["peanuts".into()],
            }),
            now,
        );

        assert_eq!(doc.budget, budget_before);
        let dietary = doc.dietary.as_ref().expect("dietary present");
        assert_eq!(dietary.restrictions, vec!["vegetarian".to_owned()]);
    }

    #[rstest]
    fn applying_the_same_patch_twice_is_idempotent() {
        let now = Utc::now();
        let patch = SectionPatch::Nutritional(NutritionalSection {
            calorie_target: None,
            protein: 0.2,
            carbs: 0.5,
            fat: 0.3,
        });

        let mut once = PreferenceDocument::empty(now);
        once.apply(patch.clone(), now);
        let mut twice = once.clone();
        twice.apply(patch, now);

        assert_eq!(once, twice);
    }

    #[rstest]
    fn section_value_reflects_current_state() {
        let doc = full_document(Utc::now());

        let value = doc
            .section_value(ProfileSection::Dietary)
            .expect("dietary value");
        assert_eq!(value["restrictions"][0], "vegan");
        assert!(PreferenceDocument::empty(Utc::now())
            .section_value(ProfileSection::Dietary)
            .is_none());
    }
}
