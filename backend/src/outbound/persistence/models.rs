//! Diesel row models mapping between the schema and domain types.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use super::schema::{categories, category_assignments, pantry_items, recipes, user_recipes, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_verified: bool,
    pub verification_token_digest: Option<String>,
    pub verification_sent_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: Option<&'a str>,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email_verified: bool,
    pub verification_token_digest: Option<&'a str>,
    pub verification_sent_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Value,
    pub instructions: Value,
    pub servings: i32,
    pub prep_minutes: i32,
    pub cook_minutes: i32,
    pub nutrition: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_recipe_id: Option<Uuid>,
    pub is_custom: bool,
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Value,
    pub instructions: Value,
    pub servings: i32,
    pub prep_minutes: i32,
    pub cook_minutes: i32,
    pub nutrition: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = user_recipes)]
pub struct NewUserRecipeRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub original_recipe_id: Option<Uuid>,
    pub is_custom: bool,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub ingredients: Value,
    pub instructions: Value,
    pub servings: i32,
    pub prep_minutes: i32,
    pub cook_minutes: i32,
    pub nutrition: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = user_recipes)]
#[diesel(treat_none_as_null = true)]
pub struct UserRecipeUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub ingredients: Value,
    pub instructions: Value,
    pub servings: i32,
    pub prep_minutes: i32,
    pub cook_minutes: i32,
    pub nutrition: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = category_assignments)]
pub struct AssignmentRow {
    pub user_recipe_id: Uuid,
    pub category_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pantry_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PantryItemRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub expires_on: Option<NaiveDate>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = pantry_items)]
pub struct NewPantryItemRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub quantity: f64,
    pub unit: Option<&'a str>,
    pub category: Option<&'a str>,
    pub expires_on: Option<NaiveDate>,
    pub added_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = pantry_items)]
#[diesel(treat_none_as_null = true)]
pub struct PantryItemUpdate<'a> {
    pub name: &'a str,
    pub quantity: f64,
    pub unit: Option<&'a str>,
    pub category: Option<&'a str>,
    pub expires_on: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}
