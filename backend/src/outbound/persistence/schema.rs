//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them
//! for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique, lowercased email address.
        email -> Varchar,
        /// Unique handle (max 32 characters).
        username -> Varchar,
        /// Argon2id PHC string; null for social accounts.
        password_hash -> Nullable<Text>,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
        email_verified -> Bool,
        /// SHA-256 digest of the outstanding verification token.
        verification_token_digest -> Nullable<Text>,
        verification_sent_at -> Nullable<Timestamptz>,
        /// Soft-deletion flag; rows are never removed.
        is_active -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Canonical recipe catalog, shared and read-only for users.
    recipes (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Nullable<Text>,
        /// Ingredient list as a JSON array.
        ingredients -> Jsonb,
        /// Instruction steps as a JSON array.
        instructions -> Jsonb,
        servings -> Int4,
        prep_minutes -> Int4,
        cook_minutes -> Int4,
        nutrition -> Nullable<Jsonb>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-owned recipes: favorites (catalog copies) and custom entries.
    user_recipes (id) {
        id -> Uuid,
        user_id -> Uuid,
        /// Catalog link; null for custom recipes. Unique per user.
        original_recipe_id -> Nullable<Uuid>,
        is_custom -> Bool,
        name -> Varchar,
        description -> Nullable<Text>,
        ingredients -> Jsonb,
        instructions -> Jsonb,
        servings -> Int4,
        prep_minutes -> Int4,
        cook_minutes -> Int4,
        nutrition -> Nullable<Jsonb>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// User-scoped recipe tags.
    categories (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Join table between user recipes and categories.
    category_assignments (user_recipe_id, category_id) {
        user_recipe_id -> Uuid,
        category_id -> Uuid,
    }
}

diesel::table! {
    /// Tracked pantry items.
    pantry_items (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Varchar,
        quantity -> Float8,
        unit -> Nullable<Varchar>,
        category -> Nullable<Varchar>,
        expires_on -> Nullable<Date>,
        added_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(user_recipes -> users (user_id));
diesel::joinable!(categories -> users (user_id));
diesel::joinable!(category_assignments -> user_recipes (user_recipe_id));
diesel::joinable!(category_assignments -> categories (category_id));
diesel::joinable!(pantry_items -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    recipes,
    user_recipes,
    categories,
    category_assignments,
    pantry_items,
);
