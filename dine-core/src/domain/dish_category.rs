//! Dish categories

use super::{DeleteState, EntityMeta};
use serde::{Deserialize, Serialize};
use shared::validation::{
    validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN,
};
use shared::AppResult;
use uuid::Uuid;

/// Menu section grouping dishes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishCategory {
    meta: EntityMeta,
    name_ka: String,
    name_en: String,
    description_ka: Option<String>,
    description_en: Option<String>,
    display_order: i32,
    is_active: bool,
    delete_state: DeleteState,
}

impl DishCategory {
    pub fn create(
        name_ka: impl Into<String>,
        name_en: impl Into<String>,
        description_ka: Option<String>,
        description_en: Option<String>,
        display_order: i32,
    ) -> AppResult<Self> {
        let name_ka = name_ka.into();
        let name_en = name_en.into();

        validate_required_text(&name_ka, "name_ka", MAX_NAME_LEN)?;
        validate_required_text(&name_en, "name_en", MAX_NAME_LEN)?;
        validate_optional_text(description_ka.as_deref(), "description_ka", MAX_NOTE_LEN)?;
        validate_optional_text(description_en.as_deref(), "description_en", MAX_NOTE_LEN)?;

        Ok(Self {
            meta: EntityMeta::new(),
            name_ka,
            name_en,
            description_ka,
            description_en,
            display_order,
            is_active: true,
            delete_state: DeleteState::Active,
        })
    }

    pub fn update(
        &mut self,
        name_ka: impl Into<String>,
        name_en: impl Into<String>,
        description_ka: Option<String>,
        description_en: Option<String>,
        display_order: i32,
    ) -> AppResult<()> {
        let name_ka = name_ka.into();
        let name_en = name_en.into();

        validate_required_text(&name_ka, "name_ka", MAX_NAME_LEN)?;
        validate_required_text(&name_en, "name_en", MAX_NAME_LEN)?;
        validate_optional_text(description_ka.as_deref(), "description_ka", MAX_NOTE_LEN)?;
        validate_optional_text(description_en.as_deref(), "description_en", MAX_NOTE_LEN)?;

        self.name_ka = name_ka;
        self.name_en = name_en;
        self.description_ka = description_ka;
        self.description_en = description_en;
        self.display_order = display_order;
        self.meta.touch();
        Ok(())
    }

    pub fn change_display_order(&mut self, new_order: i32) {
        self.display_order = new_order;
        self.meta.touch();
    }

    pub fn activate(&mut self) {
        self.is_active = true;
        self.meta.touch();
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.meta.touch();
    }

    pub fn soft_delete(&mut self) {
        self.delete_state.delete();
        self.meta.touch();
    }

    pub fn restore(&mut self) {
        self.delete_state.restore();
        self.meta.touch();
    }

    pub fn is_deleted(&self) -> bool {
        self.delete_state.is_deleted()
    }

    pub fn id(&self) -> Uuid {
        self.meta.id
    }

    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn name_ka(&self) -> &str {
        &self.name_ka
    }

    pub fn name_en(&self) -> &str {
        &self.name_en
    }

    pub fn description_ka(&self) -> Option<&str> {
        self.description_ka.as_deref()
    }

    pub fn description_en(&self) -> Option<&str> {
        self.description_en.as_deref()
    }

    pub fn display_order(&self) -> i32 {
        self.display_order
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soups() -> DishCategory {
        DishCategory::create("სუპები", "Soups", None, None, 2).unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let cat = soups();
        assert!(cat.is_active());
        assert!(!cat.is_deleted());
        assert_eq!(cat.display_order(), 2);
    }

    #[test]
    fn test_create_requires_both_names() {
        assert!(DishCategory::create("", "Soups", None, None, 0).is_err());
        assert!(DishCategory::create("სუპები", " ", None, None, 0).is_err());
    }

    #[test]
    fn test_update_and_reorder() {
        let mut cat = soups();
        cat.update("ცხელი სუპები", "Hot Soups", Some("Served hot".into()), None, 1)
            .unwrap();
        assert_eq!(cat.name_en(), "Hot Soups");
        assert_eq!(cat.description_ka(), Some("Served hot"));
        assert_eq!(cat.display_order(), 1);

        cat.change_display_order(9);
        assert_eq!(cat.display_order(), 9);
    }

    #[test]
    fn test_activate_deactivate() {
        let mut cat = soups();
        cat.deactivate();
        assert!(!cat.is_active());
        cat.activate();
        assert!(cat.is_active());
    }

    #[test]
    fn test_soft_delete_round_trip() {
        let mut cat = soups();
        cat.soft_delete();
        assert!(cat.is_deleted());
        cat.restore();
        assert!(!cat.is_deleted());
        assert_eq!(cat.name_en(), "Soups");
    }
}
