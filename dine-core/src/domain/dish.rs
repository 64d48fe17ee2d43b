//! Dishes
//!
//! Catalog reference data. Orders and reservations copy name/price
//! snapshots out of a dish at line-item creation; nothing here is ever
//! consulted again for historical records, which is why retiring a dish is
//! a soft delete rather than a removal.

use super::{DeleteState, EntityMeta};
use serde::{Deserialize, Serialize};
use shared::validation::{
    validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN,
};
use shared::{AppError, AppResult, Money};
use uuid::Uuid;

pub const MAX_SPICY_LEVEL: i32 = 5;

/// Uploaded dish image reference
///
/// `public_id` is the blob-storage handle needed to delete the object
/// later; the URL alone is not enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishImage {
    pub url: String,
    pub public_id: Option<String>,
}

/// Editable dish fields, shared by create and update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DishAttributes {
    pub name_ka: String,
    pub name_en: String,
    pub description_ka: Option<String>,
    pub description_en: Option<String>,
    pub price: Option<Money>,
    pub category_id: Uuid,
    pub preparation_time_minutes: Option<i32>,
    pub calories: Option<i32>,
    pub spicy_level: Option<i32>,
    pub is_vegan: bool,
}

impl DishAttributes {
    fn validate(&self) -> AppResult<()> {
        validate_required_text(&self.name_ka, "name_ka", MAX_NAME_LEN)?;
        validate_required_text(&self.name_en, "name_en", MAX_NAME_LEN)?;
        validate_optional_text(self.description_ka.as_deref(), "description_ka", MAX_NOTE_LEN)?;
        validate_optional_text(self.description_en.as_deref(), "description_en", MAX_NOTE_LEN)?;

        if self.category_id.is_nil() {
            return Err(AppError::validation("Category is required"));
        }
        if let Some(price) = self.price
            && price < Money::ZERO
        {
            return Err(AppError::validation("Price cannot be negative"));
        }
        if let Some(level) = self.spicy_level
            && !(0..=MAX_SPICY_LEVEL).contains(&level)
        {
            return Err(AppError::validation("Spicy level must be between 0 and 5"));
        }
        if let Some(minutes) = self.preparation_time_minutes
            && minutes < 0
        {
            return Err(AppError::validation("Preparation time cannot be negative"));
        }
        if let Some(calories) = self.calories
            && calories < 0
        {
            return Err(AppError::validation("Calories cannot be negative"));
        }
        Ok(())
    }
}

/// A menu dish
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    meta: EntityMeta,
    attrs: DishAttributes,
    is_available: bool,
    image: Option<DishImage>,
    delete_state: DeleteState,
}

impl Dish {
    /// Create a new available, active dish.
    pub fn create(attrs: DishAttributes) -> AppResult<Self> {
        attrs.validate()?;
        Ok(Self {
            meta: EntityMeta::new(),
            attrs,
            is_available: true,
            image: None,
            delete_state: DeleteState::Active,
        })
    }

    /// Replace the editable fields wholesale.
    pub fn update(&mut self, attrs: DishAttributes) -> AppResult<()> {
        attrs.validate()?;
        self.attrs = attrs;
        self.meta.touch();
        Ok(())
    }

    /// Attach or replace the dish image.
    pub fn update_image(&mut self, url: impl Into<String>, public_id: Option<String>) -> AppResult<()> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(AppError::validation("Image URL is required"));
        }
        self.image = Some(DishImage { url, public_id });
        self.meta.touch();
        Ok(())
    }

    pub fn remove_image(&mut self) {
        self.image = None;
        self.meta.touch();
    }

    pub fn set_availability(&mut self, is_available: bool) {
        self.is_available = is_available;
        self.meta.touch();
    }

    pub fn activate(&mut self) {
        self.set_availability(true);
    }

    pub fn deactivate(&mut self) {
        self.set_availability(false);
    }

    /// Retire the dish without removing the record.
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

    pub fn attrs(&self) -> &DishAttributes {
        &self.attrs
    }

    pub fn name_ka(&self) -> &str {
        &self.attrs.name_ka
    }

    pub fn name_en(&self) -> &str {
        &self.attrs.name_en
    }

    pub fn price(&self) -> Option<Money> {
        self.attrs.price
    }

    pub fn category_id(&self) -> Uuid {
        self.attrs.category_id
    }

    pub fn is_available(&self) -> bool {
        self.is_available
    }

    pub fn image(&self) -> Option<&DishImage> {
        self.image.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use shared::ErrorCode;

    fn khinkali_attrs() -> DishAttributes {
        DishAttributes {
            name_ka: "ხინკალი".into(),
            name_en: "Khinkali".into(),
            price: Some(dec!(1.50)),
            category_id: Uuid::new_v4(),
            spicy_level: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_defaults() {
        let dish = Dish::create(khinkali_attrs()).unwrap();
        assert!(dish.is_available());
        assert!(!dish.is_deleted());
        assert!(dish.image().is_none());
    }

    #[test]
    fn test_create_validation() {
        let mut attrs = khinkali_attrs();
        attrs.name_ka = " ".into();
        assert!(Dish::create(attrs).is_err());

        let mut attrs = khinkali_attrs();
        attrs.category_id = Uuid::nil();
        assert!(Dish::create(attrs).is_err());

        let mut attrs = khinkali_attrs();
        attrs.spicy_level = Some(6);
        let err = Dish::create(attrs).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let mut attrs = khinkali_attrs();
        attrs.price = Some(dec!(-1.00));
        assert!(Dish::create(attrs).is_err());
    }

    #[test]
    fn test_update_replaces_attrs() {
        let mut dish = Dish::create(khinkali_attrs()).unwrap();
        let mut attrs = khinkali_attrs();
        attrs.price = Some(dec!(2.00));
        attrs.is_vegan = true;
        dish.update(attrs).unwrap();
        assert_eq!(dish.price(), Some(dec!(2.00)));
        assert!(dish.attrs().is_vegan);
    }

    #[test]
    fn test_update_rejects_invalid_attrs() {
        let mut dish = Dish::create(khinkali_attrs()).unwrap();
        let mut attrs = khinkali_attrs();
        attrs.name_en = "".into();
        assert!(dish.update(attrs).is_err());
        // original fields untouched
        assert_eq!(dish.name_en(), "Khinkali");
    }

    #[test]
    fn test_image_lifecycle() {
        let mut dish = Dish::create(khinkali_attrs()).unwrap();
        dish.update_image("https://img.example/khinkali.jpg", Some("img-1".into()))
            .unwrap();
        assert_eq!(dish.image().unwrap().public_id.as_deref(), Some("img-1"));

        dish.remove_image();
        assert!(dish.image().is_none());

        assert!(dish.update_image("  ", None).is_err());
    }

    #[test]
    fn test_availability_toggles() {
        let mut dish = Dish::create(khinkali_attrs()).unwrap();
        dish.deactivate();
        assert!(!dish.is_available());
        dish.activate();
        assert!(dish.is_available());
        dish.set_availability(false);
        assert!(!dish.is_available());
    }

    #[test]
    fn test_soft_delete_round_trip() {
        let mut dish = Dish::create(khinkali_attrs()).unwrap();
        let snapshot = dish.clone();

        dish.soft_delete();
        assert!(dish.is_deleted());

        dish.restore();
        assert!(!dish.is_deleted());
        // indistinguishable from the pre-delete state, timestamps aside
        assert_eq!(dish.attrs().name_ka, snapshot.attrs().name_ka);
        assert_eq!(dish.price(), snapshot.price());
        assert_eq!(dish.is_available(), snapshot.is_available());
    }
}
