//! Line items
//!
//! One quantity × price record inside an Order or Reservation. Dish names
//! and the unit price are snapshots taken at creation time; later catalog
//! edits never change historical line items.

use super::EntityMeta;
use serde::{Deserialize, Serialize};
use shared::validation::{validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN};
use shared::{AppError, AppResult, Money};
use uuid::Uuid;

/// A single order/reservation line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    meta: EntityMeta,
    dish_id: Uuid,
    dish_name_ka: String,
    dish_name_en: String,
    quantity: i32,
    unit_price: Money,
    total_price: Money,
    special_instructions: Option<String>,
}

impl LineItem {
    /// Create a new line item with frozen name/price snapshots.
    pub fn new(
        dish_id: Uuid,
        dish_name_ka: impl Into<String>,
        dish_name_en: impl Into<String>,
        quantity: i32,
        unit_price: Money,
        special_instructions: Option<String>,
    ) -> AppResult<Self> {
        let dish_name_ka = dish_name_ka.into();
        let dish_name_en = dish_name_en.into();

        validate_required_text(&dish_name_ka, "dish_name_ka", MAX_NAME_LEN)?;
        validate_required_text(&dish_name_en, "dish_name_en", MAX_NAME_LEN)?;
        validate_optional_text(
            special_instructions.as_deref(),
            "special_instructions",
            MAX_NOTE_LEN,
        )?;

        if quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }
        if unit_price < Money::ZERO {
            return Err(AppError::validation("Unit price cannot be negative"));
        }

        Ok(Self {
            meta: EntityMeta::new(),
            dish_id,
            dish_name_ka,
            dish_name_en,
            total_price: Money::from(quantity) * unit_price,
            quantity,
            unit_price,
            special_instructions,
        })
    }

    /// Change the quantity and recompute the line total.
    ///
    /// The only mutation a line item supports after creation.
    pub fn update_quantity(&mut self, new_quantity: i32) -> AppResult<()> {
        if new_quantity < 1 {
            return Err(AppError::validation("Quantity must be at least 1"));
        }
        self.quantity = new_quantity;
        self.total_price = Money::from(new_quantity) * self.unit_price;
        self.meta.touch();
        Ok(())
    }

    /// Merge key: same dish and identical instructions collapse into one line.
    pub fn merges_with(&self, dish_id: Uuid, special_instructions: Option<&str>) -> bool {
        self.dish_id == dish_id && self.special_instructions.as_deref() == special_instructions
    }

    pub fn id(&self) -> Uuid {
        self.meta.id
    }

    pub fn dish_id(&self) -> Uuid {
        self.dish_id
    }

    pub fn dish_name_ka(&self) -> &str {
        &self.dish_name_ka
    }

    pub fn dish_name_en(&self) -> &str {
        &self.dish_name_en
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn total_price(&self) -> Money {
        self.total_price
    }

    pub fn special_instructions(&self) -> Option<&str> {
        self.special_instructions.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use shared::ErrorCode;

    fn khinkali(quantity: i32, price: Money) -> AppResult<LineItem> {
        LineItem::new(
            Uuid::new_v4(),
            "ხინკალი",
            "Khinkali",
            quantity,
            price,
            None,
        )
    }

    #[test]
    fn test_total_is_quantity_times_unit_price() {
        let item = khinkali(4, dec!(1.50)).unwrap();
        assert_eq!(item.total_price(), dec!(6.00));
    }

    #[test]
    fn test_update_quantity_recomputes_total() {
        let mut item = khinkali(1, dec!(2.25)).unwrap();
        item.update_quantity(3).unwrap();
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.total_price(), dec!(6.75));
        // price snapshot untouched
        assert_eq!(item.unit_price(), dec!(2.25));
    }

    #[test]
    fn test_rejects_zero_quantity() {
        let err = khinkali(0, dec!(1.00)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_rejects_negative_price() {
        let err = khinkali(1, dec!(-0.01)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_rejects_blank_name() {
        let err = LineItem::new(Uuid::new_v4(), " ", "Khinkali", 1, dec!(1.00), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_update_quantity_rejects_below_one() {
        let mut item = khinkali(2, dec!(1.00)).unwrap();
        assert!(item.update_quantity(0).is_err());
        // failed update leaves the item unchanged
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.total_price(), dec!(2.00));
    }

    #[test]
    fn test_merge_key_includes_instructions() {
        let dish = Uuid::new_v4();
        let plain = LineItem::new(dish, "ხინკალი", "Khinkali", 1, dec!(1.00), None).unwrap();
        assert!(plain.merges_with(dish, None));
        assert!(!plain.merges_with(dish, Some("extra pepper")));
        assert!(!plain.merges_with(Uuid::new_v4(), None));
    }
}
