//! Catalog workflows
//!
//! Dish and category management, including the image-upload path. Blob
//! storage is an external dependency: when it fails, or when the owning
//! record turns out to be invalid after an upload already happened, the
//! uploaded blob is cleaned up so no orphan survives the failure.

use crate::domain::{Dish, DishAttributes, DishCategory};
use crate::store::{DishCategoryStore, DishStore, ImageStorage, UnitOfWork};
use shared::{AppError, AppResult, ErrorCode};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogService {
    dishes: Arc<dyn DishStore>,
    categories: Arc<dyn DishCategoryStore>,
    images: Arc<dyn ImageStorage>,
    uow: Arc<dyn UnitOfWork>,
}

impl CatalogService {
    pub fn new(
        dishes: Arc<dyn DishStore>,
        categories: Arc<dyn DishCategoryStore>,
        images: Arc<dyn ImageStorage>,
        uow: Arc<dyn UnitOfWork>,
    ) -> Self {
        Self {
            dishes,
            categories,
            images,
            uow,
        }
    }

    // ----- dishes -----

    pub async fn create_dish(&self, attrs: DishAttributes) -> AppResult<Dish> {
        self.require_category(attrs.category_id).await?;
        let dish = Dish::create(attrs)?;

        self.dishes.add(&dish).await?;
        self.uow.commit().await?;

        info!(dish = %dish.name_en(), "dish created");
        Ok(dish)
    }

    pub async fn update_dish(&self, dish_id: Uuid, attrs: DishAttributes) -> AppResult<Dish> {
        let mut dish = self.load_dish(dish_id).await?;
        self.require_category(attrs.category_id).await?;
        dish.update(attrs)?;

        self.dishes.update(&dish).await?;
        self.uow.commit().await?;
        Ok(dish)
    }

    /// Upload a new dish image and swap it in.
    ///
    /// Upload happens before any domain mutation; if the dish rejects the
    /// image afterwards, the fresh blob is deleted again. The previous
    /// blob is removed only after the swap succeeded.
    pub async fn update_dish_image(
        &self,
        dish_id: Uuid,
        file_name: &str,
        bytes: &[u8],
    ) -> AppResult<Dish> {
        let mut dish = self.load_dish(dish_id).await?;
        let previous = dish.image().cloned();

        let stored = self.images.upload(file_name, bytes).await.map_err(|err| {
            AppError::dependency(format!("Image upload failed: {err}"))
        })?;

        if let Err(err) = dish.update_image(stored.url.clone(), Some(stored.public_id.clone())) {
            // do not leave the orphaned blob behind
            if let Err(cleanup_err) = self.images.delete(&stored.public_id).await {
                warn!(public_id = %stored.public_id, error = %cleanup_err, "orphaned image cleanup failed");
            }
            return Err(err);
        }

        self.dishes.update(&dish).await?;
        self.uow.commit().await?;

        if let Some(previous) = previous
            && let Some(public_id) = previous.public_id
            && let Err(err) = self.images.delete(&public_id).await
        {
            warn!(public_id = %public_id, error = %err, "stale image cleanup failed");
        }

        Ok(dish)
    }

    pub async fn remove_dish_image(&self, dish_id: Uuid) -> AppResult<Dish> {
        let mut dish = self.load_dish(dish_id).await?;

        if let Some(image) = dish.image().cloned() {
            if let Some(public_id) = image.public_id
                && let Err(err) = self.images.delete(&public_id).await
            {
                warn!(public_id = %public_id, error = %err, "image blob deletion failed");
            }
            dish.remove_image();
            self.dishes.update(&dish).await?;
            self.uow.commit().await?;
        }
        Ok(dish)
    }

    pub async fn set_dish_availability(&self, dish_id: Uuid, is_available: bool) -> AppResult<Dish> {
        let mut dish = self.load_dish(dish_id).await?;
        dish.set_availability(is_available);

        self.dishes.update(&dish).await?;
        self.uow.commit().await?;
        Ok(dish)
    }

    pub async fn soft_delete_dish(&self, dish_id: Uuid) -> AppResult<Dish> {
        let mut dish = self.load_dish(dish_id).await?;
        dish.soft_delete();

        self.dishes.update(&dish).await?;
        self.uow.commit().await?;

        info!(dish = %dish.name_en(), "dish soft-deleted");
        Ok(dish)
    }

    pub async fn restore_dish(&self, dish_id: Uuid) -> AppResult<Dish> {
        let mut dish = self
            .dishes
            .get_by_id(dish_id)
            .await?
            .ok_or_else(|| self.dish_not_found(dish_id))?;
        dish.restore();

        self.dishes.update(&dish).await?;
        self.uow.commit().await?;

        info!(dish = %dish.name_en(), "dish restored");
        Ok(dish)
    }

    pub async fn get_dish(&self, dish_id: Uuid) -> AppResult<Dish> {
        self.load_dish(dish_id).await
    }

    pub async fn list_dishes(&self) -> AppResult<Vec<Dish>> {
        Ok(self.dishes.list_active().await?)
    }

    pub async fn list_deleted_dishes(&self) -> AppResult<Vec<Dish>> {
        Ok(self.dishes.list_deleted().await?)
    }

    // ----- categories -----

    pub async fn create_category(
        &self,
        name_ka: &str,
        name_en: &str,
        description_ka: Option<String>,
        description_en: Option<String>,
        display_order: i32,
    ) -> AppResult<DishCategory> {
        let category =
            DishCategory::create(name_ka, name_en, description_ka, description_en, display_order)?;

        self.categories.add(&category).await?;
        self.uow.commit().await?;

        info!(category = %category.name_en(), "category created");
        Ok(category)
    }

    pub async fn update_category(
        &self,
        category_id: Uuid,
        name_ka: &str,
        name_en: &str,
        description_ka: Option<String>,
        description_en: Option<String>,
        display_order: i32,
    ) -> AppResult<DishCategory> {
        let mut category = self.load_category(category_id).await?;
        category.update(name_ka, name_en, description_ka, description_en, display_order)?;

        self.categories.update(&category).await?;
        self.uow.commit().await?;
        Ok(category)
    }

    /// Soft-delete a category. Refuses while active dishes still point at it.
    pub async fn soft_delete_category(&self, category_id: Uuid) -> AppResult<DishCategory> {
        let mut category = self.load_category(category_id).await?;

        if self.dishes.exists_active_in_category(category_id).await? {
            return Err(AppError::conflict(
                "Cannot delete a category that still has active dishes",
            ));
        }
        category.soft_delete();

        self.categories.update(&category).await?;
        self.uow.commit().await?;

        info!(category = %category.name_en(), "category soft-deleted");
        Ok(category)
    }

    pub async fn restore_category(&self, category_id: Uuid) -> AppResult<DishCategory> {
        let mut category = self
            .categories
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| self.category_not_found(category_id))?;
        category.restore();

        self.categories.update(&category).await?;
        self.uow.commit().await?;
        Ok(category)
    }

    pub async fn list_categories(&self) -> AppResult<Vec<DishCategory>> {
        let mut categories = self.categories.list_active().await?;
        categories.sort_by_key(|c| c.display_order());
        Ok(categories)
    }

    pub async fn list_deleted_categories(&self) -> AppResult<Vec<DishCategory>> {
        Ok(self.categories.list_deleted().await?)
    }

    // ----- helpers -----

    async fn load_dish(&self, dish_id: Uuid) -> AppResult<Dish> {
        self.dishes
            .get_by_id(dish_id)
            .await?
            .filter(|d| !d.is_deleted())
            .ok_or_else(|| self.dish_not_found(dish_id))
    }

    async fn load_category(&self, category_id: Uuid) -> AppResult<DishCategory> {
        self.categories
            .get_by_id(category_id)
            .await?
            .filter(|c| !c.is_deleted())
            .ok_or_else(|| self.category_not_found(category_id))
    }

    async fn require_category(&self, category_id: Uuid) -> AppResult<()> {
        self.load_category(category_id).await.map(|_| ())
    }

    fn dish_not_found(&self, dish_id: Uuid) -> AppError {
        AppError::with_message(ErrorCode::DishNotFound, format!("Dish {dish_id} not found"))
    }

    fn category_not_found(&self, category_id: Uuid) -> AppError {
        AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category {category_id} not found"),
        )
    }
}
