use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::Brand;

/// The slice of brand persistence this domain needs: lookup and readiness writes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrandRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> SocialAccountResult<Option<Brand>>;

    async fn update_readiness(
        &self,
        id: Uuid,
        readiness_score: i32,
        ready_to_publish: bool,
    ) -> SocialAccountResult<Brand>;
}

/// In-memory implementation of BrandRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryBrandRepository {
    brands: Arc<RwLock<HashMap<Uuid, Brand>>>,
}

impl InMemoryBrandRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a brand
    pub async fn insert(&self, brand: Brand) {
        self.brands.write().await.insert(brand.id, brand);
    }
}

#[async_trait]
impl BrandRepository for InMemoryBrandRepository {
    async fn get_by_id(&self, id: Uuid) -> SocialAccountResult<Option<Brand>> {
        Ok(self.brands.read().await.get(&id).cloned())
    }

    async fn update_readiness(
        &self,
        id: Uuid,
        readiness_score: i32,
        ready_to_publish: bool,
    ) -> SocialAccountResult<Brand> {
        let mut brands = self.brands.write().await;
        let brand = brands
            .get_mut(&id)
            .ok_or(SocialAccountError::BrandNotFound(id))?;

        brand.readiness_score = readiness_score;
        brand.ready_to_publish = ready_to_publish;
        brand.updated_at = chrono::Utc::now();
        Ok(brand.clone())
    }
}
