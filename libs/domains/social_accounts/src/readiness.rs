//! Brand readiness: the share of setup steps a brand has completed.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::brands::BrandRepository;
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::Brand;
use crate::repository::SocialAccountRepository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStep {
    Name,
    Description,
    Logo,
    SocialAccount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Readiness {
    pub completed: Vec<ReadinessStep>,
    pub missing: Vec<ReadinessStep>,
    /// 0..=100
    pub score: i32,
    pub ready_to_publish: bool,
}

fn filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Evaluate `brand` given its number of ACTIVE social accounts
pub fn evaluate(brand: &Brand, active_accounts: usize) -> Readiness {
    let checks = [
        (ReadinessStep::Name, !brand.name.trim().is_empty()),
        (ReadinessStep::Description, filled(brand.description.as_deref())),
        (ReadinessStep::Logo, filled(brand.logo_url.as_deref())),
        (ReadinessStep::SocialAccount, active_accounts > 0),
    ];

    let total = checks.len();
    let (completed, missing): (Vec<_>, Vec<_>) = checks.into_iter().partition(|(_, done)| *done);
    let completed: Vec<ReadinessStep> = completed.into_iter().map(|(step, _)| step).collect();
    let missing: Vec<ReadinessStep> = missing.into_iter().map(|(step, _)| step).collect();

    Readiness {
        score: (completed.len() * 100 / total) as i32,
        completed,
        missing,
        ready_to_publish: active_accounts > 0,
    }
}

/// Recompute and persist the readiness of `brand_id`
pub async fn recalculate<A, B>(accounts: &A, brands: &B, brand_id: Uuid) -> SocialAccountResult<Brand>
where
    A: SocialAccountRepository + ?Sized,
    B: BrandRepository + ?Sized,
{
    let brand = brands
        .get_by_id(brand_id)
        .await?
        .ok_or(SocialAccountError::BrandNotFound(brand_id))?;

    let active = accounts.count_active_by_brand(brand_id).await?;
    let readiness = evaluate(&brand, active);

    if readiness.score == brand.readiness_score && readiness.ready_to_publish == brand.ready_to_publish {
        return Ok(brand);
    }

    tracing::info!(
        brand_id = %brand_id,
        score = readiness.score,
        ready_to_publish = readiness.ready_to_publish,
        "Brand readiness changed"
    );
    brands
        .update_readiness(brand_id, readiness.score, readiness.ready_to_publish)
        .await
}
