use std::collections::HashMap;
use std::sync::Arc;

use super::facebook::FacebookAdapter;
use super::instagram::InstagramAdapter;
use super::linkedin::LinkedinAdapter;
use super::pinterest::PinterestAdapter;
use super::tiktok::TiktokAdapter;
use super::x::XAdapter;
use super::youtube::YoutubeAdapter;
use super::{PlatformAdapter, PlatformConfig};
use crate::error::{SocialAccountError, SocialAccountResult};
use crate::models::Platform;

/// Adapters for the platforms that have app credentials configured
#[derive(Clone, Default)]
pub struct PlatformRegistry {
    adapters: HashMap<Platform, Arc<dyn PlatformAdapter>>,
}

impl PlatformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the production adapter for every configured platform
    pub fn from_configs(configs: impl IntoIterator<Item = (Platform, PlatformConfig)>) -> Self {
        configs
            .into_iter()
            .fold(Self::new(), |registry, (platform, config)| {
                registry.with(adapter_for(platform, config))
            })
    }

    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        self.adapters.insert(adapter.platform(), adapter);
    }

    pub fn with(mut self, adapter: Arc<dyn PlatformAdapter>) -> Self {
        self.register(adapter);
        self
    }

    pub fn get(&self, platform: Platform) -> SocialAccountResult<Arc<dyn PlatformAdapter>> {
        self.adapters.get(&platform).cloned().ok_or_else(|| {
            SocialAccountError::Validation(format!("{} is not configured", platform.label()))
        })
    }

    /// Configured platforms in display order
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.adapters.contains_key(p))
            .collect()
    }
}

fn adapter_for(platform: Platform, config: PlatformConfig) -> Arc<dyn PlatformAdapter> {
    match platform {
        Platform::Facebook => Arc::new(FacebookAdapter::new(config)),
        Platform::Instagram => Arc::new(InstagramAdapter::new(config)),
        Platform::Tiktok => Arc::new(TiktokAdapter::new(config)),
        Platform::Linkedin => Arc::new(LinkedinAdapter::new(config)),
        Platform::X => Arc::new(XAdapter::new(config)),
        Platform::Pinterest => Arc::new(PinterestAdapter::new(config)),
        Platform::Youtube => Arc::new(YoutubeAdapter::new(config)),
    }
}
