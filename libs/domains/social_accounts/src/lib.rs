//! Social Accounts Domain
//!
//! Connects brands to social platforms through OAuth and manages the
//! resulting accounts.
//!
//! # Connect flow
//!
//! ```text
//! authorize ──► state store ──► platform consent page
//!                                      │
//! callback ◄───────────────────────────┘
//!    │  take state, exchange code, fetch accounts
//!    ▼
//! selection cache ──► client picks an account ──► connect
//!                                                   │
//!                      repository upsert ◄──────────┘
//!                      readiness recalculation
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_social_accounts::{
//!     handlers, CredentialCipher, InMemoryBrandRepository, InMemoryEphemeralStore,
//!     InMemorySocialAccountRepository, OAuthSettings, PlatformRegistry, SocialAccountService,
//! };
//!
//! let service = SocialAccountService::new(
//!     InMemorySocialAccountRepository::new(),
//!     InMemoryBrandRepository::new(),
//!     PlatformRegistry::new(),
//!     Arc::new(InMemoryEphemeralStore::new()),
//!     CredentialCipher::new(&[0u8; 32]),
//!     OAuthSettings::new("http://localhost:8080", "http://localhost:3000"),
//! );
//! let router = handlers::router(service);
//! ```

pub mod brands;
pub mod context;
pub mod crypto;
pub mod entity;
pub mod ephemeral;
pub mod error;
pub mod handlers;
pub mod models;
pub mod oauth;
pub mod platforms;
pub mod postgres;
pub mod publishing;
pub mod readiness;
pub mod repository;
pub mod service;

pub use brands::{BrandRepository, InMemoryBrandRepository};
pub use crypto::CredentialCipher;
pub use ephemeral::{EphemeralStore, InMemoryEphemeralStore, RedisEphemeralStore};
pub use error::{SocialAccountError, SocialAccountResult};
pub use models::{
    AccountCandidate, AccountStatus, Brand, CallerContext, Credentials, PendingSelection,
    Platform, PlatformToken, PublishedPost, SocialAccount,
};
pub use platforms::{PlatformAdapter, PlatformConfig, PlatformEndpoints, PlatformRegistry};
pub use postgres::{PgBrandRepository, PgSocialAccountRepository};
pub use publishing::FacebookPublisher;
pub use repository::{InMemorySocialAccountRepository, SocialAccountRepository};
pub use service::{OAuthSettings, SocialAccountService};
