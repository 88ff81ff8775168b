pub mod brand;
pub mod social_account;
