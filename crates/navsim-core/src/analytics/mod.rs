#[cfg(feature = "trailing")]
pub mod trailing;

#[cfg(feature = "peers")]
pub mod peers;

#[cfg(feature = "portfolio")]
pub mod portfolio;
