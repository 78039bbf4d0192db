pub mod otp;
pub(crate) mod trip;
pub mod user;
