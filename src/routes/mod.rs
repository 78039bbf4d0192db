pub(crate) mod auth_otp_routes;
pub(crate) mod trip_routes;
