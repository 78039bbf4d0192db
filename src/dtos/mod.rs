pub(crate) mod auth_dtos;
pub(crate) mod trip_dtos;
