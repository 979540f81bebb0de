// Web server modules for the wheat disease service

pub mod logger;
pub mod request_parsing;
pub mod response_helpers;
pub mod routes;
