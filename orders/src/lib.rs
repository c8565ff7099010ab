pub mod client;
pub mod error;
pub mod executable_utils;
pub mod images;
pub mod model;
pub mod routes;
pub mod service;
pub mod storage;
