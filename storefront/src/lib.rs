pub mod error;
pub mod executable_utils;
pub mod lifecycle;
pub mod model;
pub mod notification;
pub mod storage;
