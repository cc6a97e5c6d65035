pub mod conversion;
pub mod inline_config;
#[cfg(feature = "proto_parser")]
pub mod merging;
#[cfg(feature = "proto_parser")]
pub mod round_trip;
