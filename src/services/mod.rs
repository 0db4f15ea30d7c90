pub mod lifecycle_service;
pub mod manual_result_service;
pub mod realtime_feed_service;
pub mod tally_service;
