pub mod attendance;
pub mod response;
