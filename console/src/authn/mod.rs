pub mod management_token;
pub mod session;
