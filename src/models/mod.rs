pub mod api_key;
pub mod ip_address;
pub mod report;
pub mod session;
pub mod ssh_credential;
