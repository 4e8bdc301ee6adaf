pub mod data_url;
pub mod http;
pub mod logging;
pub mod timing;
