pub mod check_cmd;
pub mod config_cmd;
pub mod export_cmd;
pub mod headers_cmd;
