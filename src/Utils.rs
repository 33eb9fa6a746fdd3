/// reading compound libraries and reaction lists from task files
pub mod load_from_file;
/// simplelog setup for the binary and for long running scripts
pub mod logger;
