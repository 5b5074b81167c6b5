// Terminal views

pub mod file_panes;
pub mod help;
pub mod plain;
