//! Command-line front end for the code playground
//!
//! Stands in for the playground page: the language dropdown becomes
//! `--language`, the editor and input boxes become files or inline strings, and
//! the output area is stdout.

pub mod commands;
