//! # tagfmt
//!
//! Turns text annotated with inline tags (`<info>done</info>`, `<fg=red;options=bold>`,
//! `<href=https://example.com>`, `<wrap=40,fill_up/>`) into terminal output: ANSI styles,
//! OSC 8 hyperlinks and style-aware word wrapping.
//!
//! The entry point is [`OutputFormatter`](markup::formatter::OutputFormatter). For plain
//! wrapping without decoration see [`wrap`](markup::word_wrapper::wrap).

pub mod markup;
