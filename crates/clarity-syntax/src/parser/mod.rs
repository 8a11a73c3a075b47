mod core;
mod headers;

pub use self::core::{ParseIssue, Parser};
