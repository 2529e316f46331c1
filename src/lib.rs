//! The library code for `postindex`, which builds the JSON indices a
//! markdown blog's listing pages are driven by. The architecture can be
//! broken down into three steps:
//!
//! 1. Collecting articles from the posts directory ([`crate::collect`])
//! 2. Grouping them by tag and by category ([`crate::index`])
//! 3. Writing the results to disk ([`crate::write`])
//!
//! The first step does most of the text processing. Each document is split
//! into frontmatter and body ([`crate::metadata`]), and the body yields a
//! summary ([`crate::summary`]) and a reading-time estimate
//! ([`crate::reading_time`]). [`crate::article`] turns these into an
//! [`article::Article`], filling in defaults for anything the frontmatter
//! leaves out. A document that can't be processed is logged and skipped; it
//! never stops the rest of the run.
//!
//! [`crate::build`] ties the steps together and exposes the two entry points
//! the host generator calls: [`build::on_pre_build`] and [`build::on_serve`].
//! Both perform the same full rebuild.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod article;
pub mod build;
pub mod collect;
pub mod config;
pub mod index;
pub mod listing;
pub mod metadata;
pub mod reading_time;
pub mod summary;
pub mod write;
