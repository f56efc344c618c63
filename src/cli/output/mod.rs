//! Rendering surfaces. A surface receives the final [Outcome] of a run and shows it to the user.

pub mod json;
pub mod terminal;

use anyhow::Result;

use crate::report::Outcome;

/// Contract between the pipeline and whatever displays its results.
#[cfg_attr(test, mockall::automock)]
pub trait RenderSurface {
    fn render(&mut self, outcome: &Outcome) -> Result<()>;
}
