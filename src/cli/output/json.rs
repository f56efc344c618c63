use std::io::Write;

use anyhow::Result;

use crate::report::Outcome;

use super::RenderSurface;

/// Writes the outcome as a single JSON document, for external renderers such as a web page.
pub struct JsonSurface<W> {
    out: W,
    pretty: bool,
}

impl<W: Write> JsonSurface<W> {
    pub fn new(out: W, pretty: bool) -> Self {
        Self { out, pretty }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for JsonSurface<W> {
    fn render(&mut self, outcome: &Outcome) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.out, outcome)?;
        } else {
            serde_json::to_writer(&mut self.out, outcome)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
