//! Builder-pattern printer for rendering diagnostics.

use std::fmt::Write;

use joist_core::Colors;

use super::{Diagnostics, Severity};

/// Builder for rendering diagnostics with various options.
pub struct DiagnosticsPrinter<'d> {
    diagnostics: &'d Diagnostics,
    colored: bool,
}

impl<'d> DiagnosticsPrinter<'d> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            colored: false,
        }
    }

    pub fn colored(mut self, value: bool) -> Self {
        self.colored = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.format(&mut out);
        out
    }

    /// One block per diagnostic:
    ///
    /// ```text
    /// error: no schema found for referenced name `Missing`
    ///   --> src/a.ts
    ///   in `Holder`
    ///   = hint: ...
    /// ```
    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        let c = Colors::new(self.colored);

        for (i, diag) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                w.write_char('\n')?;
            }

            let level = match diag.severity() {
                Severity::Error => c.red,
                Severity::Warning => c.yellow,
            };
            writeln!(
                w,
                "{level}{}{}{}: {}{}{}",
                c.bold,
                diag.severity(),
                c.reset,
                c.bold,
                diag.message(),
                c.reset
            )?;

            if let Some(file) = diag.file() {
                writeln!(w, "  {}-->{} {}{file}{}", c.dim, c.reset, c.blue, c.reset)?;
            }
            if let Some(decl) = diag.declaration() {
                writeln!(w, "  {}in{} `{}{decl}{}`", c.dim, c.reset, c.blue, c.reset)?;
            }
            for hint in diag.hints() {
                writeln!(w, "  {}= hint:{} {hint}", c.dim, c.reset)?;
            }
        }

        Ok(())
    }
}
