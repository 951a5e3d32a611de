//! CLI output formatting.
//!
//! Frames and parameter tables go to stdout as JSON so they can be piped into
//! plotting tools; diagnostics go through `tracing` on stderr.

use serde::Serialize;
use std::io::Write;

use crate::engine::ParameterSet;
use crate::error::{SimError, SimResult};
use crate::visualization::Renderer;

/// Print version information.
pub fn print_version() {
    println!("edusim {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message.
pub fn print_help() {
    println!(
        r"edusim - Interactive classroom simulations, headless

USAGE:
    edusim <COMMAND> [OPTIONS]

MODELS:
    pendulum     Simple pendulum (semi-implicit Euler)
    population   Predator-prey difference equations
    chemistry    Reacting particles in a box
    quadratic    Quadratic function with derivative and tangent

COMMANDS:
    run <model>                 Run a model and stream frames as JSON lines
        --seconds <S>           Simulated seconds (default: 10)
        --every <N>             Emit every N-th frame (default: 1)

    snapshot <model>            Print the initial frame as JSON

    params <model>              Print the parameter table as JSON

    check <lab.yaml>            Validate a lab configuration file

    help                        Show this help message
    version                     Show version information

MODEL OPTIONS:
    --config <lab.yaml>         Load defaults from a configuration file
    --seed <N>                  Override the master seed
    --set <name=value>          Set a parameter (repeatable, clamped to range)
    -v, --verbose               Debug logging on stderr (or set RUST_LOG)

EXAMPLES:
    edusim run pendulum --seconds 5 --every 6
    edusim run chemistry --set temperature=80 --set concentration=1.5
    edusim snapshot quadratic --set a=-1 --set show_tangent=1 --set tangent_x=2
"
    );
}

/// Serialize one value as a single JSON line.
///
/// # Errors
///
/// Returns error if serialization or the write fails.
pub fn write_json_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> SimResult<()> {
    serde_json::to_writer(&mut *out, value).map_err(|e| SimError::serialization(e.to_string()))?;
    out.write_all(b"\n")?;
    Ok(())
}

/// One row of the parameter table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamRow {
    /// Parameter name.
    pub name: &'static str,
    /// Current value.
    pub value: f64,
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
    /// Slider step.
    pub step: f64,
    /// Default value.
    pub default: f64,
}

/// Flatten a parameter set into table rows.
#[must_use]
pub fn param_rows(params: &ParameterSet) -> Vec<ParamRow> {
    params
        .iter()
        .map(|entry| ParamRow {
            name: entry.spec.name,
            value: entry.value,
            min: entry.spec.min,
            max: entry.spec.max,
            step: entry.spec.step,
            default: entry.spec.default,
        })
        .collect()
}

/// Renderer that writes every n-th frame as a JSON line.
///
/// Write failures make the renderer unavailable; the run keeps stepping.
#[derive(Debug)]
pub struct JsonLinesRenderer<W> {
    out: W,
    every: u64,
    seen: u64,
    written: u64,
    failed: bool,
}

impl<W: Write> JsonLinesRenderer<W> {
    /// Write to `out`, keeping one frame in `every`.
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            every: every.max(1),
            seen: 0,
            written: 0,
            failed: false,
        }
    }

    /// Frames written so far.
    #[must_use]
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, F: Serialize> Renderer<F> for JsonLinesRenderer<W> {
    fn is_available(&self) -> bool {
        !self.failed
    }

    fn draw(&mut self, frame: &F) {
        let keep = self.seen % self.every == 0;
        self.seen += 1;
        if !keep {
            return;
        }
        match write_json_line(&mut self.out, frame) {
            Ok(()) => self.written += 1,
            Err(e) => {
                tracing::warn!(error = %e, "frame output failed, disabling renderer");
                self.failed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ParamSpec;

    #[test]
    fn test_write_json_line() {
        let mut out = Vec::new();
        assert!(write_json_line(&mut out, &[1, 2, 3]).is_ok());
        assert_eq!(out, b"[1,2,3]\n");
    }

    #[test]
    fn test_param_rows() {
        let params = ParameterSet::new("demo", [ParamSpec::new("k", 0.0, 2.0, 0.5, 1.0)]);
        let rows = param_rows(&params);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "k");
        assert!((rows[0].value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_renderer_decimates() {
        let mut renderer = JsonLinesRenderer::new(Vec::new(), 3);
        for i in 0..7u32 {
            renderer.draw(&i);
        }
        assert_eq!(renderer.written(), 3);
        let text = String::from_utf8(renderer.into_inner()).unwrap_or_default();
        assert_eq!(text, "0\n3\n6\n");
    }

    #[test]
    fn test_json_renderer_disables_on_write_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut renderer = JsonLinesRenderer::new(Broken, 1);
        assert!(Renderer::<u32>::is_available(&renderer));
        renderer.draw(&1u32);
        assert!(!Renderer::<u32>::is_available(&renderer));
    }
}
