/// Explicit knobs for a single encoder or decoder. Nothing here is global: every codec entry point
/// either takes an `Options` or uses `Options::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    trace: bool,
    line_width: usize,
}

impl Options {

    /// Column at which base64 armor gets wrapped, as PEM does.
    pub const PEM_WIDTH: usize = 64;

    pub fn new() -> Self {
        Self { trace: false, line_width: Self::PEM_WIDTH }
    }

    /// Emit a `tracing` event for every shape dispatch and every file access.
    pub fn trace(mut self, on: bool) -> Self {
        self.trace = on;
        self
    }

    /// Line width of base64 armor. Zero disables wrapping.
    pub fn line_width(mut self, width: usize) -> Self {
        self.line_width = width;
        self
    }

    pub fn is_tracing(&self) -> bool {
        self.trace
    }

    pub fn width(&self) -> usize {
        self.line_width
    }

}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}
