use crate::error::ChartResult;
use crate::render::{Host, Renderer};

/// No-op renderer used by tests and headless chart usage.
///
/// It still validates host content so tests can catch invalid geometry before
/// a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub last_surface_count: usize,
    pub last_primitive_count: usize,
    pub last_mark_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, host: &Host) -> ChartResult<()> {
        host.validate()?;
        self.last_surface_count = host.surfaces().len();
        self.last_primitive_count = host.primitive_count();
        self.last_mark_count = host.mark_count();
        Ok(())
    }
}
