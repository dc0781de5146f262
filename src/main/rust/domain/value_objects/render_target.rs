/// Opaque handle to the platform view/surface a render sink draws into.
/// Treated as a write-only destination; never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTarget(usize);

impl RenderTarget {
    pub fn from_raw(handle: usize) -> Self {
        Self(handle)
    }

    pub fn as_raw(self) -> usize {
        self.0
    }
}
