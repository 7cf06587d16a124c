/// Flags shared by the detector and the sync routines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineState {
    /// Set while the engine writes to the sidebar and until the records those
    /// writes produced have been flushed.
    pub suspended: bool,
    /// Whether the structural observer is attached.
    pub attached: bool,
}

impl EngineState {
    pub fn suspend(&mut self) {
        self.suspended = true;
    }

    pub fn release(&mut self) {
        self.suspended = false;
    }
}
