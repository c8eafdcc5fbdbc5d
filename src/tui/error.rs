use thiserror::Error;

/// Failures of the panel/focus engine.
///
/// Both variants indicate a defect in the screen layout or engine, never bad user
/// input: boundary keystrokes are silent no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cursor x={cursor} outside field bounds {first}..={last}")]
    OutOfRange { cursor: u16, first: u16, last: u16 },
    #[error("no editable panel on screen")]
    NoEditablePanel,
}
