use crate::error::NetcliError;

/// Reply sent when an interactive sub-prompt is seen during a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Send this text verbatim.
    Literal(&'static str),
    /// Send the session secret (falling back to the login password).
    Secret,
}

/// One step of an interactive enter/exit sequence: when `expect` matches the
/// channel output, `reply` is sent.
#[derive(Debug, Clone, Copy)]
pub struct Interaction {
    pub expect: &'static str,
    pub reply: Reply,
}

/// Immutable description of a terminal mode.
///
/// `parent` is the index (within the platform's mode array) of the mode this
/// one must be entered from; `None` means the mode is entered from the top
/// level. An empty `check_string` marks a mode that leaves the prompt
/// unchanged and cannot be verified by probing it.
#[derive(Debug, Clone, Copy)]
pub struct ModeDescriptor {
    pub name: &'static str,
    pub enter_command: &'static str,
    pub exit_command: &'static str,
    pub check_string: &'static str,
    pub parent: Option<usize>,
    pub enter_interactions: &'static [Interaction],
    pub exit_interactions: &'static [Interaction],
    /// Text whose presence in the enter output means the transition failed.
    pub error_string: Option<&'static str>,
}

/// Stack of currently active terminal modes, bottom-up, holding indices into
/// the platform's mode array.
///
/// Invariant: each element's declared parent equals its predecessor on the
/// stack (or is `None` for the bottom element).
#[derive(Debug, Default, Clone)]
pub struct ModeStack {
    stack: Vec<usize>,
}

impl ModeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the currently active (topmost) mode.
    pub fn current(&self) -> Option<usize> {
        self.stack.last().copied()
    }

    pub fn contains(&self, mode: usize) -> bool {
        self.stack.contains(&mode)
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Push a mode, enforcing that its parent is the current top.
    pub fn push(&mut self, mode: usize, parent: Option<usize>) -> Result<(), NetcliError> {
        if self.contains(mode) {
            return Ok(());
        }
        if parent != self.current() {
            return Err(NetcliError::UsageError(format!(
                "mode {} entered out of order (expected parent {:?}, current {:?})",
                mode,
                parent,
                self.current()
            )));
        }
        self.stack.push(mode);
        Ok(())
    }

    /// Remove a mode and everything entered above it.
    pub fn remove(&mut self, mode: usize) {
        if let Some(pos) = self.stack.iter().position(|&m| m == mode) {
            self.stack.truncate(pos);
        }
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
