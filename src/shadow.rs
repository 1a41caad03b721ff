//! Booleans with a computed default and an optional explicit override.

/// A boolean whose value is either an explicit override or, failing that,
/// an implicit value computed by the program.
///
/// ```
/// use conscope::ShadowBool;
///
/// let mut b = ShadowBool::new(true);
/// b.set_implicit(false);
/// assert!(!b.get());
/// b.set_explicit(true);
/// assert!(b.get());
/// b.reset();
/// assert!(b.get());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShadowBool {
    default: bool,
    implicit: bool,
    explicit: Option<bool>,
}

impl ShadowBool {
    pub fn new(default: bool) -> Self {
        Self {
            default,
            implicit: default,
            explicit: None,
        }
    }

    /// Drop the override and return the implicit value to the default.
    pub fn reset(&mut self) {
        self.implicit = self.default;
        self.explicit = None;
    }

    /// Drop the override only, keeping the implicit value.
    pub fn clear_explicit(&mut self) {
        self.explicit = None;
    }

    pub fn set_explicit(&mut self, value: bool) {
        self.explicit = Some(value);
    }

    pub fn set_implicit(&mut self, value: bool) {
        self.implicit = value;
    }

    pub fn get(&self) -> bool {
        self.explicit.unwrap_or(self.implicit)
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit.is_some()
    }
}

impl From<ShadowBool> for bool {
    fn from(value: ShadowBool) -> Self {
        value.get()
    }
}
