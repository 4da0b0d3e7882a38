//! Wizard State Machine
//!
//! Tracks which step of the editor is active. Steps form a linear sequence
//! preceded by the `Welcome` sentinel (index -1). The template library is a
//! modal overlay that can be opened from anywhere and returns to the step it
//! was opened from. There is no terminal state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A position in the wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum WizardStep {
    #[default]
    Welcome,
    BasicInfo,
    Instructions,
    ModelLock,
    Details,
    Export,
}

impl WizardStep {
    /// The editable steps, in order.
    pub const STEPS: [WizardStep; 5] = [
        WizardStep::BasicInfo,
        WizardStep::Instructions,
        WizardStep::ModelLock,
        WizardStep::Details,
        WizardStep::Export,
    ];

    pub fn index(&self) -> i32 {
        match self {
            WizardStep::Welcome => -1,
            WizardStep::BasicInfo => 0,
            WizardStep::Instructions => 1,
            WizardStep::ModelLock => 2,
            WizardStep::Details => 3,
            WizardStep::Export => 4,
        }
    }

    pub fn from_index(index: i32) -> Option<Self> {
        if index == -1 {
            return Some(WizardStep::Welcome);
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::STEPS.get(i).copied())
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Welcome => "Welcome",
            WizardStep::BasicInfo => "Basic Info",
            WizardStep::Instructions => "Instructions",
            WizardStep::ModelLock => "Model Lock",
            WizardStep::Details => "Details",
            WizardStep::Export => "Export",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl TryFrom<i32> for WizardStep {
    type Error = String;

    fn try_from(index: i32) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or_else(|| format!("Invalid wizard step index: {}", index))
    }
}

impl From<WizardStep> for i32 {
    fn from(step: WizardStep) -> i32 {
        step.index()
    }
}

/// What the host should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "camelCase")]
pub enum Screen {
    Welcome,
    Step { step: WizardStep },
    #[serde(rename_all = "camelCase")]
    TemplateLibrary { return_to: WizardStep },
}

/// Wizard controller state.
///
/// Persists as the bare step index; the library overlay is transient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WizardStep", into = "WizardStep")]
pub struct Wizard {
    step: WizardStep,
    library_origin: Option<WizardStep>,
}

impl From<WizardStep> for Wizard {
    fn from(step: WizardStep) -> Self {
        Self {
            step,
            library_origin: None,
        }
    }
}

impl From<Wizard> for WizardStep {
    fn from(wizard: Wizard) -> Self {
        wizard.step
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn is_library_open(&self) -> bool {
        self.library_origin.is_some()
    }

    pub fn screen(&self) -> Screen {
        match (self.library_origin, self.step) {
            (Some(return_to), _) => Screen::TemplateLibrary { return_to },
            (None, WizardStep::Welcome) => Screen::Welcome,
            (None, step) => Screen::Step { step },
        }
    }

    /// `Welcome -> BasicInfo`. No-op anywhere else.
    pub fn start_creating(&mut self) -> bool {
        if self.step != WizardStep::Welcome || self.is_library_open() {
            return false;
        }
        self.step = WizardStep::BasicInfo;
        true
    }

    /// Advance one step; no-op on the last step or while the library is open.
    pub fn next(&mut self) -> bool {
        if self.is_library_open() {
            return false;
        }
        match WizardStep::from_index(self.step.index() + 1) {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Retreat one step; no-op on the first step, on `Welcome`, or while the
    /// library is open.
    pub fn previous(&mut self) -> bool {
        if self.is_library_open() || self.step.index() <= 0 {
            return false;
        }
        match WizardStep::from_index(self.step.index() - 1) {
            Some(step) => {
                self.step = step;
                true
            }
            None => false,
        }
    }

    /// Set the step directly, closing the library if it is open.
    /// Out-of-range indices are ignored.
    pub fn jump_to(&mut self, index: i32) -> bool {
        match WizardStep::from_index(index) {
            Some(step) => {
                self.step = step;
                self.library_origin = None;
                true
            }
            None => false,
        }
    }

    pub fn open_library(&mut self) -> bool {
        if self.is_library_open() {
            return false;
        }
        self.library_origin = Some(self.step);
        true
    }

    /// Close the library and return to the step it was opened from.
    pub fn close_library(&mut self) -> bool {
        match self.library_origin.take() {
            Some(origin) => {
                self.step = origin;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
