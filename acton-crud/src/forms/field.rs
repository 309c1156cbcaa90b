//! Form field types and input configuration
//!
//! Defines the controls an entity form is built from.

/// HTML input types used by entity forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputType {
    /// Text input (default)
    #[default]
    Text,
    /// Number input
    Number,
    /// Date input
    Date,
    /// Time input
    Time,
    /// Date and time input
    DateTimeLocal,
    /// Hidden input
    Hidden,
}

impl InputType {
    /// Get the HTML type attribute value
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTimeLocal => "datetime-local",
            Self::Hidden => "hidden",
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option for select dropdowns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value attribute
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Create a new select option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The empty option offered before the real choices
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", "")
    }
}

/// Selected parts of a year / month / day select group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateParts {
    /// Selected year
    pub year: Option<i32>,
    /// Selected month (1-12)
    pub month: Option<u32>,
    /// Selected day (1-31)
    pub day: Option<u32>,
}

/// Kind of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Standard input field
    Input(InputType),
    /// Textarea for multi-line text
    Textarea {
        /// Number of visible text lines
        rows: Option<u32>,
    },
    /// Select dropdown
    Select {
        /// Available options
        options: Vec<SelectOption>,
    },
    /// Checkbox preceded by a hidden `false` input, so unchecked boxes submit
    Checkbox {
        /// Whether checkbox is checked
        checked: bool,
    },
    /// Three selects named `<name>(1i)`, `(2i)` and `(3i)`
    DateSelect {
        /// Selected parts
        selected: DateParts,
        /// First and last year offered
        years: (i32, i32),
    },
}

impl Default for FieldKind {
    fn default() -> Self {
        Self::Input(InputType::default())
    }
}

/// A form field with all its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Field name (used for form submission)
    pub name: String,
    /// Field kind (input, textarea, select, etc.)
    pub kind: FieldKind,
    /// Label text
    pub label: Option<String>,
    /// Current value
    pub value: Option<String>,
    /// Whether field is required
    pub required: bool,
    /// Step value for number inputs
    pub step: Option<String>,
    /// CSS class(es)
    pub class: Option<String>,
    /// Element ID (defaults to name if not set)
    pub id: Option<String>,
    /// Key of this field's validation errors (defaults to name if not set)
    pub error_key: Option<String>,
    /// Help text shown below the field
    pub help_text: Option<String>,
    /// Custom attributes
    pub custom_attrs: Vec<(String, String)>,
}

impl FormField {
    /// Create a new input field
    #[must_use]
    pub fn input(name: impl Into<String>, input_type: InputType) -> Self {
        Self::new(name, FieldKind::Input(input_type))
    }

    /// Create a new textarea field
    #[must_use]
    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Textarea { rows: None })
    }

    /// Create a new select field
    #[must_use]
    pub fn select(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Select {
                options: Vec::new(),
            },
        )
    }

    /// Create a new checkbox field
    #[must_use]
    pub fn checkbox(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Checkbox { checked: false })
    }

    /// Create a new year / month / day select group
    #[must_use]
    pub fn date_select(name: impl Into<String>, years: (i32, i32)) -> Self {
        Self::new(
            name,
            FieldKind::DateSelect {
                selected: DateParts::default(),
                years,
            },
        )
    }

    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            label: None,
            value: None,
            required: false,
            step: None,
            class: None,
            id: None,
            error_key: None,
            help_text: None,
            custom_attrs: Vec::new(),
        }
    }

    /// Get the effective ID (custom ID or field name)
    #[must_use]
    pub fn effective_id(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    /// Get the key its validation errors are stored under
    #[must_use]
    pub fn effective_error_key(&self) -> &str {
        self.error_key.as_deref().unwrap_or(&self.name)
    }

    /// Check if this field is a hidden input
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        matches!(self.kind, FieldKind::Input(InputType::Hidden))
    }

    /// Check if this field is a checkbox
    #[must_use]
    pub const fn is_checkbox(&self) -> bool {
        matches!(self.kind, FieldKind::Checkbox { .. })
    }
}
