//! Field descriptors and type tags

/// Type tag of an entity attribute
///
/// Drives default formatting, the form control kind and whether the field
/// can be sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Short text, rendered as a text input
    String,
    /// Long text, rendered as a textarea and formatted in paragraphs
    Text,
    /// Whole number
    Integer,
    /// Decimal number, formatted with two decimals
    Float,
    /// Calendar date, edited with year / month / day selects
    Date,
    /// Time of day
    Time,
    /// Date and time
    DateTime,
    /// Boolean flag, edited with a checkbox
    Boolean,
    /// Foreign key to another resource (belongs-to)
    Association {
        /// Resource name of the referenced entity (e.g. `countries`)
        target: &'static str,
    },
    /// Collection of dependent entities (has-many), display only
    Relation {
        /// Resource name of the dependent entities
        target: &'static str,
    },
}

impl FieldType {
    /// Coarse type tag: `text`, `number`, `date`, `boolean`, `association` or `relation`
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::String | Self::Text => "text",
            Self::Integer | Self::Float => "number",
            Self::Date | Self::Time | Self::DateTime => "date",
            Self::Boolean => "boolean",
            Self::Association { .. } => "association",
            Self::Relation { .. } => "relation",
        }
    }

    /// Referenced resource for associations and relations
    #[must_use]
    pub const fn target(&self) -> Option<&'static str> {
        match self {
            Self::Association { target } | Self::Relation { target } => Some(*target),
            _ => None,
        }
    }

    /// Whether values of this type can be edited in a form
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        !matches!(self, Self::Relation { .. })
    }
}

/// Metadata describing one displayable / editable entity attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Attribute name, also the column and form parameter name
    pub name: String,
    /// Type tag
    pub field_type: FieldType,
    /// Whether table headers for this field link to a sorted list
    pub sortable: bool,
}

impl FieldDescriptor {
    /// Create a descriptor; everything but relations is sortable
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            sortable: !matches!(field_type, FieldType::Relation { .. }),
            field_type,
        }
    }

    /// Mark the field as not sortable
    #[must_use]
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Shorthand for [`FieldType::String`]
    #[must_use]
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::String)
    }

    /// Shorthand for [`FieldType::Text`]
    #[must_use]
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    /// Shorthand for [`FieldType::Integer`]
    #[must_use]
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// Shorthand for [`FieldType::Float`]
    #[must_use]
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    /// Shorthand for [`FieldType::Date`]
    #[must_use]
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    /// Shorthand for [`FieldType::DateTime`]
    #[must_use]
    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    /// Shorthand for [`FieldType::Boolean`]
    #[must_use]
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Shorthand for [`FieldType::Association`]
    #[must_use]
    pub fn association(name: impl Into<String>, target: &'static str) -> Self {
        Self::new(name, FieldType::Association { target })
    }

    /// Shorthand for [`FieldType::Relation`]
    #[must_use]
    pub fn relation(name: impl Into<String>, target: &'static str) -> Self {
        Self::new(name, FieldType::Relation { target })
    }
}
