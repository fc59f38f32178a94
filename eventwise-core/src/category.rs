/// Event category as stored in the backend `categories` table.
///
/// # Examples
/// ```
/// use eventwise_core::Category;
///
/// let category = Category::new("c1", "Technical").with_icon("💻");
/// assert_eq!(category.name, "Technical");
/// assert_eq!(category.icon.as_deref(), Some("💻"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Category {
    /// Backend identifier.
    pub id: String,
    /// Display name, matched against [`Event::category`](crate::Event::category).
    pub name: String,
    /// Optional icon glyph.
    #[cfg_attr(feature = "serde", serde(default))]
    pub icon: Option<String>,
}

impl Category {
    /// Construct a category without an icon.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: None,
        }
    }

    /// Attach an icon glyph.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}
