use serde::Serialize;

pub const GOAL_TITLE_MIN_CHARS: usize = 3;
pub const GOAL_DESCRIPTION_MIN_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Goal title must be at least 3 characters long")]
    GoalTitleTooShort,
    #[error("Goal description must be at least 10 characters long")]
    GoalDescriptionTooShort,
}

/// Text fields of a submitted form, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// First value for `name`, like `FormData.get`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatForm {
    fields: FormFields,
}

impl ChatForm {
    pub const PROMPT_FIELD: &'static str = "prompt";

    #[must_use]
    pub fn new(fields: FormFields) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        self.fields.get(Self::PROMPT_FIELD).unwrap_or_default()
    }

    #[must_use]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalForm {
    fields: FormFields,
}

impl GoalForm {
    pub const TITLE_FIELD: &'static str = "title";
    pub const DESCRIPTION_FIELD: &'static str = "description";

    #[must_use]
    pub fn new(fields: FormFields) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let title = self.fields.get(Self::TITLE_FIELD).unwrap_or_default();
        if title.trim().chars().count() < GOAL_TITLE_MIN_CHARS {
            return Err(ValidationError::GoalTitleTooShort);
        }
        let description = self
            .fields
            .get(Self::DESCRIPTION_FIELD)
            .unwrap_or_default();
        if description.trim().chars().count() < GOAL_DESCRIPTION_MIN_CHARS {
            return Err(ValidationError::GoalDescriptionTooShort);
        }
        Ok(())
    }
}
