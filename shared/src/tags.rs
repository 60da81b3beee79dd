use crate::Tag;

/// Editing state for one tag collection: the pending input plus the tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagEditor {
    input: String,
    tags: Vec<Tag>,
}

impl TagEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags(tags: Vec<Tag>) -> Self {
        Self {
            input: String::new(),
            tags,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn into_tags(self) -> Vec<Tag> {
        self.tags
    }

    /// Appends the trimmed input as a new tag and clears the input.
    /// Blank input changes nothing.
    pub fn confirm(&mut self) -> bool {
        let value = self.input.trim();
        if value.is_empty() {
            return false;
        }
        self.tags.push(Tag::new(value));
        self.input.clear();
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        (index < self.tags.len()).then(|| self.tags.remove(index))
    }

    pub fn set_comment(&mut self, index: usize, comment: impl Into<String>) -> bool {
        match self.tags.get_mut(index) {
            Some(tag) => {
                tag.comment = comment.into();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_then_remove() {
        let mut editor = TagEditor::new();
        editor.set_input("Okta");
        assert!(editor.confirm());
        assert_eq!(
            editor.tags(),
            &[Tag {
                value: "Okta".to_string(),
                comment: String::new()
            }]
        );
        assert_eq!(editor.input(), "");

        assert_eq!(editor.remove(0), Some(Tag::new("Okta")));
        assert!(editor.tags().is_empty());
    }

    #[test]
    fn test_blank_input_is_ignored() {
        let mut editor = TagEditor::new();
        editor.set_input("   ");
        assert!(!editor.confirm());
        assert!(editor.tags().is_empty());
        assert_eq!(editor.input(), "   ");
    }

    #[test]
    fn test_input_is_trimmed_and_duplicates_kept() {
        let mut editor = TagEditor::new();
        editor.set_input("  Workday ");
        editor.confirm();
        editor.set_input("Workday");
        editor.confirm();
        let values: Vec<_> = editor.tags().iter().map(|t| t.value.as_str()).collect();
        assert_eq!(values, vec!["Workday", "Workday"]);
    }

    #[test]
    fn test_remove_shifts_and_ignores_out_of_range() {
        let mut editor =
            TagEditor::from_tags(vec![Tag::new("a"), Tag::new("b"), Tag::new("c")]);
        assert_eq!(editor.remove(1), Some(Tag::new("b")));
        assert_eq!(editor.tags(), &[Tag::new("a"), Tag::new("c")]);
        assert_eq!(editor.remove(5), None);
        assert_eq!(editor.tags().len(), 2);
    }

    #[test]
    fn test_comment_edit_touches_one_entry() {
        let mut editor = TagEditor::from_tags(vec![Tag::new("Okta"), Tag::new("Ping")]);
        assert!(editor.set_comment(1, "SAML only"));
        assert_eq!(editor.tags()[0], Tag::new("Okta"));
        assert_eq!(editor.tags()[1].value, "Ping");
        assert_eq!(editor.tags()[1].comment, "SAML only");
        assert!(!editor.set_comment(2, "nope"));
    }
}
