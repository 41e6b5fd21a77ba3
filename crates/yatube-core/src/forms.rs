//! The post form shared by the create and edit views.

use serde::Serialize;

use crate::domain::{Group, Post};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_CHOICE: &str = "Select a valid choice. That choice is not one of the available choices.";

/// Label of the empty group choice.
pub const EMPTY_CHOICE_LABEL: &str = "---------";

/// How a field is entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FieldKind {
    /// Free text, rendered as a textarea.
    Text,
    /// One value out of a fixed list.
    Choice(Vec<Choice>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub required: bool,
    pub kind: FieldKind,
    pub value: String,
    pub errors: Vec<String>,
}

impl FormField {
    pub fn is_text(&self) -> bool {
        matches!(self.kind, FieldKind::Text)
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, FieldKind::Choice(_))
    }

    pub fn choices(&self) -> &[Choice] {
        match &self.kind {
            FieldKind::Choice(choices) => choices,
            FieldKind::Text => &[],
        }
    }
}

/// Cleaned values of a valid post form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostInput {
    pub text: String,
    pub group_id: Option<i64>,
}

/// The `text` + `group` form.
#[derive(Debug, Clone, Serialize)]
pub struct PostForm {
    pub fields: Vec<FormField>,
}

impl PostForm {
    /// An empty form offering `groups` as choices.
    pub fn blank(groups: &[Group]) -> Self {
        Self::with_values(groups, String::new(), String::new())
    }

    /// A form prefilled from an existing post.
    pub fn for_post(post: &Post, groups: &[Group]) -> Self {
        let group = post.group_id.map(|id| id.to_string()).unwrap_or_default();
        Self::with_values(groups, post.text.clone(), group)
    }

    /// Binds submitted values and validates them.
    ///
    /// Returns the cleaned input, or the bound form carrying field errors.
    pub fn submit(groups: &[Group], text: &str, group: &str) -> Result<PostInput, PostForm> {
        let mut form = Self::with_values(groups, text.to_string(), group.trim().to_string());

        let text = text.trim();
        if text.is_empty() {
            form.add_error("text", REQUIRED);
        }

        let group = group.trim();
        let group_id = if group.is_empty() {
            None
        } else {
            match group.parse::<i64>() {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    form.add_error("group", INVALID_CHOICE);
                    None
                }
            }
        };

        if form.has_errors() {
            return Err(form);
        }

        Ok(PostInput {
            text: text.to_string(),
            group_id,
        })
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_errors(&self) -> bool {
        self.fields.iter().any(|f| !f.errors.is_empty())
    }

    fn add_error(&mut self, name: &str, message: &str) {
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == name) {
            field.errors.push(message.to_string());
        }
    }

    fn with_values(groups: &[Group], text: String, group: String) -> Self {
        let mut choices = Vec::with_capacity(groups.len() + 1);
        choices.push(Choice {
            value: String::new(),
            label: EMPTY_CHOICE_LABEL.to_string(),
            selected: group.is_empty(),
        });
        choices.extend(groups.iter().map(|g| {
            let value = g.id.to_string();
            Choice {
                selected: value == group,
                value,
                label: g.title.clone(),
            }
        }));

        Self {
            fields: vec![
                FormField {
                    name: "text",
                    label: "Post text",
                    help_text: "Text of the new post",
                    required: true,
                    kind: FieldKind::Text,
                    value: text,
                    errors: Vec::new(),
                },
                FormField {
                    name: "group",
                    label: "Group",
                    help_text: "Group the post will belong to",
                    required: false,
                    kind: FieldKind::Choice(choices),
                    value: group,
                    errors: Vec::new(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<Group> {
        vec![Group {
            id: 7,
            title: "Cats".to_string(),
            slug: "cats".to_string(),
            description: "About cats".to_string(),
        }]
    }

    #[test]
    fn blank_form_has_text_and_group_choice() {
        let form = PostForm::blank(&groups());

        assert!(form.field("text").unwrap().is_text());
        let group = form.field("group").unwrap();
        assert!(group.is_choice());
        let values: Vec<_> = group.choices().iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["", "7"]);
        assert!(group.choices()[0].selected);
    }

    #[test]
    fn valid_submission_is_cleaned() {
        let input = PostForm::submit(&groups(), "  Hello  ", "7").unwrap();
        assert_eq!(
            input,
            PostInput {
                text: "Hello".to_string(),
                group_id: Some(7)
            }
        );

        let ungrouped = PostForm::submit(&groups(), "Hello", "").unwrap();
        assert_eq!(ungrouped.group_id, None);
    }

    #[test]
    fn blank_text_is_rejected() {
        let form = PostForm::submit(&groups(), "   ", "").unwrap_err();
        assert_eq!(form.field("text").unwrap().errors, vec![REQUIRED.to_string()]);
        assert!(form.field("group").unwrap().errors.is_empty());
    }

    #[test]
    fn unknown_group_is_rejected() {
        for group in ["8", "cats"] {
            let form = PostForm::submit(&groups(), "Hello", group).unwrap_err();
            assert_eq!(
                form.field("group").unwrap().errors,
                vec![INVALID_CHOICE.to_string()]
            );
            assert_eq!(form.field("text").unwrap().value, "Hello");
        }
    }

    #[test]
    fn edit_form_preselects_group() {
        let post = Post {
            id: 1,
            text: "Old text".to_string(),
            author_id: 1,
            group_id: Some(7),
            pub_date: chrono::Utc::now(),
        };
        let form = PostForm::for_post(&post, &groups());

        assert_eq!(form.field("text").unwrap().value, "Old text");
        let selected: Vec<_> = form
            .field("group")
            .unwrap()
            .choices()
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(selected, vec!["Cats"]);
    }
}
