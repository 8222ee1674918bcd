use crate::errors::{AppError, AppResult};

/// A fixed instruction string with named `{placeholder}` slots.
///
/// Only declared variables are substituted; any other brace text (JSON examples,
/// `<TAGS>`) is left as written. Substituted values are never re-scanned, so a
/// topic that itself contains `{task}` is inserted literally.
#[derive(Clone, Copy, Debug)]
pub struct PromptTemplate {
    template: &'static str,
    variables: &'static [&'static str],
}

impl PromptTemplate {
    pub const fn new(template: &'static str, variables: &'static [&'static str]) -> Self {
        Self {
            template,
            variables,
        }
    }

    pub fn variables(&self) -> &'static [&'static str] {
        self.variables
    }

    pub fn render(&self, values: &[(&str, &str)]) -> AppResult<String> {
        let lookup = |name: &str| {
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
        };

        if let Some(missing) = self.variables.iter().find(|name| lookup(name).is_none()) {
            return Err(AppError::InternalError(format!(
                "Missing prompt variable '{}'",
                missing
            )));
        }

        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template;

        while let Some(open) = rest.find('{') {
            rendered.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let substitution = after.find('}').and_then(|close| {
                let name = &after[..close];
                if self.variables.contains(&name) {
                    lookup(name).map(|value| (value, close))
                } else {
                    None
                }
            });

            match substitution {
                Some((value, close)) => {
                    rendered.push_str(value);
                    rest = &after[close + 1..];
                }
                None => {
                    rendered.push('{');
                    rest = after;
                }
            }
        }
        rendered.push_str(rest);

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: PromptTemplate =
        PromptTemplate::new("You are a {role}. Task: {task}. Again: {role}.", &["role", "task"]);

    #[test]
    fn render_substitutes_every_occurrence() {
        let rendered = GREETING
            .render(&[("role", "Instructor"), ("task", "teach rust")])
            .expect("template should render");

        assert_eq!(
            rendered,
            "You are a Instructor. Task: teach rust. Again: Instructor."
        );
    }

    #[test]
    fn render_fails_on_missing_variable() {
        let err = GREETING.render(&[("role", "Instructor")]).unwrap_err();

        assert!(err.to_string().contains("'task'"));
    }

    #[test]
    fn render_leaves_undeclared_braces_alone() {
        let template = PromptTemplate::new(
            r#"Answer about {topic} like [{"question": "Q"}] and {unknown}"#,
            &["topic"],
        );

        let rendered = template.render(&[("topic", "graphs")]).expect("should render");

        assert_eq!(
            rendered,
            r#"Answer about graphs like [{"question": "Q"}] and {unknown}"#
        );
    }

    #[test]
    fn render_does_not_rescan_substituted_values() {
        let rendered = GREETING
            .render(&[("role", "{task}"), ("task", "x")])
            .expect("should render");

        assert_eq!(rendered, "You are a {task}. Task: x. Again: {task}.");
    }

    #[test]
    fn render_handles_unclosed_brace() {
        let template = PromptTemplate::new("open { brace and {name}", &["name"]);

        let rendered = template.render(&[("name", "ok")]).expect("should render");
        assert_eq!(rendered, "open { brace and ok");
    }
}
