//! Row template interpolation
//!
//! Templates are plain text with `{variable}` placeholders; `{{` and `}}`
//! escape literal braces. A placeholder that resolves to nothing is an
//! error naming the variable and the component, so configuration mistakes
//! surface instead of leaking raw templates into documents.

use std::collections::BTreeMap;

use crate::error::BillingError;

/// Renders a template against the given variables.
pub fn render(
    template: &str,
    component_id: &str,
    vars: &BTreeMap<String, String>,
) -> Result<String, BillingError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => {
                            return Err(BillingError::MalformedTemplate {
                                component_id: component_id.to_string(),
                                template: template.to_string(),
                            })
                        }
                    }
                }
                match vars.get(&name) {
                    Some(value) => out.push_str(value),
                    None => {
                        return Err(BillingError::MissingVariable {
                            name,
                            component_id: component_id.to_string(),
                        })
                    }
                }
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(BillingError::MalformedTemplate {
                        component_id: component_id.to_string(),
                        template: template.to_string(),
                    });
                }
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_basic_substitution() {
        let rendered = render(
            "{qty} {units} @ {rate}",
            "fees",
            &vars(&[("qty", "5"), ("units", "hours"), ("rate", "100.00")]),
        )
        .unwrap();
        assert_eq!(rendered, "5 hours @ 100.00");
    }

    #[test]
    fn test_missing_variable_names_key_and_component() {
        let err = render("{nope}", "fees", &vars(&[])).unwrap_err();
        match err {
            BillingError::MissingVariable { name, component_id } => {
                assert_eq!(name, "nope");
                assert_eq!(component_id, "fees");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_escaped_braces() {
        let rendered = render("literal {{braces}} kept", "fees", &vars(&[])).unwrap();
        assert_eq!(rendered, "literal {braces} kept");
    }

    #[test]
    fn test_unbalanced_brace_is_malformed() {
        assert!(matches!(
            render("oops {qty", "fees", &vars(&[("qty", "1")])),
            Err(BillingError::MalformedTemplate { .. })
        ));
        assert!(matches!(
            render("oops } alone", "fees", &vars(&[])),
            Err(BillingError::MalformedTemplate { .. })
        ));
    }

    #[test]
    fn test_empty_template() {
        assert_eq!(render("", "fees", &vars(&[])).unwrap(), "");
    }
}
