//! Declarative payload validation applied before business logic.
//!
//! Rule sets mirror the forms they guard; evaluation is fail fast and
//! yields the first failing rule's message for the originating view.

/// A single structural check on one field value
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    Required,
    MinLength(usize),
    Email,
}

impl Rule {
    fn passes(&self, value: &str) -> bool {
        match self {
            Rule::Required => !value.is_empty(),
            Rule::MinLength(min) => value.chars().count() >= *min,
            Rule::Email => is_email_shaped(value),
        }
    }
}

/// Checks for one named field, each paired with its failure message
#[derive(Debug)]
pub struct FieldRules {
    pub field: &'static str,
    pub checks: Vec<(Rule, &'static str)>,
}

impl FieldRules {
    fn new(field: &'static str, checks: Vec<(Rule, &'static str)>) -> Self {
        Self { field, checks }
    }
}

/// Validate field values against a rule set
///
/// Values are trimmed before checking; a field absent from `values`
/// validates as empty, so `Required` is what reports it. Returns the
/// first failing rule's message.
pub fn validate(rules: &[FieldRules], values: &[(&str, &str)]) -> Result<(), &'static str> {
    for field_rules in rules {
        let value = values
            .iter()
            .find(|(name, _)| *name == field_rules.field)
            .map(|(_, value)| value.trim())
            .unwrap_or("");

        for (rule, message) in &field_rules.checks {
            if !rule.passes(value) {
                return Err(message);
            }
        }
    }

    Ok(())
}

/// Rules for the signup form
pub fn signup_rules() -> Vec<FieldRules> {
    vec![
        FieldRules::new(
            "username",
            vec![
                (Rule::Required, "Username is required"),
                (Rule::MinLength(3), "Username must be at least 3 characters"),
            ],
        ),
        FieldRules::new(
            "email",
            vec![
                (Rule::Required, "Email is required"),
                (Rule::Email, "Enter a valid email"),
            ],
        ),
        FieldRules::new(
            "password",
            vec![
                (Rule::Required, "Password is required"),
                (Rule::MinLength(6), "Password must be at least 6 characters"),
            ],
        ),
    ]
}

/// Rules for the login form
pub fn login_rules() -> Vec<FieldRules> {
    vec![
        FieldRules::new("username", vec![(Rule::Required, "Username is required")]),
        FieldRules::new("password", vec![(Rule::Required, "Password is required")]),
    ]
}

/// Rules for the new directory record form
pub fn new_record_rules() -> Vec<FieldRules> {
    vec![
        FieldRules::new(
            "name",
            vec![
                (Rule::Required, "Name is required"),
                (Rule::MinLength(2), "Name must be at least 2 characters"),
            ],
        ),
        FieldRules::new(
            "email",
            vec![
                (Rule::Required, "Email is required"),
                (Rule::Email, "Enter a valid email address"),
            ],
        ),
    ]
}

/// Rules for the edit record form
pub fn edit_record_rules() -> Vec<FieldRules> {
    vec![FieldRules::new(
        "email",
        vec![
            (Rule::Required, "Email is required"),
            (Rule::Email, "Enter a valid email address"),
        ],
    )]
}

/// Structural email check: one local part, one domain with a dot, no
/// whitespace. Deliverability is not this gate's concern.
fn is_email_shaped(value: &str) -> bool {
    if value.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain.contains('.')
}
