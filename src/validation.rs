use super::*;

// Character class body for the ECMAScript `\s` set.
macro_rules! js_space_class {
    () => {
        "\t\n\u{0B}\u{0C}\r \u{A0}\u{1680}\u{2000}-\u{200A}\u{2028}\u{2029}\u{202F}\u{205F}\u{3000}\u{FEFF}"
    };
}

const EMAIL_PATTERN: &str = concat!(
    "^[^",
    js_space_class!(),
    "@]+@[^",
    js_space_class!(),
    "@]+\\.[^",
    js_space_class!(),
    "@]+$"
);
// Counts every allowed character toward the minimum, not only digits.
const TELEPHONE_PATTERN: &str = concat!("^\\+?[0-9", js_space_class!(), "\\-()]{10,}$");

const REQUIRED_FIELDS_SELECTOR: &str = "input[required], textarea[required], select[required]";

/// ECMAScript WhiteSpace and LineTerminator. Unlike `char::is_whitespace`
/// this excludes U+0085 and includes U+FEFF.
fn is_js_whitespace(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

/// Trims the whitespace set `String.prototype.trim` removes.
pub(crate) fn js_trim(value: &str) -> &str {
    value.trim_matches(is_js_whitespace)
}

/// Compiled per-kind rules plus the messages they report.
#[derive(Debug, Clone)]
pub(crate) struct FieldRules {
    email: Regex,
    telephone: Regex,
    required_message: String,
    email_message: String,
    telephone_message: String,
}

impl FieldRules {
    pub(crate) fn new(config: &EnhancerConfig) -> Result<Self> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            telephone: Regex::new(TELEPHONE_PATTERN)?,
            required_message: config.required_message.clone(),
            email_message: config.email_message.clone(),
            telephone_message: config.telephone_message.clone(),
        })
    }

    /// Pure rule evaluation over a field snapshot.
    pub(crate) fn check(&self, kind: FieldKind, required: bool, raw_value: &str) -> Result<ValidationResult> {
        let value = js_trim(raw_value);

        if required && value.is_empty() {
            return Ok(ValidationResult::Invalid(self.required_message.clone()));
        }
        if value.is_empty() {
            return Ok(ValidationResult::Valid);
        }

        let (pattern, message) = match kind {
            FieldKind::Email => (&self.email, &self.email_message),
            FieldKind::Telephone => (&self.telephone, &self.telephone_message),
            FieldKind::Text | FieldKind::Other => return Ok(ValidationResult::Valid),
        };

        if pattern.is_match(value)? {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid(message.clone()))
        }
    }
}

impl<T: Transport> Page<T> {
    /// Validates one control and updates its inline error.
    pub(crate) fn validate_field_node(&mut self, node: NodeId) -> Result<ValidationResult> {
        let field = Field::read(&self.dom, node)?;
        let presenter = ErrorPresenter::new(&self.config);

        presenter.ensure_slot(&mut self.dom, field.node)?;
        presenter.clear(&mut self.dom, field.node)?;

        let result = self.rules.check(field.kind, field.required, &field.value)?;
        if let ValidationResult::Invalid(message) = &result {
            presenter.show(&mut self.dom, field.node, message)?;
        }

        let label = self.trace_node_label(field.node);
        self.trace_form_line(format!(
            "[form] validate field={} kind={:?} valid={}",
            label,
            field.kind,
            result.is_valid()
        ));
        Ok(result)
    }

    /// Validates every required control of `form`, showing all errors, and
    /// shows the success message when none failed.
    pub(crate) fn validate_form_node(&mut self, form: NodeId) -> Result<bool> {
        let fields = self
            .dom
            .query_selector_all_from(form, REQUIRED_FIELDS_SELECTOR)?;

        let mut is_valid = true;
        for field in fields {
            if !self.validate_field_node(field)?.is_valid() {
                is_valid = false;
            }
        }

        if is_valid {
            self.show_success(form)?;
        }

        let label = self.trace_node_label(form);
        self.trace_form_line(format!("[form] validate form={label} valid={is_valid}"));
        Ok(is_valid)
    }
}
