use super::*;

/// Declared kind of a form control, derived from its tag and `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Email,
    Telephone,
    Other,
}

impl FieldKind {
    /// `input` types `text`/`search` (or no type) and every `textarea` and
    /// `select` are [`FieldKind::Text`].
    pub fn from_control(tag: &str, input_type: Option<&str>) -> Self {
        if tag.eq_ignore_ascii_case("textarea") || tag.eq_ignore_ascii_case("select") {
            return Self::Text;
        }
        if !tag.eq_ignore_ascii_case("input") {
            return Self::Other;
        }

        let kind = input_type
            .map(|kind| kind.trim().to_ascii_lowercase())
            .unwrap_or_default();
        match kind.as_str() {
            "" | "text" | "search" => Self::Text,
            "email" => Self::Email,
            "tel" => Self::Telephone,
            _ => Self::Other,
        }
    }
}

/// Outcome of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(String),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message.as_str()),
        }
    }
}

/// Snapshot of a control at validation time.
#[derive(Debug, Clone)]
pub(crate) struct Field {
    pub(crate) node: NodeId,
    pub(crate) value: String,
    pub(crate) required: bool,
    pub(crate) kind: FieldKind,
}

impl Field {
    pub(crate) fn read(dom: &Dom, node: NodeId) -> Result<Self> {
        let element = dom
            .element(node)
            .ok_or_else(|| Error::Runtime("field is not an element".into()))?;
        let value = checkable_value(dom, node).unwrap_or_else(|| element.value.clone());
        Ok(Self {
            node,
            value,
            required: element.attrs.contains_key("required"),
            kind: FieldKind::from_control(
                &element.tag_name,
                element.attrs.get("type").map(String::as_str),
            ),
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Form {
    pub(crate) action: String,
    pub(crate) method: String,
}

impl Form {
    /// An empty or missing `action` submits to the page itself.
    pub(crate) fn read(dom: &Dom, node: NodeId, document_url: &str) -> Result<Self> {
        if !dom.has_tag(node, "form") {
            return Err(Error::Runtime(format!(
                "form target is <{}>",
                dom.tag_name(node).unwrap_or("#text")
            )));
        }
        let action = dom
            .attr(node, "action")
            .map(|action| action.trim().to_string())
            .filter(|action| !action.is_empty())
            .unwrap_or_else(|| document_url.to_string());
        let method = dom
            .attr(node, "method")
            .map(|method| method.trim().to_ascii_uppercase())
            .filter(|method| method == "POST")
            .unwrap_or_else(|| "GET".to_string());
        Ok(Self { action, method })
    }
}
