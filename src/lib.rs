//! Form validation, submission and menu search behaviors for a static
//! storefront page.
//!
//! The behaviors run against [`Page`], a deterministic page model built from
//! HTML: a DOM arena, bubbling event dispatch, a virtual clock for timers and a
//! pluggable [`Transport`] for the AJAX submission path.
//!
//! ```
//! use storefront_forms::{Page, Result};
//!
//! fn main() -> Result<()> {
//!     let html = r#"
//!         <form id='contact' action='/contact' method='post'>
//!           <div class='group'><input id='name' name='name' required></div>
//!           <input id='send' type='submit' value='Send'>
//!         </form>
//!     "#;
//!     let mut page = Page::from_html(html)?;
//!     page.submit("#contact")?;
//!     page.assert_text("#contact .error", "This field is required")?;
//!     assert!(page.take_native_submissions().is_empty());
//!     Ok(())
//! }
//! ```

use std::collections::{HashMap, HashSet, VecDeque};
use std::error::Error as StdError;
use std::fmt;

mod config;
mod dom;
mod events;
mod field;
mod form_controls;
mod html;
mod page;
mod presenter;
mod regex;
mod scheduler;
mod search;
mod selector;
mod submission;
mod trace;
mod transport;
mod validation;

#[cfg(test)]
mod tests;

pub use config::{EnhancerConfig, SuccessTimerPolicy};
pub use field::{FieldKind, ValidationResult};
pub use page::{NativeSubmission, Page};
pub use scheduler::PendingTimer;
pub use submission::SubmitControlState;
pub use transport::{
    MockTransport, SubmissionRequest, Transport, TransportError, TransportResponse,
};

use dom::{Dom, NodeId};
use events::{Behavior, ListenerStore};
use field::{Field, Form};
use form_controls::{
    checkable_value, form_data_entries, is_form_control, is_submit_control, reset_form,
    serialize_form_urlencoded,
};
use html::parse_html;
use presenter::{ErrorPresenter, SuccessPresenter};
use regex::{Regex, RegexError};
use scheduler::{ScheduledTask, Scheduler, TimerTask};
use search::{Debouncer, filter_menu_rows};
use submission::SubmissionDispatcher;
use trace::TraceState;
use validation::{FieldRules, js_trim};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    HtmlParse(String),
    UnsupportedSelector(String),
    SelectorNotFound(String),
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    Regex(String),
    Runtime(String),
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HtmlParse(msg) => write!(f, "html parse error: {msg}"),
            Self::UnsupportedSelector(selector) => write!(f, "unsupported selector: {selector}"),
            Self::SelectorNotFound(selector) => write!(f, "selector not found: {selector}"),
            Self::TypeMismatch {
                selector,
                expected,
                actual,
            } => write!(
                f,
                "type mismatch for {selector}: expected {expected}, actual {actual}"
            ),
            Self::Regex(msg) => write!(f, "regex error: {msg}"),
            Self::Runtime(msg) => write!(f, "page runtime error: {msg}"),
            Self::AssertionFailed {
                selector,
                expected,
                actual,
                dom_snippet,
            } => write!(
                f,
                "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
            ),
        }
    }
}

impl StdError for Error {}

impl From<RegexError> for Error {
    fn from(err: RegexError) -> Self {
        Self::Regex(err.to_string())
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}
