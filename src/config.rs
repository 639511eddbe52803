use super::*;

/// Which success-message hide timers are allowed to hide the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuccessTimerPolicy {
    /// Only the timer scheduled by the most recent show hides the message, so
    /// a second success inside the window gets its full display time.
    #[default]
    LatestOnly,
    /// Every scheduled timer hides the message when it fires, even if a later
    /// success re-showed it in the meantime.
    EveryTimer,
}

/// Texts, class names and timings used by the page behaviors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancerConfig {
    pub required_message: String,
    pub email_message: String,
    pub telephone_message: String,
    pub success_message: String,
    pub failure_alert: String,
    pub busy_label: String,
    pub error_class: String,
    pub input_error_class: String,
    pub success_class: String,
    pub success_hide_delay_ms: i64,
    pub success_timer_policy: SuccessTimerPolicy,
    /// `None` filters the menu on every keystroke.
    pub search_debounce_ms: Option<i64>,
    pub search_input_id: String,
    pub menu_table_id: String,
    pub timer_step_limit: usize,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            required_message: "This field is required".into(),
            email_message: "Please enter a valid email address".into(),
            telephone_message: "Please enter a valid phone number".into(),
            success_message: "Thank you! Your message has been sent successfully.".into(),
            failure_alert: "Sorry, there was an error submitting your form. Please try again."
                .into(),
            busy_label: "Sending...".into(),
            error_class: "error".into(),
            input_error_class: "input-error".into(),
            success_class: "success-message".into(),
            success_hide_delay_ms: 5_000,
            success_timer_policy: SuccessTimerPolicy::LatestOnly,
            search_debounce_ms: None,
            search_input_id: "searchBox".into(),
            menu_table_id: "menuTable".into(),
            timer_step_limit: 10_000,
        }
    }
}

impl EnhancerConfig {
    pub fn with_success_timer_policy(mut self, policy: SuccessTimerPolicy) -> Self {
        self.success_timer_policy = policy;
        self
    }

    pub fn with_search_debounce_ms(mut self, wait_ms: Option<i64>) -> Self {
        self.search_debounce_ms = wait_ms;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.success_hide_delay_ms < 0 {
            return Err(Error::Runtime(
                "success_hide_delay_ms requires non-negative milliseconds".into(),
            ));
        }
        if self.search_debounce_ms.is_some_and(|wait| wait < 0) {
            return Err(Error::Runtime(
                "search_debounce_ms requires non-negative milliseconds".into(),
            ));
        }
        if self.timer_step_limit == 0 {
            return Err(Error::Runtime(
                "timer_step_limit requires at least 1 step".into(),
            ));
        }
        for (name, class_name) in [
            ("error_class", &self.error_class),
            ("input_error_class", &self.input_error_class),
            ("success_class", &self.success_class),
        ] {
            if class_name.is_empty() || class_name.chars().any(char::is_whitespace) {
                return Err(Error::Runtime(format!(
                    "{name} must be a single class token, got {class_name:?}"
                )));
            }
        }
        Ok(())
    }
}
