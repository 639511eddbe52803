use super::*;

/// A form submission the browser would have performed natively because no
/// listener cancelled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeSubmission {
    pub form_id: Option<String>,
    pub action: String,
    pub method: String,
    pub body: String,
}

/// A loaded page with the storefront behaviors wired onto it.
///
/// `Page` is the service object external callers use in place of a global
/// namespace: it exposes the validation and submission operations, simulated
/// user actions, virtual-time control and assertions.
#[derive(Debug)]
pub struct Page<T: Transport = MockTransport> {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    pub(crate) scheduler: Scheduler,
    pub(crate) transport: T,
    pub(crate) config: EnhancerConfig,
    pub(crate) rules: FieldRules,
    pub(crate) success: SuccessPresenter,
    pub(crate) dispatcher: SubmissionDispatcher,
    pub(crate) debouncer: Debouncer,
    pub(crate) active_element: Option<NodeId>,
    pub(crate) document_url: String,
    pub(crate) alerts: Vec<String>,
    pub(crate) native_submissions: Vec<NativeSubmission>,
    pub(crate) trace: TraceState,
}

const DEFAULT_DOCUMENT_URL: &str = "about:blank";

impl Page<MockTransport> {
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_url(DEFAULT_DOCUMENT_URL, html)
    }

    pub fn from_html_with_url(url: &str, html: &str) -> Result<Self> {
        Self::build(url, html, MockTransport::new(), EnhancerConfig::default())
    }

    pub fn with_config(html: &str, config: EnhancerConfig) -> Result<Self> {
        Self::build(DEFAULT_DOCUMENT_URL, html, MockTransport::new(), config)
    }
}

impl<T: Transport> Page<T> {
    pub fn with_transport(html: &str, transport: T) -> Result<Self> {
        Self::build(DEFAULT_DOCUMENT_URL, html, transport, EnhancerConfig::default())
    }

    pub fn build(url: &str, html: &str, transport: T, config: EnhancerConfig) -> Result<Self> {
        config.validate()?;
        let dom = parse_html(html)?;
        let rules = FieldRules::new(&config)?;
        let mut page = Self {
            dom,
            listeners: ListenerStore::default(),
            scheduler: Scheduler::new(config.timer_step_limit),
            transport,
            rules,
            success: SuccessPresenter::default(),
            dispatcher: SubmissionDispatcher::default(),
            debouncer: Debouncer::default(),
            active_element: None,
            document_url: url.to_string(),
            alerts: Vec::new(),
            native_submissions: Vec::new(),
            trace: TraceState::default(),
            config,
        };
        page.wire_behaviors()?;
        Ok(page)
    }

    /// Attaches the load-time listeners: submit validation on every form,
    /// blur validation and input error clearing on every control inside a
    /// form, and live filtering on the search box.
    fn wire_behaviors(&mut self) -> Result<()> {
        for form in self.dom.query_selector_all("form")? {
            self.listeners
                .add(form, "submit", Behavior::ValidateFormOnSubmit);
            for control in self
                .dom
                .query_selector_all_from(form, "input, textarea, select")?
            {
                self.listeners
                    .add(control, "blur", Behavior::ValidateFieldOnBlur);
                self.listeners
                    .add(control, "input", Behavior::ClearErrorOnInput);
            }
        }

        if let Some(search_box) = self.dom.by_id(&self.config.search_input_id) {
            self.listeners
                .add(search_box, "input", Behavior::FilterMenuOnInput);
        }
        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.document_url
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners.count(event)
    }

    // Exported operations.

    /// Validates every required field of the form, shows inline errors and,
    /// when all pass, the success message.
    pub fn validate_form(&mut self, selector: &str) -> Result<bool> {
        let form = self.select_form(selector)?;
        self.validate_form_node(form)
    }

    pub fn validate_field(&mut self, selector: &str) -> Result<ValidationResult> {
        let target = self.select_one(selector)?;
        if !is_form_control(&self.dom, target) {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input, textarea or select".into(),
                actual: self.dom.tag_name(target).unwrap_or("#text").to_string(),
            });
        }
        self.validate_field_node(target)
    }

    /// Sends the form over the transport. The request settles on the next
    /// [`Page::settle_network`] or time advance. Returns `false` when the form
    /// already has a request in flight.
    pub fn submit_form_ajax(&mut self, selector: &str) -> Result<bool> {
        let form = self.select_form(selector)?;
        self.begin_ajax_submission(form)
    }

    pub fn filter_menu(&mut self, term: &str) -> Result<usize> {
        let visible = filter_menu_rows(&mut self.dom, &self.config, term)?;
        self.trace_form_line(format!("[search] term={term:?} visible_rows={visible}"));
        Ok(visible)
    }

    pub fn submit_control_state(&self, form_selector: &str) -> Result<SubmitControlState> {
        let form = self.select_form(form_selector)?;
        Ok(self.dispatcher.state(form))
    }

    pub fn in_flight_count(&self) -> usize {
        self.dispatcher.len()
    }

    pub fn settle_network(&mut self) -> Result<usize> {
        self.settle_in_flight()
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn take_native_submissions(&mut self) -> Vec<NativeSubmission> {
        std::mem::take(&mut self.native_submissions)
    }

    pub(crate) fn alert(&mut self, message: String) {
        self.trace_form_line(format!("[alert] {message}"));
        self.alerts.push(message);
    }

    // User actions.

    pub fn type_text(&mut self, selector: &str, text: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let tag = self
            .dom
            .tag_name(target)
            .ok_or_else(|| Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: "non-element".into(),
            })?
            .to_ascii_lowercase();

        if tag != "input" && tag != "textarea" {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input or textarea".into(),
                actual: tag,
            });
        }

        self.dom.set_value(target, text)?;
        self.dispatch_event(target, "input")?;
        Ok(())
    }

    pub fn select_option(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if !self.dom.has_tag(target, "select") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "select".into(),
                actual: self.dom.tag_name(target).unwrap_or("#text").to_string(),
            });
        }
        if self.dom.disabled(target) {
            return Ok(());
        }
        self.dom.set_value(target, value)?;
        self.dispatch_event(target, "input")?;
        self.dispatch_event(target, "change")?;
        Ok(())
    }

    pub fn set_checked(&mut self, selector: &str, checked: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let kind = self
            .dom
            .attr(target, "type")
            .unwrap_or_default()
            .to_ascii_lowercase();
        if !self.dom.has_tag(target, "input") || !matches!(kind.as_str(), "checkbox" | "radio") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "input[type=checkbox|radio]".into(),
                actual: self.dom.tag_name(target).unwrap_or("#text").to_string(),
            });
        }
        if self.dom.disabled(target) || self.dom.checked(target)? == checked {
            return Ok(());
        }
        self.dom.set_checked(target, checked)?;
        self.dispatch_event(target, "input")?;
        self.dispatch_event(target, "change")?;
        Ok(())
    }

    pub fn focus(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) || self.active_element == Some(target) {
            return Ok(());
        }
        if let Some(current) = self.active_element {
            self.blur_node(current)?;
        }
        self.active_element = Some(target);
        self.dispatch_event(target, "focus")?;
        Ok(())
    }

    /// Blurs the element if it has focus; otherwise nothing happens.
    pub fn blur(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.blur_node(target)
    }

    fn blur_node(&mut self, node: NodeId) -> Result<()> {
        if self.active_element != Some(node) {
            return Ok(());
        }
        self.active_element = None;
        self.dispatch_event(node, "blur")?;
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        if self.dom.disabled(target) {
            return Ok(());
        }

        let click = self.dispatch_event(target, "click")?;
        if click.default_prevented {
            return Ok(());
        }

        if is_submit_control(&self.dom, target) {
            if let Some(form) = self.dom.find_ancestor_by_tag(target, "form") {
                self.submit_form_node(form)?;
            }
        }
        Ok(())
    }

    /// Submits the form matched by `selector`, or the form containing it.
    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = if self.dom.has_tag(target, "form") {
            Some(target)
        } else {
            self.dom.find_ancestor_by_tag(target, "form")
        };

        match form {
            Some(form) => self.submit_form_node(form),
            None => Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form or form descendant".into(),
                actual: self.dom.tag_name(target).unwrap_or("#text").to_string(),
            }),
        }
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, event)?;
        Ok(())
    }

    fn submit_form_node(&mut self, form: NodeId) -> Result<()> {
        let event = self.dispatch_event(form, "submit")?;
        if event.default_prevented {
            return Ok(());
        }

        let form_view = Form::read(&self.dom, form, &self.document_url)?;
        let body = serialize_form_urlencoded(&form_data_entries(&self.dom, form)?);
        self.trace_form_line(format!(
            "[form] native submit {} {}",
            form_view.method, form_view.action
        ));
        self.native_submissions.push(NativeSubmission {
            form_id: self.dom.attr(form, "id"),
            action: form_view.action,
            method: form_view.method,
            body,
        });
        Ok(())
    }

    // Virtual time.

    pub fn now_ms(&self) -> i64 {
        self.scheduler.now_ms
    }

    pub fn set_timer_step_limit(&mut self, max_steps: usize) -> Result<()> {
        if max_steps == 0 {
            return Err(Error::Runtime(
                "set_timer_step_limit requires at least 1 step".into(),
            ));
        }
        self.scheduler.timer_step_limit = max_steps;
        Ok(())
    }

    pub fn pending_timers(&self) -> Vec<PendingTimer> {
        self.scheduler.pending()
    }

    pub fn clear_timer(&mut self, timer_id: i64) -> bool {
        let cleared = self.scheduler.clear(timer_id);
        self.trace_timer_line(format!("[timer] clear id={timer_id} existed={cleared}"));
        cleared
    }

    pub fn clear_all_timers(&mut self) -> usize {
        let cleared = self.scheduler.clear_all();
        self.trace_timer_line(format!("[timer] clear_all cleared={cleared}"));
        cleared
    }

    pub fn advance_time(&mut self, delta_ms: i64) -> Result<()> {
        if delta_ms < 0 {
            return Err(Error::Runtime(
                "advance_time requires non-negative milliseconds".into(),
            ));
        }
        let from = self.scheduler.now_ms;
        self.settle_in_flight()?;
        self.scheduler.now_ms = from.saturating_add(delta_ms);
        let ran = self.run_timer_queue(Some(self.scheduler.now_ms), false)?;
        self.trace_timer_line(format!(
            "[timer] advance delta_ms={} from={} to={} ran_due={}",
            delta_ms, from, self.scheduler.now_ms, ran
        ));
        Ok(())
    }

    pub fn advance_time_to(&mut self, target_ms: i64) -> Result<()> {
        let now = self.scheduler.now_ms;
        if target_ms < now {
            return Err(Error::Runtime(format!(
                "advance_time_to requires target >= now_ms (target={target_ms}, now_ms={now})"
            )));
        }
        self.advance_time(target_ms - now)
    }

    /// Settles the network and runs every pending timer, moving the clock
    /// forward to each one.
    pub fn flush(&mut self) -> Result<()> {
        let from = self.scheduler.now_ms;
        self.settle_in_flight()?;
        let ran = self.run_timer_queue(None, true)?;
        self.trace_timer_line(format!(
            "[timer] flush from={} to={} ran={}",
            from, self.scheduler.now_ms, ran
        ));
        Ok(())
    }

    pub fn run_due_timers(&mut self) -> Result<usize> {
        let ran = self.run_timer_queue(Some(self.scheduler.now_ms), false)?;
        self.trace_timer_line(format!(
            "[timer] run_due now_ms={} ran={}",
            self.scheduler.now_ms, ran
        ));
        Ok(ran)
    }

    pub fn run_next_timer(&mut self) -> Result<bool> {
        let Some(task) = self.scheduler.take_next(None) else {
            self.trace_timer_line("[timer] run_next none".into());
            return Ok(false);
        };
        if task.due_at > self.scheduler.now_ms {
            self.scheduler.now_ms = task.due_at;
        }
        self.execute_timer_task(task)?;
        Ok(true)
    }

    fn run_timer_queue(&mut self, due_limit: Option<i64>, advance_clock: bool) -> Result<usize> {
        let mut steps = 0usize;
        while self.scheduler.peek_next(due_limit).is_some() {
            steps += 1;
            if steps > self.scheduler.timer_step_limit {
                return Err(self.timer_step_limit_error(steps, due_limit));
            }
            let Some(task) = self.scheduler.take_next(due_limit) else {
                break;
            };
            if advance_clock && task.due_at > self.scheduler.now_ms {
                self.scheduler.now_ms = task.due_at;
            }
            self.execute_timer_task(task)?;
        }
        Ok(steps)
    }

    fn timer_step_limit_error(&self, steps: usize, due_limit: Option<i64>) -> Error {
        let due_limit_desc = due_limit
            .map(|value| value.to_string())
            .unwrap_or_else(|| "none".into());
        let next_task_desc = self
            .scheduler
            .peek_next(due_limit)
            .map(|task| format!("id={},due_at={},order={}", task.id, task.due_at, task.order))
            .unwrap_or_else(|| "none".into());

        Error::Runtime(format!(
            "timer queue exceeded max task steps: limit={}, steps={steps}, now_ms={}, due_limit={due_limit_desc}, pending_tasks={}, next_task={next_task_desc}",
            self.scheduler.timer_step_limit,
            self.scheduler.now_ms,
            self.scheduler.len(),
        ))
    }

    fn execute_timer_task(&mut self, task: ScheduledTask) -> Result<()> {
        self.trace_timer_line(format!(
            "[timer] run id={} due_at={} now_ms={}",
            task.id, task.due_at, self.scheduler.now_ms
        ));
        match task.task {
            TimerTask::HideSuccess { form, token } => self.hide_success(form, token),
            TimerTask::FilterMenu { input } => {
                self.debouncer.fired(input, task.id);
                self.filter_menu_from_input(input).map(|_| ())
            }
        }
    }

    // Observation.

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        self.dom.value(target)
    }

    pub fn is_visible(&self, selector: &str) -> Result<bool> {
        let target = self.select_one(selector)?;
        self.dom.is_displayed(target)
    }

    /// Number of elements matching `selector` whose `display` is not `none`.
    pub fn count_visible(&self, selector: &str) -> Result<usize> {
        let mut visible = 0usize;
        for node in self.dom.query_selector_all(selector)? {
            if self.dom.is_displayed(node)? {
                visible += 1;
            }
        }
        Ok(visible)
    }

    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.dom.query_selector_all(selector)?.len())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        self.assert_matches(selector, target, expected, &actual)
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.value(target)?;
        self.assert_matches(selector, target, expected, &actual)
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_visible(&self, selector: &str) -> Result<()> {
        self.assert_displayed(selector, true)
    }

    pub fn assert_hidden(&self, selector: &str) -> Result<()> {
        self.assert_displayed(selector, false)
    }

    pub fn assert_disabled(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.disabled(target);
        self.assert_matches(selector, target, &expected.to_string(), &actual.to_string())
    }

    pub fn assert_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.class_contains(target, class_name)?;
        self.assert_matches(
            selector,
            target,
            &format!("has .{class_name} = {expected}"),
            &format!("has .{class_name} = {actual}"),
        )
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    fn assert_displayed(&self, selector: &str, expected: bool) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.is_displayed(target)?;
        let describe = |shown: bool| if shown { "visible" } else { "hidden" };
        self.assert_matches(selector, target, describe(expected), describe(actual))
    }

    fn assert_matches(&self, selector: &str, target: NodeId, expected: &str, actual: &str) -> Result<()> {
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub(crate) fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn select_form(&self, selector: &str) -> Result<NodeId> {
        let target = self.select_one(selector)?;
        if !self.dom.has_tag(target, "form") {
            return Err(Error::TypeMismatch {
                selector: selector.to_string(),
                expected: "form".into(),
                actual: self.dom.tag_name(target).unwrap_or("#text").to_string(),
            });
        }
        Ok(target)
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }
}
