use super::*;

/// Shows and clears the per-field error slot.
///
/// The slot is the first `.error` element under the field's parent; it is
/// created on first use and only ever hidden afterwards, never removed.
pub(crate) struct ErrorPresenter<'a> {
    config: &'a EnhancerConfig,
}

impl<'a> ErrorPresenter<'a> {
    pub(crate) fn new(config: &'a EnhancerConfig) -> Self {
        Self { config }
    }

    fn container(dom: &Dom, field: NodeId) -> Result<NodeId> {
        dom.parent(field)
            .ok_or_else(|| Error::Runtime("field has no parent element".into()))
    }

    pub(crate) fn slot(&self, dom: &Dom, field: NodeId) -> Result<Option<NodeId>> {
        let container = Self::container(dom, field)?;
        dom.query_selector_from(container, &format!(".{}", self.config.error_class))
    }

    pub(crate) fn ensure_slot(&self, dom: &mut Dom, field: NodeId) -> Result<NodeId> {
        if let Some(slot) = self.slot(dom, field)? {
            return Ok(slot);
        }
        let container = Self::container(dom, field)?;
        dom.append_element_with_class(container, "div", &self.config.error_class)
    }

    pub(crate) fn show(&self, dom: &mut Dom, field: NodeId, message: &str) -> Result<()> {
        let slot = self.ensure_slot(dom, field)?;
        dom.set_text_content(slot, message)?;
        dom.style_set(slot, "display", "block")?;
        dom.class_add(field, &self.config.input_error_class)
    }

    pub(crate) fn clear(&self, dom: &mut Dom, field: NodeId) -> Result<()> {
        if let Some(slot) = self.slot(dom, field)? {
            dom.style_set(slot, "display", "none")?;
        }
        dom.class_remove(field, &self.config.input_error_class)
    }
}

/// Tracks the latest show per form so stale hide timers can be told apart.
#[derive(Debug, Default)]
pub(crate) struct SuccessPresenter {
    latest_tokens: HashMap<NodeId, u64>,
    next_token: u64,
}

impl SuccessPresenter {
    pub(crate) fn slot(dom: &Dom, config: &EnhancerConfig, form: NodeId) -> Result<Option<NodeId>> {
        dom.query_selector_from(form, &format!(".{}", config.success_class))
    }

    fn ensure_slot(dom: &mut Dom, config: &EnhancerConfig, form: NodeId) -> Result<NodeId> {
        if let Some(slot) = Self::slot(dom, config, form)? {
            return Ok(slot);
        }
        dom.append_element_with_class(form, "div", &config.success_class)
    }

    /// Shows the message and returns the token its hide timer must carry.
    pub(crate) fn show(&mut self, dom: &mut Dom, config: &EnhancerConfig, form: NodeId) -> Result<u64> {
        let slot = Self::ensure_slot(dom, config, form)?;
        dom.set_text_content(slot, &config.success_message)?;
        dom.style_set(slot, "display", "block")?;

        self.next_token += 1;
        self.latest_tokens.insert(form, self.next_token);
        Ok(self.next_token)
    }

    /// Returns whether the message was hidden.
    pub(crate) fn hide(
        &mut self,
        dom: &mut Dom,
        config: &EnhancerConfig,
        form: NodeId,
        token: u64,
    ) -> Result<bool> {
        if config.success_timer_policy == SuccessTimerPolicy::LatestOnly
            && self.latest_tokens.get(&form) != Some(&token)
        {
            return Ok(false);
        }
        let Some(slot) = Self::slot(dom, config, form)? else {
            return Ok(false);
        };
        dom.style_set(slot, "display", "none")?;
        Ok(true)
    }
}

impl<T: Transport> Page<T> {
    pub(crate) fn show_success(&mut self, form: NodeId) -> Result<()> {
        let token = self.success.show(&mut self.dom, &self.config, form)?;
        let delay = self.config.success_hide_delay_ms;
        let timer_id = self
            .scheduler
            .schedule(delay, TimerTask::HideSuccess { form, token });

        let label = self.trace_node_label(form);
        self.trace_form_line(format!(
            "[form] success shown form={label} token={token} hide_timer={timer_id}"
        ));
        Ok(())
    }

    pub(crate) fn hide_success(&mut self, form: NodeId, token: u64) -> Result<()> {
        let hidden = self.success.hide(&mut self.dom, &self.config, form, token)?;
        let label = self.trace_node_label(form);
        self.trace_form_line(format!(
            "[form] success hide form={label} token={token} hidden={hidden}"
        ));
        Ok(())
    }
}
