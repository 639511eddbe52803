use super::*;

/// Busy state of a form's submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitControlState {
    Idle,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitControlKind {
    // Label lives in the `value` attribute.
    Input,
    // Label is the element text.
    Button,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SubmitControl {
    pub(crate) node: NodeId,
    kind: SubmitControlKind,
}

impl SubmitControl {
    /// First `input[type=submit]` in the form, else the first submit button.
    pub(crate) fn find(dom: &Dom, form: NodeId) -> Result<Option<Self>> {
        if let Some(node) = dom.query_selector_from(form, "input[type=submit]")? {
            return Ok(Some(Self {
                node,
                kind: SubmitControlKind::Input,
            }));
        }
        let button = dom
            .query_selector_all_from(form, "button")?
            .into_iter()
            .find(|node| is_submit_control(dom, *node));
        Ok(button.map(|node| Self {
            node,
            kind: SubmitControlKind::Button,
        }))
    }

    pub(crate) fn label(&self, dom: &Dom) -> Result<String> {
        match self.kind {
            SubmitControlKind::Input => dom.value(self.node),
            SubmitControlKind::Button => Ok(dom.text_content(self.node)),
        }
    }

    pub(crate) fn set_label(&self, dom: &mut Dom, label: &str) -> Result<()> {
        match self.kind {
            SubmitControlKind::Input => dom.set_value(self.node, label),
            SubmitControlKind::Button => dom.set_text_content(self.node, label),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InFlightSubmission {
    pub(crate) form: NodeId,
    pub(crate) request: SubmissionRequest,
    pub(crate) control: Option<(SubmitControl, String)>,
}

/// Requests waiting for the transport, oldest first.
#[derive(Debug, Default)]
pub(crate) struct SubmissionDispatcher {
    in_flight: VecDeque<InFlightSubmission>,
}

impl SubmissionDispatcher {
    pub(crate) fn is_busy(&self, form: NodeId) -> bool {
        self.in_flight.iter().any(|pending| pending.form == form)
    }

    pub(crate) fn state(&self, form: NodeId) -> SubmitControlState {
        if self
            .in_flight
            .iter()
            .any(|pending| pending.form == form && pending.control.is_some())
        {
            SubmitControlState::Busy
        } else {
            SubmitControlState::Idle
        }
    }

    pub(crate) fn enqueue(&mut self, submission: InFlightSubmission) {
        self.in_flight.push_back(submission);
    }

    pub(crate) fn pop(&mut self) -> Option<InFlightSubmission> {
        self.in_flight.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.in_flight.len()
    }
}

impl<T: Transport> Page<T> {
    /// Starts an AJAX submission of `form`. Returns `false` without sending
    /// anything when the same form already has a request in flight.
    pub(crate) fn begin_ajax_submission(&mut self, form: NodeId) -> Result<bool> {
        if self.dispatcher.is_busy(form) {
            let label = self.trace_node_label(form);
            self.trace_network_line(format!("[network] skip form={label} reason=in_flight"));
            return Ok(false);
        }

        let form_view = Form::read(&self.dom, form, &self.document_url)?;
        let entries = form_data_entries(&self.dom, form)?;
        let request = SubmissionRequest::post_form(&form_view.action, &entries);

        let control = match SubmitControl::find(&self.dom, form)? {
            Some(control) => {
                let original_label = control.label(&self.dom)?;
                control.set_label(&mut self.dom, &self.config.busy_label)?;
                self.dom.set_disabled(control.node, true)?;
                Some((control, original_label))
            }
            None => None,
        };

        self.trace_network_line(format!(
            "[network] dispatch {} {} fields={} busy_control={}",
            request.method,
            request.url,
            entries.len(),
            control.is_some()
        ));
        self.dispatcher.enqueue(InFlightSubmission {
            form,
            request,
            control,
        });
        Ok(true)
    }

    /// Delivers every in-flight request and applies its outcome.
    pub(crate) fn settle_in_flight(&mut self) -> Result<usize> {
        let mut settled = 0usize;
        while let Some(submission) = self.dispatcher.pop() {
            settled += 1;
            let outcome = self.transport.send(&submission.request);
            let result = self.apply_submission_outcome(&submission, outcome);
            // The control goes back to idle whatever happened above.
            let restored = self.restore_submit_control(&submission);
            result?;
            restored?;
        }
        Ok(settled)
    }

    fn apply_submission_outcome(
        &mut self,
        submission: &InFlightSubmission,
        outcome: std::result::Result<TransportResponse, TransportError>,
    ) -> Result<()> {
        match outcome {
            Ok(response) if response.is_ok() => {
                self.trace_network_line(format!(
                    "[network] settled {} status={} ok=true",
                    submission.request.url, response.status
                ));
                self.show_success(submission.form)?;
                let reset = reset_form(&mut self.dom, submission.form)?;
                self.trace_form_line(format!("[form] reset controls={reset}"));
            }
            Ok(response) => {
                self.trace_network_line(format!(
                    "[network] settled {} status={} ok=false",
                    submission.request.url, response.status
                ));
                self.alert(self.config.failure_alert.clone());
            }
            Err(err) => {
                self.trace_network_line(format!(
                    "[network] failed {} error={}",
                    submission.request.url, err
                ));
                self.alert(self.config.failure_alert.clone());
            }
        }
        Ok(())
    }

    fn restore_submit_control(&mut self, submission: &InFlightSubmission) -> Result<()> {
        let Some((control, original_label)) = &submission.control else {
            return Ok(());
        };
        control.set_label(&mut self.dom, original_label)?;
        self.dom.set_disabled(control.node, false)
    }
}
