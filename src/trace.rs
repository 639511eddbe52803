use super::*;

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) timers: bool,
    pub(crate) network: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) forward_to_log: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            timers: true,
            network: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            forward_to_log: true,
        }
    }
}

impl TraceState {
    fn push(&mut self, line: String) {
        if !self.enabled {
            return;
        }
        if self.forward_to_log {
            log::debug!(target: "storefront_forms", "{line}");
        }
        while self.logs.len() >= self.log_limit {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }
}

impl<T: Transport> Page<T> {
    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace.enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        self.trace.logs.drain(..).collect()
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace.events = enabled;
    }

    pub fn set_trace_timers(&mut self, enabled: bool) {
        self.trace.timers = enabled;
    }

    pub fn set_trace_network(&mut self, enabled: bool) {
        self.trace.network = enabled;
    }

    /// Also emit trace lines through the `log` facade.
    pub fn set_trace_log_forward(&mut self, enabled: bool) {
        self.trace.forward_to_log = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace.log_limit = max_entries;
        while self.trace.logs.len() > self.trace.log_limit {
            self.trace.logs.pop_front();
        }
        Ok(())
    }

    pub(crate) fn trace_event_line(&mut self, line: String) {
        if self.trace.events {
            self.trace.push(line);
        }
    }

    pub(crate) fn trace_timer_line(&mut self, line: String) {
        if self.trace.timers {
            self.trace.push(line);
        }
    }

    pub(crate) fn trace_network_line(&mut self, line: String) {
        if self.trace.network {
            self.trace.push(line);
        }
    }

    pub(crate) fn trace_form_line(&mut self, line: String) {
        self.trace.push(line);
    }

    pub(crate) fn trace_node_label(&self, node_id: NodeId) -> String {
        if node_id == self.dom.root {
            return "document".into();
        }
        let Some(element) = self.dom.element(node_id) else {
            return "#text".into();
        };
        if let Some(id) = element.attrs.get("id").filter(|id| !id.is_empty()) {
            return format!("{}#{}", element.tag_name, id);
        }
        if let Some(name) = element.attrs.get("name").filter(|name| !name.is_empty()) {
            return format!("{}[name={}]", element.tag_name, name);
        }
        element.tag_name.clone()
    }
}
