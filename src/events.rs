use super::*;

/// A handler the page wires at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Behavior {
    ValidateFormOnSubmit,
    ValidateFieldOnBlur,
    ClearErrorOnInput,
    FilterMenuOnInput,
}

#[derive(Debug, Default, Clone)]
pub(crate) struct ListenerStore {
    map: HashMap<NodeId, HashMap<String, Vec<Behavior>>>,
}

impl ListenerStore {
    /// Registering the same behavior twice for one node and event is a no-op,
    /// like `addEventListener` with the same function.
    pub(crate) fn add(&mut self, node_id: NodeId, event: &str, behavior: Behavior) -> bool {
        let listeners = self
            .map
            .entry(node_id)
            .or_default()
            .entry(event.to_string())
            .or_default();
        if listeners.contains(&behavior) {
            return false;
        }
        listeners.push(behavior);
        true
    }

    pub(crate) fn get(&self, node_id: NodeId, event: &str) -> Vec<Behavior> {
        self.map
            .get(&node_id)
            .and_then(|events| events.get(event))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.map
            .values()
            .filter_map(|events| events.get(event))
            .map(Vec::len)
            .sum()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) default_prevented: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            default_prevented: false,
        }
    }
}

impl<T: Transport> Page<T> {
    /// Runs listeners on the target, then on each ancestor up to the document.
    pub(crate) fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }

        for node in path {
            event.current_target = node;
            for behavior in self.listeners.get(node, event_type) {
                if self.trace.enabled && self.trace.events {
                    let target_label = self.trace_node_label(event.target);
                    let current_label = self.trace_node_label(event.current_target);
                    self.trace_event_line(format!(
                        "[event] {} target={} current={} behavior={:?}",
                        event.event_type, target_label, current_label, behavior
                    ));
                }
                self.run_behavior(behavior, &mut event)?;
            }
        }

        let target_label = self.trace_node_label(event.target);
        self.trace_event_line(format!(
            "[event] done {} target={} default_prevented={}",
            event.event_type, target_label, event.default_prevented
        ));
        Ok(event)
    }

    fn run_behavior(&mut self, behavior: Behavior, event: &mut EventState) -> Result<()> {
        let node = event.current_target;
        match behavior {
            Behavior::ValidateFormOnSubmit => {
                if !self.validate_form_node(node)? {
                    event.default_prevented = true;
                }
            }
            Behavior::ValidateFieldOnBlur => {
                self.validate_field_node(node)?;
            }
            Behavior::ClearErrorOnInput => {
                ErrorPresenter::new(&self.config).clear(&mut self.dom, node)?;
            }
            Behavior::FilterMenuOnInput => match self.config.search_debounce_ms {
                Some(wait_ms) => {
                    let timer_id = self.debouncer.call(
                        &mut self.scheduler,
                        node,
                        wait_ms,
                        TimerTask::FilterMenu { input: node },
                    );
                    self.trace_timer_line(format!(
                        "[timer] debounce search timer={timer_id} wait_ms={wait_ms}"
                    ));
                }
                None => {
                    self.filter_menu_from_input(node)?;
                }
            },
        }
        Ok(())
    }
}
