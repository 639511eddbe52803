use super::*;
use unicode_normalization::UnicodeNormalization;

fn fold_for_search(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Shows the rows of the menu table whose text contains `term` and hides the
/// rest. The first row is the header and is never touched. Returns how many
/// rows stay visible.
pub(crate) fn filter_menu_rows(dom: &mut Dom, config: &EnhancerConfig, term: &str) -> Result<usize> {
    let rows = dom.query_selector_all(&format!("#{} tr", config.menu_table_id))?;
    let needle = fold_for_search(term);

    let mut visible = 0usize;
    for row in rows.into_iter().skip(1) {
        let haystack = fold_for_search(&dom.text_content(row));
        if haystack.contains(&needle) {
            dom.style_set(row, "display", "")?;
            visible += 1;
        } else {
            dom.style_set(row, "display", "none")?;
        }
    }
    Ok(visible)
}

/// Trailing-edge debounce: each call replaces the pending timer for its key.
#[derive(Debug, Default)]
pub(crate) struct Debouncer {
    pending: HashMap<NodeId, i64>,
}

impl Debouncer {
    pub(crate) fn call(
        &mut self,
        scheduler: &mut Scheduler,
        key: NodeId,
        wait_ms: i64,
        task: TimerTask,
    ) -> i64 {
        if let Some(previous) = self.pending.remove(&key) {
            scheduler.clear(previous);
        }
        let timer_id = scheduler.schedule(wait_ms, task);
        self.pending.insert(key, timer_id);
        timer_id
    }

    /// Forgets the pending timer once it has fired.
    pub(crate) fn fired(&mut self, key: NodeId, timer_id: i64) {
        if self.pending.get(&key) == Some(&timer_id) {
            self.pending.remove(&key);
        }
    }
}

impl<T: Transport> Page<T> {
    pub(crate) fn filter_menu_from_input(&mut self, input: NodeId) -> Result<usize> {
        let term = self.dom.value(input)?;
        let visible = filter_menu_rows(&mut self.dom, &self.config, &term)?;
        self.trace_form_line(format!("[search] term={term:?} visible_rows={visible}"));
        Ok(visible)
    }
}
