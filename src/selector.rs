use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
}

/// `tag#id.class[attr=value]`, any part optional but not all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Compound {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
}

/// Compounds joined left to right; `combinators[i]` sits between
/// `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chain {
    pub(crate) compounds: Vec<Compound>,
    pub(crate) combinators: Vec<SelectorCombinator>,
}

/// Comma-separated chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorList(pub(crate) Vec<Chain>);

impl SelectorList {
    /// `#id` on its own, answerable from the id index.
    fn lone_id(&self) -> Option<&str> {
        let [chain] = self.0.as_slice() else {
            return None;
        };
        let [compound] = chain.compounds.as_slice() else {
            return None;
        };
        if compound.tag.is_some() || !compound.classes.is_empty() || !compound.attrs.is_empty() {
            return None;
        }
        compound.id.as_deref()
    }
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<SelectorList> {
    Scanner::new(selector).parse_list()
}

struct Scanner<'a> {
    src: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.chars().collect(),
            pos: 0,
        }
    }

    fn reject(&self, reason: &str) -> Error {
        Error::UnsupportedSelector(format!("{} ({reason} at {})", self.src, self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(|ch| ch.is_ascii_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        {
            self.pos += 1;
        }
        (self.pos > start).then(|| self.chars[start..self.pos].iter().collect())
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        self.ident()
            .ok_or_else(|| self.reject(&format!("expected {what}")))
    }

    fn parse_list(&mut self) -> Result<SelectorList> {
        let mut chains = Vec::new();
        loop {
            chains.push(self.parse_chain()?);
            self.skip_ws();
            match self.peek() {
                None => return Ok(SelectorList(chains)),
                Some(',') => self.pos += 1,
                Some(ch) => return Err(self.reject(&format!("unexpected '{ch}'"))),
            }
        }
    }

    fn parse_chain(&mut self) -> Result<Chain> {
        self.skip_ws();
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();
        loop {
            let spaced = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    SelectorCombinator::Child
                }
                Some(ch) if spaced && ch != ',' => SelectorCombinator::Descendant,
                _ => break,
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }
        Ok(Chain {
            compounds,
            combinators,
        })
    }

    fn parse_compound(&mut self) -> Result<Compound> {
        let start = self.pos;
        let mut compound = Compound::default();
        if !self.eat('*') {
            compound.tag = self.ident().map(|tag| tag.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    let id = self.expect_ident("an id")?;
                    if compound.id.replace(id).is_some() {
                        return Err(self.reject("second id in one compound"));
                    }
                }
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.expect_ident("a class name")?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.parse_attr()?);
                }
                _ => break,
            }
        }

        if self.pos == start {
            return Err(self.reject("expected a selector"));
        }
        Ok(compound)
    }

    fn parse_attr(&mut self) -> Result<SelectorAttrCondition> {
        self.skip_ws();
        let key = self.expect_ident("an attribute name")?.to_ascii_lowercase();
        self.skip_ws();
        if self.eat(']') {
            return Ok(SelectorAttrCondition::Exists { key });
        }
        if !self.eat('=') {
            return Err(self.reject("expected '=' or ']'"));
        }

        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.bump() {
                        Some(ch) if ch == quote => break,
                        Some(ch) => value.push(ch),
                        None => return Err(self.reject("unterminated attribute value")),
                    }
                }
                value
            }
            _ => self.expect_ident("an attribute value")?,
        };

        self.skip_ws();
        if !self.eat(']') {
            return Err(self.reject("expected ']'"));
        }
        Ok(SelectorAttrCondition::Eq { key, value })
    }
}

impl Dom {
    pub(crate) fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let all = self.query_selector_all(selector)?;
        Ok(all.into_iter().next())
    }

    pub(crate) fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let list = parse_selector_groups(selector)?;
        if let Some(id) = list.lone_id() {
            return Ok(self.by_id(id).into_iter().collect());
        }

        let mut candidates = Vec::new();
        self.collect_elements_dfs(self.root, &mut candidates);
        Ok(self.retain_matching(candidates, &list))
    }

    pub(crate) fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let all = self.query_selector_all_from(root, selector)?;
        Ok(all.into_iter().next())
    }

    /// Descendants of `root` only; `root` itself never matches.
    pub(crate) fn query_selector_all_from(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let list = parse_selector_groups(selector)?;
        let mut candidates = Vec::new();
        self.collect_elements_descendants_dfs(root, &mut candidates);
        Ok(self.retain_matching(candidates, &list))
    }

    fn retain_matching(&self, mut candidates: Vec<NodeId>, list: &SelectorList) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        candidates.retain(|node| {
            list.0.iter().any(|chain| self.matches_chain(*node, chain)) && seen.insert(*node)
        });
        candidates
    }

    pub(crate) fn matches_selector(&self, node_id: NodeId, selector: &str) -> Result<bool> {
        let list = parse_selector_groups(selector)?;
        Ok(list.0.iter().any(|chain| self.matches_chain(node_id, chain)))
    }

    fn matches_chain(&self, node_id: NodeId, chain: &Chain) -> bool {
        match chain.compounds.len().checked_sub(1) {
            Some(last) => self.matches_chain_at(node_id, chain, last),
            None => false,
        }
    }

    // Right to left; a descendant step retries each further ancestor when
    // the rest of the chain fails from the nearest one.
    fn matches_chain_at(&self, node_id: NodeId, chain: &Chain, idx: usize) -> bool {
        if !self.matches_compound(node_id, &chain.compounds[idx]) {
            return false;
        }
        let Some(prev) = idx.checked_sub(1) else {
            return true;
        };

        match chain.combinators[prev] {
            SelectorCombinator::Child => self
                .parent(node_id)
                .is_some_and(|parent| self.matches_chain_at(parent, chain, prev)),
            SelectorCombinator::Descendant => {
                let mut cursor = self.parent(node_id);
                while let Some(ancestor) = cursor {
                    if self.matches_chain_at(ancestor, chain, prev) {
                        return true;
                    }
                    cursor = self.parent(ancestor);
                }
                false
            }
        }
    }

    fn matches_compound(&self, node_id: NodeId, compound: &Compound) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        let tag_ok = compound
            .tag
            .as_ref()
            .is_none_or(|tag| element.tag_name.eq_ignore_ascii_case(tag));
        let id_ok = compound
            .id
            .as_ref()
            .is_none_or(|id| element.attrs.get("id") == Some(id));

        tag_ok
            && id_ok
            && compound
                .classes
                .iter()
                .all(|class_name| dom::has_class(element, class_name))
            && compound.attrs.iter().all(|cond| match cond {
                SelectorAttrCondition::Exists { key } => element.attrs.contains_key(key),
                SelectorAttrCondition::Eq { key, value } => element.attrs.get(key) == Some(value),
            })
    }
}
