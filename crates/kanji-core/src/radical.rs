use std::collections::BTreeMap;

/// Radical name resolution, addressed by component symbol
pub trait RadicalNames {
    /// Name for a component symbol, if one is known
    fn radical_name(&self, symbol: &str) -> Option<String>;

    /// Reverse lookup: symbol whose name matches `name` case-insensitively
    fn find_symbol(&self, name: &str) -> Option<String>;
}

impl RadicalNames for BTreeMap<String, String> {
    fn radical_name(&self, symbol: &str) -> Option<String> {
        self.get(symbol).cloned()
    }

    fn find_symbol(&self, name: &str) -> Option<String> {
        let wanted = name.trim().to_lowercase();
        self.iter()
            .find(|(_, n)| n.to_lowercase() == wanted)
            .map(|(symbol, _)| symbol.clone())
    }
}

/// Ordered chain of name sources; the first source that knows a symbol wins
pub struct ChainedNames<'a> {
    sources: Vec<&'a dyn RadicalNames>,
}

impl<'a> ChainedNames<'a> {
    pub fn new(sources: Vec<&'a dyn RadicalNames>) -> Self {
        Self { sources }
    }
}

impl RadicalNames for ChainedNames<'_> {
    fn radical_name(&self, symbol: &str) -> Option<String> {
        self.sources.iter().find_map(|s| s.radical_name(symbol))
    }

    fn find_symbol(&self, name: &str) -> Option<String> {
        self.sources.iter().find_map(|s| s.find_symbol(name))
    }
}
